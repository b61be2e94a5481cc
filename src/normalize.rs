use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};
use serde_json::{Number, Value};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d-%b-%Y",
];

const DATE_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// A calendar month. Ordering is chronological: year first, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthBucket {
    year: i32,
    month: u32,
}

/// How a bucket is rendered for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum MonthLabel {
    /// "March 2025"
    #[default]
    Long,
    /// "Mar-25"
    Short,
}

impl MonthBucket {
    /// `month` is 1-based. Returns `None` outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::from_date(date) == *self
    }

    pub fn label(&self, style: MonthLabel) -> String {
        let name = MONTH_NAMES[(self.month - 1) as usize];
        match style {
            MonthLabel::Long => format!("{} {}", name, self.year),
            MonthLabel::Short => format!("{}-{:02}", &name[..3], self.year.rem_euclid(100)),
        }
    }
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthBucket {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || anyhow::anyhow!("expected a month as YYYY-MM, got '{value}'");
        let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for MonthBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Coerces a raw amount to a non-negative number. Anything unusable is 0.
pub fn to_amount(raw: &Value) -> f64 {
    let parsed = match raw {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(amount) if amount.is_finite() && amount >= 0.0 => amount,
        _ => 0.0,
    }
}

/// Parses a raw date. `None` means the record cannot be placed in a month.
pub fn to_date(raw: &Value) -> Option<NaiveDate> {
    match raw {
        Value::Number(number) => epoch_millis(number)
            .and_then(DateTime::from_timestamp_millis)
            .map(|timestamp| timestamp.date_naive()),
        Value::String(text) => parse_date_text(text.trim()),
        _ => None,
    }
}

pub fn to_month_key(raw: &Value) -> Option<MonthBucket> {
    to_date(raw).map(MonthBucket::from_date)
}

/// Reads an identity field (id or display name) as trimmed text.
pub fn to_text(raw: &Value) -> Option<String> {
    match raw {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Whole milliseconds, whether the number was written as an integer or a float.
fn epoch_millis(number: &Number) -> Option<i64> {
    number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|millis| millis.is_finite() && millis.fract() == 0.0)
            .map(|millis| millis as i64)
    })
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.naive_local().date());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(text, format) {
            return Some(timestamp.date());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }

    // Bare "YYYY-MM"
    NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bucket(year: i32, month: u32) -> MonthBucket {
        MonthBucket::new(year, month).unwrap()
    }

    #[test]
    fn amounts_fall_back_to_zero() {
        assert_eq!(to_amount(&json!(1250.5)), 1250.5);
        assert_eq!(to_amount(&json!(" 1,250.50 ")), 1250.5);
        assert_eq!(to_amount(&json!("abc")), 0.0);
        assert_eq!(to_amount(&json!(null)), 0.0);
        assert_eq!(to_amount(&json!("")), 0.0);
        assert_eq!(to_amount(&json!(true)), 0.0);
        assert_eq!(to_amount(&json!("-40")), 0.0);
        assert_eq!(to_amount(&json!("NaN")), 0.0);
        assert_eq!(to_amount(&json!("inf")), 0.0);
    }

    #[test]
    fn different_formats_share_a_bucket() {
        let inputs = [
            json!("2025-03-02"),
            json!("2025-03-28T17:45:00Z"),
            json!("2025-03-15T09:00:00.000"),
            json!("2025-03-15 09:00:00"),
            json!("2025/03/09"),
            json!("03/31/2025"),
            json!("March 14, 2025"),
            json!("Mar 14, 2025"),
            json!("14 March 2025"),
            json!("14 Mar 2025"),
            json!("2025-03"),
        ];
        for input in inputs {
            assert_eq!(to_month_key(&input), Some(bucket(2025, 3)), "input {input}");
        }
    }

    #[test]
    fn epoch_millis_are_dates() {
        // 2025-03-01T00:00:00Z
        assert_eq!(
            to_month_key(&json!(1_740_787_200_000_i64)),
            Some(bucket(2025, 3))
        );
        assert_eq!(to_month_key(&json!(1.7407872e12)), Some(bucket(2025, 3)));
        assert_eq!(to_month_key(&json!(1_740_787_200_000.5)), None);
    }

    #[test]
    fn offsets_keep_the_written_calendar_day() {
        assert_eq!(
            to_month_key(&json!("2025-03-31T23:30:00-05:00")),
            Some(bucket(2025, 3))
        );
    }

    #[test]
    fn unusable_dates_have_no_bucket() {
        assert_eq!(to_month_key(&json!(null)), None);
        assert_eq!(to_month_key(&json!("")), None);
        assert_eq!(to_month_key(&json!("not a date")), None);
        assert_eq!(to_month_key(&json!("2025-13-01")), None);
        assert_eq!(to_month_key(&json!({"day": 1})), None);
    }

    #[test]
    fn labels_are_projections_of_the_bucket() {
        let march = bucket(2025, 3);
        assert_eq!(march.label(MonthLabel::Long), "March 2025");
        assert_eq!(march.label(MonthLabel::Short), "Mar-25");
        assert_eq!(bucket(2009, 12).label(MonthLabel::Short), "Dec-09");
        assert_eq!(march.to_string(), "2025-03");
    }

    #[test]
    fn buckets_order_chronologically() {
        let mut months = vec![bucket(2025, 1), bucket(2024, 12), bucket(2024, 2)];
        months.sort();
        assert_eq!(
            months,
            vec![bucket(2024, 2), bucket(2024, 12), bucket(2025, 1)]
        );
    }

    #[test]
    fn parses_month_arguments() {
        assert_eq!("2025-07".parse::<MonthBucket>().unwrap(), bucket(2025, 7));
        assert!("July".parse::<MonthBucket>().is_err());
        assert!("2025-13".parse::<MonthBucket>().is_err());
        assert!(MonthBucket::new(2025, 0).is_none());
    }

    #[test]
    fn identities_are_trimmed_text() {
        assert_eq!(to_text(&json!("  bd-1 ")), Some("bd-1".to_string()));
        assert_eq!(to_text(&json!(42)), Some("42".to_string()));
        assert_eq!(to_text(&json!(" ")), None);
        assert_eq!(to_text(&json!(null)), None);
    }
}
