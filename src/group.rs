use std::fmt;

use serde_json::Value;

use crate::models::{is_present, AchievementRecord, TargetRecord};
use crate::normalize::{self, MonthBucket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupMode {
    ByPerson,
    ByPersonAndMonth,
}

/// Identity of one aggregate. `month` is set only in month-bucketed modes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub person: String,
    pub month: Option<MonthBucket>,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.month {
            Some(month) => write!(f, "{}|{}", self.person, month),
            None => write!(f, "{}", self.person),
        }
    }
}

/// Fields a record must expose to be grouped.
pub trait Attributed {
    fn salesperson_id(&self) -> &Value;
    fn salesperson_name(&self) -> &Value;
    /// The date that decides which month the record lands in.
    fn bucket_date(&self) -> &Value;

    /// Display name, falling back to the id.
    fn display_name(&self) -> Option<String> {
        normalize::to_text(self.salesperson_name())
            .or_else(|| normalize::to_text(self.salesperson_id()))
    }
}

impl Attributed for TargetRecord {
    fn salesperson_id(&self) -> &Value {
        &self.salesperson_id
    }

    fn salesperson_name(&self) -> &Value {
        &self.salesperson_name
    }

    fn bucket_date(&self) -> &Value {
        &self.projection_date
    }
}

impl Attributed for AchievementRecord {
    fn salesperson_id(&self) -> &Value {
        &self.salesperson_id
    }

    fn salesperson_name(&self) -> &Value {
        &self.salesperson_name
    }

    /// Registrations land in the month they were registered; when that date
    /// is missing or unreadable they fall back to the inquiry date.
    fn bucket_date(&self) -> &Value {
        let registered_on = normalize::to_date(&self.registration_date);
        if is_present(&self.registered_amount) && registered_on.is_some() {
            &self.registration_date
        } else {
            &self.inquiry_date
        }
    }
}

/// Person identity: the id when there is one, otherwise the name.
pub fn person_key<R: Attributed>(record: &R) -> Option<String> {
    normalize::to_text(record.salesperson_id())
        .or_else(|| normalize::to_text(record.salesperson_name()))
}

/// `None` drops the record from this grouping: no identity at all, or no
/// usable date when grouping by month.
pub fn key_for<R: Attributed>(record: &R, mode: GroupMode) -> Option<GroupKey> {
    let person = person_key(record)?;
    let month = match mode {
        GroupMode::ByPerson => None,
        GroupMode::ByPersonAndMonth => Some(normalize::to_month_key(record.bucket_date())?),
    };

    Some(GroupKey { person, month })
}
