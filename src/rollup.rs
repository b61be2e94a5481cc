use clap::ValueEnum;

use crate::aggregate;
use crate::group::{Attributed, GroupMode};
use crate::models::{AchievementRecord, RollupRow, TargetRecord};
use crate::normalize::{self, MonthBucket, MonthLabel};
use crate::sort::{self, RowOrder};
use crate::status::{self, Basis};

/// One dashboard call site: how records are grouped, measured and ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// Target vs achieved per salesperson
    Performance,
    /// Inquiry pipeline vs achieved per salesperson
    Pipeline,
    /// Achieved vs projected per salesperson and month
    Monthly,
}

impl View {
    pub fn mode(&self) -> GroupMode {
        match self {
            Self::Performance | Self::Pipeline => GroupMode::ByPerson,
            Self::Monthly => GroupMode::ByPersonAndMonth,
        }
    }

    pub fn basis(&self) -> Basis {
        match self {
            Self::Performance => Basis::Target,
            Self::Pipeline | Self::Monthly => Basis::Projected,
        }
    }

    pub fn order(&self) -> RowOrder {
        match self {
            Self::Performance | Self::Pipeline => RowOrder::ByPerformance,
            Self::Monthly => RowOrder::ByMonthThenName,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Performance => "Target vs Achieved",
            Self::Pipeline => "Pipeline vs Achieved",
            Self::Monthly => "Monthly Achieved vs Projected",
        }
    }

    fn reports_remaining(&self) -> bool {
        matches!(self, Self::Performance)
    }
}

/// Narrows both record streams before a rollup.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    /// Matches a salesperson id or name, ignoring case.
    pub salesperson: Option<String>,
    /// Keeps records whose bucketing date falls in this month.
    pub month: Option<MonthBucket>,
}

impl RecordFilter {
    pub fn is_empty(&self) -> bool {
        self.salesperson.is_none() && self.month.is_none()
    }

    pub fn matches<R: Attributed>(&self, record: &R) -> bool {
        if let Some(wanted) = &self.salesperson {
            let wanted = wanted.trim().to_lowercase();
            let same = |raw: &serde_json::Value| {
                normalize::to_text(raw)
                    .is_some_and(|text| text.to_lowercase() == wanted)
            };
            if !same(record.salesperson_id()) && !same(record.salesperson_name()) {
                return false;
            }
        }

        if let Some(month) = self.month {
            match normalize::to_date(record.bucket_date()) {
                Some(date) if month.contains(date) => {}
                _ => return false,
            }
        }

        true
    }

    pub fn apply<R: Attributed + Clone>(&self, records: &[R]) -> Vec<R> {
        records
            .iter()
            .filter(|record| self.matches(*record))
            .cloned()
            .collect()
    }
}

/// Runs a full pass: group, total, classify, order. Pure and repeatable.
pub fn compute(
    targets: &[TargetRecord],
    achievements: &[AchievementRecord],
    view: View,
    label: MonthLabel,
) -> Vec<RollupRow> {
    let basis = view.basis();
    let totals = aggregate::rollup(targets, achievements, view.mode());
    tracing::debug!(
        ?view,
        groups = totals.len(),
        dropped = totals.dropped,
        "rolled up records"
    );
    if totals.is_empty() {
        return Vec::new();
    }

    let mut rows: Vec<RollupRow> = totals
        .into_aggregates()
        .into_iter()
        .map(|aggregate| {
            let classification = status::classify(&aggregate, basis);
            let percent_remaining = view
                .reports_remaining()
                .then(|| status::percent_remaining(&aggregate, basis));

            RollupRow {
                group_key: aggregate.key.to_string(),
                month_label: aggregate.key.month.map(|month| month.label(label)),
                month: aggregate.key.month,
                status_label: classification.label().to_string(),
                status: classification.status,
                is_achieved: classification.is_achieved,
                progress_percent: classification.progress_percent,
                percent_remaining,
                salesperson_name: aggregate.salesperson_name,
                target_total: aggregate.target_total,
                projected_total: aggregate.projected_total,
                achieved_total: aggregate.achieved_total,
            }
        })
        .collect();

    sort::sort_rows(&mut rows, view.order());
    rows
}

/// Filters, then computes. Used by the command line and the report.
pub fn compute_filtered(
    targets: &[TargetRecord],
    achievements: &[AchievementRecord],
    view: View,
    label: MonthLabel,
    filter: &RecordFilter,
) -> Vec<RollupRow> {
    if filter.is_empty() {
        return compute(targets, achievements, view, label);
    }

    let targets = filter.apply(targets);
    let achievements = filter.apply(achievements);
    tracing::debug!(
        targets = targets.len(),
        achievements = achievements.len(),
        ?filter,
        "records after filter"
    );
    compute(&targets, &achievements, view, label)
}
