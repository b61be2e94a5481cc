use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::group::GroupKey;
use crate::normalize::MonthBucket;
use crate::status::Status;

/// A projection row: a committed target plus a forecast for one BD.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRecord {
    #[serde(default, alias = "bdId")]
    pub salesperson_id: Value,
    #[serde(default, alias = "bdName")]
    pub salesperson_name: Value,
    #[serde(default, alias = "targetVal")]
    pub target_amount: Value,
    #[serde(default, alias = "projVal")]
    pub projected_amount: Value,
    #[serde(default, alias = "projDate")]
    pub projection_date: Value,
}

/// An inquiry row. Registered fields only show up once the inquiry converts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementRecord {
    #[serde(default, alias = "bdId")]
    pub salesperson_id: Value,
    #[serde(default, alias = "bdName")]
    pub salesperson_name: Value,
    #[serde(default, alias = "regisVal")]
    pub registered_amount: Value,
    #[serde(default, alias = "regisDate")]
    pub registration_date: Value,
    #[serde(default, alias = "projVal")]
    pub inquiry_projected_amount: Value,
    #[serde(default, alias = "regDate")]
    pub inquiry_date: Value,
}

/// Running totals for one group key. Built inside a single rollup pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub key: GroupKey,
    pub salesperson_name: String,
    pub target_total: f64,
    pub projected_total: f64,
    pub achieved_total: f64,
}

/// A classified aggregate, ready for a table, a chart or JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupRow {
    pub group_key: String,
    pub salesperson_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<MonthBucket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month_label: Option<String>,
    pub target_total: f64,
    pub projected_total: f64,
    pub achieved_total: f64,
    pub status: Status,
    pub status_label: String,
    pub is_achieved: bool,
    pub progress_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_remaining: Option<f64>,
}

/// True when a raw field carries something other than null or blank text.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.trim().is_empty(),
        _ => true,
    }
}
