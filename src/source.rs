use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;

use crate::models::{AchievementRecord, TargetRecord};

/// Reads a JSON array of records, as the dashboard API returns them.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let records: Vec<T> = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON array of records", path.display()))?;
    tracing::info!(path = %path.display(), records = records.len(), "loaded records");
    Ok(records)
}

/// Either file may be missing from the command line; a missing side is empty.
pub fn load_files(
    targets: Option<&Path>,
    achievements: Option<&Path>,
) -> anyhow::Result<(Vec<TargetRecord>, Vec<AchievementRecord>)> {
    let targets = match targets {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };
    let achievements = match achievements {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };
    Ok((targets, achievements))
}
