use std::collections::HashMap;

use crate::group::{self, Attributed, GroupKey, GroupMode};
use crate::models::{is_present, AchievementRecord, Aggregate, TargetRecord};
use crate::normalize;

/// Aggregates keyed by group, in the order each key was first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rollup {
    aggregates: Vec<Aggregate>,
    index: HashMap<GroupKey, usize>,
    /// Records that could not be keyed under the requested mode.
    pub dropped: usize,
}

impl Rollup {
    pub fn get(&self, key: &GroupKey) -> Option<&Aggregate> {
        self.index.get(key).map(|&slot| &self.aggregates[slot])
    }

    pub fn len(&self) -> usize {
        self.aggregates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty()
    }

    pub fn into_aggregates(self) -> Vec<Aggregate> {
        self.aggregates
    }

    /// Get-or-insert for the record's group. `None` when the record has no key.
    fn entry<R: Attributed>(&mut self, record: &R, mode: GroupMode) -> Option<&mut Aggregate> {
        let Some(key) = group::key_for(record, mode) else {
            self.dropped += 1;
            return None;
        };

        let slot = match self.index.get(&key).copied() {
            Some(slot) => slot,
            None => {
                let salesperson_name = record
                    .display_name()
                    .unwrap_or_else(|| key.person.clone());
                self.aggregates.push(Aggregate {
                    key: key.clone(),
                    salesperson_name,
                    target_total: 0.0,
                    projected_total: 0.0,
                    achieved_total: 0.0,
                });
                self.index.insert(key, self.aggregates.len() - 1);
                self.aggregates.len() - 1
            }
        };

        Some(&mut self.aggregates[slot])
    }
}

/// Adds to a running total, saturating at `f64::MAX` instead of reaching infinity.
fn accumulate(total: &mut f64, amount: f64) {
    *total = (*total + amount).min(f64::MAX);
}

/// Folds targets, then achievements, into per-group totals.
pub fn rollup(
    targets: &[TargetRecord],
    achievements: &[AchievementRecord],
    mode: GroupMode,
) -> Rollup {
    let mut result = Rollup::default();

    for target in targets {
        if let Some(entry) = result.entry(target, mode) {
            accumulate(
                &mut entry.target_total,
                normalize::to_amount(&target.target_amount),
            );
            accumulate(
                &mut entry.projected_total,
                normalize::to_amount(&target.projected_amount),
            );
        }
    }

    for achievement in achievements {
        if let Some(entry) = result.entry(achievement, mode) {
            if is_present(&achievement.registered_amount) {
                accumulate(
                    &mut entry.achieved_total,
                    normalize::to_amount(&achievement.registered_amount),
                );
            } else if is_present(&achievement.inquiry_projected_amount) {
                accumulate(
                    &mut entry.projected_total,
                    normalize::to_amount(&achievement.inquiry_projected_amount),
                );
            }
        }
    }

    if result.dropped > 0 {
        tracing::debug!(dropped = result.dropped, ?mode, "records left out of rollup");
    }

    result
}
