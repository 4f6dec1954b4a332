//! Group-by aggregation with deterministic ordering.

use std::collections::HashMap;

use dash_core::models::{Metric, MetricSource};
use serde::Serialize;

/// One (group key, value) pair produced by the aggregators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupTotal {
    /// The group key (a country, continent or province name).
    pub key: String,
    /// The aggregated metric value for the group.
    pub value: u64,
}

/// Sum `metric` per group, sorted descending by sum.
///
/// `key_fn` extracts the group key from a row; rows without a key are
/// skipped, and absent metric values count as zero. Ties keep the order in
/// which the keys first appear in `rows`.
pub fn group_sum<R, F>(rows: &[R], key_fn: F, metric: Metric) -> Vec<GroupTotal>
where
    R: MetricSource,
    F: Fn(&R) -> Option<&str>,
{
    accumulate(rows, key_fn, metric, |slot, value| *slot += value)
}

/// Like [`group_sum`], but ranks groups by their maximum single-row value.
pub fn group_max<R, F>(rows: &[R], key_fn: F, metric: Metric) -> Vec<GroupTotal>
where
    R: MetricSource,
    F: Fn(&R) -> Option<&str>,
{
    accumulate(rows, key_fn, metric, |slot, value| *slot = (*slot).max(value))
}

fn accumulate<R, F, A>(rows: &[R], key_fn: F, metric: Metric, apply: A) -> Vec<GroupTotal>
where
    R: MetricSource,
    F: Fn(&R) -> Option<&str>,
    A: Fn(&mut u64, u64),
{
    // Accumulate in first-appearance order; the stable sort below then keeps
    // that order among equal values.
    let mut groups: Vec<GroupTotal> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let Some(key) = key_fn(row) else { continue };
        let value = row.metric_value(metric).unwrap_or(0);
        match index.get(key) {
            Some(&position) => apply(&mut groups[position].value, value),
            None => {
                index.insert(key.to_string(), groups.len());
                groups.push(GroupTotal {
                    key: key.to_string(),
                    value,
                });
            }
        }
    }

    groups.sort_by(|a, b| b.value.cmp(&a.value));
    groups
}
