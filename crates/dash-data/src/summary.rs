//! Whole-table totals and ratios.

use std::collections::BTreeMap;

use dash_core::models::{Metric, MetricSource};

/// Sum each requested metric across all rows.
///
/// Absent values count as zero, and every requested metric appears in the
/// result, so an empty table yields zero for each.
pub fn totals<R: MetricSource>(rows: &[R], metrics: &[Metric]) -> BTreeMap<Metric, u64> {
    metrics
        .iter()
        .map(|&metric| (metric, metric_sum(rows, metric)))
        .collect()
}

/// Sum a single metric across all rows, absent values counting as zero.
pub fn metric_sum<R: MetricSource>(rows: &[R], metric: Metric) -> u64 {
    rows.iter()
        .filter_map(|row| row.metric_value(metric))
        .sum()
}

/// Percentage `numerator / denominator * 100`.
///
/// Returns `0.0` when `denominator` is zero, so empty or all-zero tables
/// render as zero-percent figures rather than NaN.
pub fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    (numerator as f64 / denominator as f64) * 100.0
}
