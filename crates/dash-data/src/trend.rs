//! Trend-window differencing over time series.

use dash_core::error::{DashError, Result};
use dash_core::models::{Metric, MetricSource};

/// Change of `metric` across the last `window` rows of `series`.
///
/// The series must belong to a single entity and be sorted ascending by
/// date. The window is clamped to the series length; the result is the last
/// row's value minus the first windowed row's value, and can be negative.
///
/// Fewer than two rows, or a window below 2, yields
/// [`DashError::InsufficientData`]. Callers should check for an empty
/// series up front and report "no data" instead of leaning on this error.
pub fn windowed_delta<R: MetricSource>(
    series: &[R],
    metric: Metric,
    window: usize,
) -> Result<i64> {
    if series.len() < 2 || window < 2 {
        return Err(DashError::InsufficientData {
            rows: series.len(),
            window,
        });
    }

    let span = window.min(series.len());
    let tail = &series[series.len() - span..];
    let first = tail[0].metric_value(metric).unwrap_or(0) as i64;
    let last = tail[span - 1].metric_value(metric).unwrap_or(0) as i64;
    Ok(last - first)
}
