//! Heatmap matrix construction.
//!
//! Five ordered filtering stages turn country/province daily rows into a
//! dense date-by-country matrix: month selection, zero-date removal,
//! low-magnitude country removal, top-N ranking, and pivot with sparsity
//! pruning. A stage that leaves no rows stops the pipeline with an outcome
//! naming that stage, so no stage ever computes over an empty table.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::NaiveDate;
use dash_core::config::HeatmapConfig;
use dash_core::dates::YearMonth;
use dash_core::models::{GroupedRecord, Metric, MetricSource};
use serde::Serialize;
use tracing::{debug, warn};

use crate::filters;
use crate::groupby;

// ── Outcome types ─────────────────────────────────────────────────────────────

/// The pipeline stage that left no rows to continue with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EmptyStage {
    /// No rows fall inside the selected months.
    MonthFilter,
    /// Every date sums to zero for the selected metric.
    ZeroDateFilter,
    /// No country's peak value clears the magnitude threshold.
    MagnitudeFilter,
    /// Top-N selection kept nothing.
    TopN,
    /// Every pivoted column was dropped as too sparse.
    SparsityFilter,
}

impl EmptyStage {
    /// User-facing explanation of the empty selection.
    pub fn message(&self) -> &'static str {
        match self {
            EmptyStage::MonthFilter => "No data available for the selected months.",
            EmptyStage::ZeroDateFilter => "No usable data after removing zero-only dates.",
            EmptyStage::MagnitudeFilter => "No usable data after cleaning zero-only countries.",
            EmptyStage::TopN => "No data available for selected filters.",
            EmptyStage::SparsityFilter => {
                "All countries filtered out due to excessive zero values."
            }
        }
    }
}

/// Dense pivot of metric values: dates as rows, countries as columns.
#[derive(Debug, Clone, Serialize)]
pub struct DateCountryMatrix {
    /// Row labels, ascending.
    pub dates: Vec<NaiveDate>,
    /// Column labels, alphabetical.
    pub countries: Vec<String>,
    /// `cells[row][col]` is the summed value for
    /// `(dates[row], countries[col])`; missing combinations hold zero.
    pub cells: Vec<Vec<u64>>,
}

impl DateCountryMatrix {
    /// Fraction of zero cells in column `col`.
    fn zero_fraction(&self, col: usize) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        let zeros = self.cells.iter().filter(|row| row[col] == 0).count();
        zeros as f64 / self.cells.len() as f64
    }
}

/// Result of the heatmap pipeline.
#[derive(Debug, Clone, Serialize)]
pub enum HeatmapOutcome {
    /// The final matrix, ready for rendering.
    Matrix(DateCountryMatrix),
    /// A stage removed every row; nothing to render.
    NoData(EmptyStage),
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Run the five-stage pipeline over `rows`.
pub fn build_matrix(
    rows: &[GroupedRecord],
    months: &[YearMonth],
    metric: Metric,
    config: &HeatmapConfig,
) -> HeatmapOutcome {
    let selected = filters::filter_by_months(rows, months);
    debug!(
        "Heatmap month filter: {} of {} rows kept",
        selected.len(),
        rows.len()
    );
    if selected.is_empty() {
        warn!("Heatmap pipeline emptied at the month filter");
        return HeatmapOutcome::NoData(EmptyStage::MonthFilter);
    }

    let with_signal = drop_zero_dates(&selected, metric);
    if with_signal.is_empty() {
        warn!("Heatmap pipeline emptied at the zero-date filter");
        return HeatmapOutcome::NoData(EmptyStage::ZeroDateFilter);
    }

    let significant = drop_low_magnitude(&with_signal, metric, config.min_country_peak);
    if significant.is_empty() {
        warn!("Heatmap pipeline emptied at the magnitude filter");
        return HeatmapOutcome::NoData(EmptyStage::MagnitudeFilter);
    }

    let ranked = keep_top_countries(&significant, metric, config.top_n);
    if ranked.is_empty() {
        warn!("Heatmap pipeline emptied at top-N selection");
        return HeatmapOutcome::NoData(EmptyStage::TopN);
    }

    let matrix = drop_sparse_columns(pivot(&ranked, metric), config.max_zero_ratio);
    debug!(
        "Heatmap matrix: {} dates x {} countries",
        matrix.dates.len(),
        matrix.countries.len()
    );
    if matrix.countries.is_empty() {
        warn!("Heatmap pipeline emptied at the sparsity filter");
        return HeatmapOutcome::NoData(EmptyStage::SparsityFilter);
    }

    HeatmapOutcome::Matrix(matrix)
}

// ── Stages ────────────────────────────────────────────────────────────────────

/// Drop every date whose metric total across all rows is zero.
fn drop_zero_dates(rows: &[GroupedRecord], metric: Metric) -> Vec<GroupedRecord> {
    let mut date_sums: HashMap<NaiveDate, u64> = HashMap::new();
    for row in rows {
        *date_sums.entry(row.date).or_insert(0) += row.metric_value(metric).unwrap_or(0);
    }
    rows.iter()
        .filter(|row| date_sums.get(&row.date).copied().unwrap_or(0) > 0)
        .cloned()
        .collect()
}

/// Drop every country whose maximum single-row value is at or below
/// `min_peak`.
fn drop_low_magnitude(rows: &[GroupedRecord], metric: Metric, min_peak: u64) -> Vec<GroupedRecord> {
    let peaks = groupby::group_max(rows, |row: &GroupedRecord| Some(row.country.as_str()), metric);
    let keep: HashSet<&str> = peaks
        .iter()
        .filter(|group| group.value > min_peak)
        .map(|group| group.key.as_str())
        .collect();
    rows.iter()
        .filter(|row| keep.contains(row.country.as_str()))
        .cloned()
        .collect()
}

/// Keep only the `top_n` countries ranked by maximum value, descending.
fn keep_top_countries(rows: &[GroupedRecord], metric: Metric, top_n: usize) -> Vec<GroupedRecord> {
    let mut ranked = groupby::group_max(rows, |row: &GroupedRecord| Some(row.country.as_str()), metric);
    ranked.truncate(top_n);
    let keep: HashSet<&str> = ranked.iter().map(|group| group.key.as_str()).collect();
    rows.iter()
        .filter(|row| keep.contains(row.country.as_str()))
        .cloned()
        .collect()
}

/// Pivot rows into the dense matrix, summing duplicate (date, country)
/// pairs.
fn pivot(rows: &[GroupedRecord], metric: Metric) -> DateCountryMatrix {
    let dates: Vec<NaiveDate> = rows
        .iter()
        .map(|row| row.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let countries: Vec<String> = rows
        .iter()
        .map(|row| row.country.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let date_index: HashMap<NaiveDate, usize> =
        dates.iter().enumerate().map(|(i, &d)| (d, i)).collect();
    let country_index: HashMap<&str, usize> = countries
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();

    let mut cells = vec![vec![0u64; countries.len()]; dates.len()];
    for row in rows {
        let r = date_index[&row.date];
        let c = country_index[row.country.as_str()];
        cells[r][c] += row.metric_value(metric).unwrap_or(0);
    }

    DateCountryMatrix {
        dates,
        countries,
        cells,
    }
}

/// Drop columns whose zero-cell fraction reaches `max_zero_ratio`.
fn drop_sparse_columns(matrix: DateCountryMatrix, max_zero_ratio: f64) -> DateCountryMatrix {
    let keep: Vec<usize> = (0..matrix.countries.len())
        .filter(|&col| matrix.zero_fraction(col) < max_zero_ratio)
        .collect();

    if keep.len() == matrix.countries.len() {
        return matrix;
    }

    let countries: Vec<String> = keep
        .iter()
        .map(|&col| matrix.countries[col].clone())
        .collect();
    let cells: Vec<Vec<u64>> = matrix
        .cells
        .iter()
        .map(|row| keep.iter().map(|&col| row[col]).collect())
        .collect();

    DateCountryMatrix {
        dates: matrix.dates,
        countries,
        cells,
    }
}
