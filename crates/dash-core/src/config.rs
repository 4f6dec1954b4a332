/// Countries whose maximum single-row value never exceeds this are dropped
/// from the heatmap as carrying no meaningful data.
pub const MIN_COUNTRY_PEAK: u64 = 50;

/// A pivoted country column is dropped when at least this fraction of its
/// cells is zero.
pub const MAX_ZERO_RATIO: f64 = 0.8;

/// Default number of countries kept by the heatmap's top-N stage.
pub const DEFAULT_TOP_N: usize = 30;

/// Default trend window, in rows (days).
pub const DEFAULT_TREND_WINDOW: usize = 7;

/// Default number of trailing months preselected for the heatmap.
pub const DEFAULT_MONTH_WINDOW: usize = 3;

/// Number of countries in the overview ranking.
pub const OVERVIEW_TOP_COUNTRIES: usize = 10;

/// Number of rows shown in raw-data previews.
pub const PREVIEW_ROWS: usize = 30;

/// Tunable thresholds for the heatmap filtering pipeline.
#[derive(Debug, Clone)]
pub struct HeatmapConfig {
    /// Minimum peak value a country must exceed to stay in the matrix.
    pub min_country_peak: u64,
    /// Zero-cell fraction at which a pivoted column is dropped.
    pub max_zero_ratio: f64,
    /// How many top-ranked countries to keep.
    pub top_n: usize,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            min_country_peak: MIN_COUNTRY_PEAK,
            max_zero_ratio: MAX_ZERO_RATIO,
            top_n: DEFAULT_TOP_N,
        }
    }
}
