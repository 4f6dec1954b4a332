//! Page-level report assembly.
//!
//! One builder per dashboard page turns loaded records and request
//! parameters into a serializable report. Builders never print or format;
//! rendering and JSON output live with the binary.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use dash_core::config::{
    HeatmapConfig, DEFAULT_MONTH_WINDOW, DEFAULT_TREND_WINDOW, OVERVIEW_TOP_COUNTRIES,
    PREVIEW_ROWS,
};
use dash_core::dates::YearMonth;
use dash_core::models::{
    DailyRecord, GlobalRecord, GroupedRecord, Metric, MetricSource, SummaryRecord,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::breakdown::{self, BreakdownOutcome};
use crate::filters;
use crate::groupby::{self, GroupTotal};
use crate::heatmap::{self, HeatmapOutcome};
use crate::summary;
use crate::trend;

// ── Overview page ─────────────────────────────────────────────────────────────

/// One country's totals in the overview table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountrySummaryRow {
    pub country: String,
    pub total_cases: u64,
    pub total_deaths: u64,
    pub total_recovered: u64,
}

/// Global overview built from the per-country snapshot table.
#[derive(Debug, Clone, Serialize)]
pub struct OverviewReport {
    pub total_cases: u64,
    pub total_deaths: u64,
    pub total_recovered: u64,
    /// Deaths as a percentage of cases, zero when there are no cases.
    pub mortality_rate: f64,
    /// Recoveries as a percentage of cases, zero when there are no cases.
    pub recovery_rate: f64,
    /// The highest-case countries, descending.
    pub top_countries: Vec<GroupTotal>,
    /// Per-continent case totals, absent when no row carries a continent.
    pub continent_shares: Option<Vec<GroupTotal>>,
    /// Every country, sorted descending by cases.
    pub table: Vec<CountrySummaryRow>,
}

/// Build the overview page from the snapshot table.
pub fn overview_report(rows: &[SummaryRecord]) -> OverviewReport {
    debug!("Building overview over {} countries", rows.len());
    let total_cases = summary::metric_sum(rows, Metric::Confirmed);
    let total_deaths = summary::metric_sum(rows, Metric::Deaths);
    let total_recovered = summary::metric_sum(rows, Metric::Recovered);

    let mut top_countries = groupby::group_sum(
        rows,
        |row: &SummaryRecord| Some(row.country.as_str()),
        Metric::Confirmed,
    );
    top_countries.truncate(OVERVIEW_TOP_COUNTRIES);

    let continent_shares = if rows.iter().any(|row| row.continent.is_some()) {
        Some(groupby::group_sum(
            rows,
            |row: &SummaryRecord| row.continent.as_deref(),
            Metric::Confirmed,
        ))
    } else {
        None
    };

    let mut table: Vec<CountrySummaryRow> = rows
        .iter()
        .map(|row| CountrySummaryRow {
            country: row.country.clone(),
            total_cases: row.total_cases,
            total_deaths: row.total_deaths,
            total_recovered: row.total_recovered,
        })
        .collect();
    table.sort_by(|a, b| b.total_cases.cmp(&a.total_cases));

    OverviewReport {
        total_cases,
        total_deaths,
        total_recovered,
        mortality_rate: summary::ratio(total_deaths, total_cases),
        recovery_rate: summary::ratio(total_recovered, total_cases),
        top_countries,
        continent_shares,
        table,
    }
}

// ── Country page ──────────────────────────────────────────────────────────────

/// Request parameters for the country page.
#[derive(Debug, Clone)]
pub struct CountryParams {
    /// Country to focus on; defaults to the alphabetically first one.
    pub country: Option<String>,
    /// Countries for the comparison series; defaults to the focus country.
    pub compare: Vec<String>,
    /// Range start; defaults to the earliest date in the table.
    pub start: Option<NaiveDate>,
    /// Range end; defaults to the latest date in the table.
    pub end: Option<NaiveDate>,
    /// Trend window in days.
    pub window: usize,
}

impl Default for CountryParams {
    fn default() -> Self {
        CountryParams {
            country: None,
            compare: Vec::new(),
            start: None,
            end: None,
            window: DEFAULT_TREND_WINDOW,
        }
    }
}

/// Per-date totals for one country, provinces collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub confirmed: u64,
    pub deaths: u64,
    pub recovered: u64,
}

impl MetricSource for SeriesPoint {
    fn metric_value(&self, metric: Metric) -> Option<u64> {
        match metric {
            Metric::Confirmed => Some(self.confirmed),
            Metric::Deaths => Some(self.deaths),
            Metric::Recovered => Some(self.recovered),
            _ => None,
        }
    }
}

/// Latest-date headline numbers for the focus country.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CountryKpis {
    pub date: NaiveDate,
    pub confirmed: u64,
    pub deaths: u64,
    pub recovered: u64,
    /// Deaths as a percentage of cases, zero when there are no cases.
    pub mortality_rate: f64,
}

/// Change over the trailing trend window.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TrendSummary {
    /// Effective window after clamping to the series length.
    pub window: usize,
    pub confirmed: i64,
    pub deaths: i64,
    pub recovered: i64,
}

/// Per-country maxima over the selected range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryExtremes {
    pub country: String,
    pub confirmed: u64,
    pub deaths: u64,
}

/// The country page: focus series, comparison series and world extremes.
#[derive(Debug, Clone, Serialize)]
pub struct CountryReport {
    pub country: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Absent when the focus country has no rows in the range.
    pub kpis: Option<CountryKpis>,
    /// Absent when the focus series has fewer than two points.
    pub trends: Option<TrendSummary>,
    /// Focus-country series, ascending by date.
    pub series: Vec<SeriesPoint>,
    /// Comparison series keyed by country name.
    pub comparison: BTreeMap<String, Vec<SeriesPoint>>,
    /// Per-country maxima over the range, sorted by name.
    pub world: Vec<CountryExtremes>,
}

/// Build the country page from the daily table.
///
/// Returns `None` only when the table itself is empty; a selection that
/// matches nothing still produces a report with the empty sections marked.
pub fn country_report(rows: &[DailyRecord], params: &CountryParams) -> Option<CountryReport> {
    let Some((first_date, last_date)) = filters::date_bounds(rows) else {
        warn!("Country page requested over an empty daily table");
        return None;
    };
    let start = params.start.unwrap_or(first_date);
    let end = params.end.unwrap_or(last_date);
    let in_range = filters::filter_by_date_range(rows, start, end);

    let country = match params.country.clone() {
        Some(country) => country,
        None => first_country(rows, |row: &DailyRecord| row.country.as_str())?,
    };
    debug!("Building country page for {} ({} to {})", country, start, end);

    let history: Vec<DailyRecord> = in_range
        .iter()
        .filter(|row| row.country == country)
        .cloned()
        .collect();
    let series = daily_series(&history);
    if series.is_empty() {
        warn!("No rows for {} between {} and {}", country, start, end);
    }

    let kpis = series.last().map(|latest| CountryKpis {
        date: latest.date,
        confirmed: latest.confirmed,
        deaths: latest.deaths,
        recovered: latest.recovered,
        mortality_rate: summary::ratio(latest.deaths, latest.confirmed),
    });
    let trends = trend_summary(&series, params.window);

    let compare = if params.compare.is_empty() {
        vec![country.clone()]
    } else {
        params.compare.clone()
    };
    let allowed: HashSet<String> = compare.into_iter().collect();
    let compared = filters::filter_by_membership(
        &in_range,
        |row: &DailyRecord| Some(row.country.as_str()),
        &allowed,
    );
    let mut grouped: BTreeMap<String, Vec<DailyRecord>> = BTreeMap::new();
    for row in compared {
        grouped.entry(row.country.clone()).or_default().push(row);
    }
    let comparison: BTreeMap<String, Vec<SeriesPoint>> = grouped
        .into_iter()
        .map(|(name, country_rows)| (name, daily_series(&country_rows)))
        .collect();

    Some(CountryReport {
        country,
        start,
        end,
        kpis,
        trends,
        series,
        comparison,
        world: country_extremes(&in_range),
    })
}

/// Deltas over the trailing window, or `None` below two points.
fn trend_summary(series: &[SeriesPoint], window: usize) -> Option<TrendSummary> {
    if series.len() < 2 {
        return None;
    }
    Some(TrendSummary {
        window: window.min(series.len()),
        confirmed: trend::windowed_delta(series, Metric::Confirmed, window).ok()?,
        deaths: trend::windowed_delta(series, Metric::Deaths, window).ok()?,
        recovered: trend::windowed_delta(series, Metric::Recovered, window).ok()?,
    })
}

/// Collapse daily rows into one point per date, summing across provinces.
fn daily_series(rows: &[DailyRecord]) -> Vec<SeriesPoint> {
    let mut by_date: BTreeMap<NaiveDate, SeriesPoint> = BTreeMap::new();
    for row in rows {
        let point = by_date.entry(row.date).or_insert(SeriesPoint {
            date: row.date,
            confirmed: 0,
            deaths: 0,
            recovered: 0,
        });
        point.confirmed += row.confirmed;
        point.deaths += row.deaths;
        point.recovered += row.recovered;
    }
    by_date.into_values().collect()
}

/// Per-country maximum confirmed and deaths, sorted by country name.
fn country_extremes(rows: &[DailyRecord]) -> Vec<CountryExtremes> {
    let mut maxima: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for row in rows {
        let entry = maxima.entry(row.country.as_str()).or_insert((0, 0));
        entry.0 = entry.0.max(row.confirmed);
        entry.1 = entry.1.max(row.deaths);
    }
    maxima
        .into_iter()
        .map(|(country, (confirmed, deaths))| CountryExtremes {
            country: country.to_string(),
            confirmed,
            deaths,
        })
        .collect()
}

// ── Trends page ───────────────────────────────────────────────────────────────

/// Latest-date global headline numbers.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GlobalSnapshot {
    pub date: NaiveDate,
    pub confirmed: u64,
    pub deaths: u64,
    pub recovered: u64,
    pub new_cases: u64,
    pub new_deaths: u64,
    /// Deaths as a percentage of cases, zero when there are no cases.
    pub mortality_rate: f64,
}

/// The global trends page.
#[derive(Debug, Clone, Serialize)]
pub struct TrendsReport {
    /// Absent when the global table is empty.
    pub latest: Option<GlobalSnapshot>,
    /// Full global series, ascending by date.
    pub series: Vec<GlobalRecord>,
    /// Whether any row carries a growth-rate value.
    pub has_growth_rate: bool,
    /// The first rows of the series, for tabular preview.
    pub preview: Vec<GlobalRecord>,
}

/// Build the trends page from the global daily table.
pub fn trends_report(rows: &[GlobalRecord]) -> TrendsReport {
    let mut series = rows.to_vec();
    series.sort_by_key(|row| row.date);
    debug!("Building trends page over {} days", series.len());

    let latest = series.last().map(|row| GlobalSnapshot {
        date: row.date,
        confirmed: row.confirmed,
        deaths: row.deaths,
        recovered: row.recovered,
        new_cases: row.new_cases,
        new_deaths: row.new_deaths,
        mortality_rate: summary::ratio(row.deaths, row.confirmed),
    });
    let has_growth_rate = series.iter().any(|row| row.growth_rate.is_some());
    let preview: Vec<GlobalRecord> = series.iter().take(PREVIEW_ROWS).cloned().collect();

    TrendsReport {
        latest,
        series,
        has_growth_rate,
        preview,
    }
}

// ── Heatmap page ──────────────────────────────────────────────────────────────

/// Request parameters for the heatmap page.
#[derive(Debug, Clone)]
pub struct HeatmapParams {
    /// Months to include; defaults to the most recent ones in the table.
    pub months: Vec<YearMonth>,
    /// Metric to pivot.
    pub metric: Metric,
    /// Country for the detail section; defaults to the alphabetically
    /// first one.
    pub country: Option<String>,
    /// Pipeline thresholds.
    pub config: HeatmapConfig,
}

impl Default for HeatmapParams {
    fn default() -> Self {
        HeatmapParams {
            months: Vec::new(),
            metric: Metric::Confirmed,
            country: None,
            config: HeatmapConfig::default(),
        }
    }
}

/// One date's metric total in the country detail series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatedValue {
    pub date: NaiveDate,
    pub value: u64,
}

/// Month-filtered daily sums for the detail country.
#[derive(Debug, Clone, Serialize)]
pub struct CountryDetail {
    pub country: String,
    /// Daily metric sums, ascending by date.
    pub series: Vec<DatedValue>,
    /// Whether the series is empty or sums to zero.
    pub no_signal: bool,
}

/// The heatmap page: matrix outcome plus the country detail sections.
#[derive(Debug, Clone, Serialize)]
pub struct HeatmapReport {
    /// Months the pipeline actually ran over, ascending.
    pub months: Vec<YearMonth>,
    pub metric: Metric,
    pub outcome: HeatmapOutcome,
    /// Absent only when the table is empty.
    pub country_detail: Option<CountryDetail>,
    /// Absent when there is no detail country or its series has no signal.
    pub breakdown: Option<BreakdownOutcome>,
}

/// Build the heatmap page from the country/province table.
pub fn heatmap_report(rows: &[GroupedRecord], params: &HeatmapParams) -> HeatmapReport {
    let months = if params.months.is_empty() {
        let mut all = filters::months_present(rows);
        let tail_from = all.len().saturating_sub(DEFAULT_MONTH_WINDOW);
        all.split_off(tail_from)
    } else {
        let mut months = params.months.clone();
        months.sort();
        months.dedup();
        months
    };
    debug!("Building heatmap over {} month(s)", months.len());

    let outcome = heatmap::build_matrix(rows, &months, params.metric, &params.config);

    let detail_country = params
        .country
        .clone()
        .or_else(|| first_country(rows, |row: &GroupedRecord| row.country.as_str()));
    let (country_detail, breakdown) = match detail_country {
        Some(country) => {
            let country_rows: Vec<GroupedRecord> = rows
                .iter()
                .filter(|row| row.country == country)
                .cloned()
                .collect();
            let in_months = filters::filter_by_months(&country_rows, &months);
            let series = metric_series(&in_months, params.metric);
            let no_signal = series.iter().all(|point| point.value == 0);
            if no_signal {
                warn!("No {} signal for {} in the selected months", params.metric.as_str(), country);
            }
            let breakdown = if no_signal {
                None
            } else {
                Some(breakdown::latest_breakdown(&in_months, params.metric))
            };
            let detail = CountryDetail {
                country,
                series,
                no_signal,
            };
            (Some(detail), breakdown)
        }
        None => (None, None),
    };

    HeatmapReport {
        months,
        metric: params.metric,
        outcome,
        country_detail,
        breakdown,
    }
}

/// Daily metric sums across provinces, ascending by date.
fn metric_series(rows: &[GroupedRecord], metric: Metric) -> Vec<DatedValue> {
    let mut by_date: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for row in rows {
        *by_date.entry(row.date).or_insert(0) += row.metric_value(metric).unwrap_or(0);
    }
    by_date
        .into_iter()
        .map(|(date, value)| DatedValue { date, value })
        .collect()
}

// ── Shared helpers ────────────────────────────────────────────────────────────

/// Alphabetically first country name in `rows`.
fn first_country<R, F>(rows: &[R], key_fn: F) -> Option<String>
where
    F: Fn(&R) -> &str,
{
    rows.iter().map(|row| key_fn(row)).min().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heatmap::EmptyStage;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, m, d).unwrap()
    }

    fn daily(country: &str, m: u32, d: u32, c: u64, deaths: u64, r: u64) -> DailyRecord {
        DailyRecord {
            country: country.to_string(),
            province: None,
            date: date(m, d),
            confirmed: c,
            deaths,
            recovered: r,
        }
    }

    fn snapshot(country: &str, continent: Option<&str>, cases: u64, deaths: u64, recovered: u64) -> SummaryRecord {
        SummaryRecord {
            country: country.to_string(),
            continent: continent.map(str::to_string),
            total_cases: cases,
            total_deaths: deaths,
            total_recovered: recovered,
        }
    }

    fn global(m: u32, d: u32, c: u64, deaths: u64, r: u64) -> GlobalRecord {
        GlobalRecord {
            date: date(m, d),
            confirmed: c,
            deaths,
            recovered: r,
            new_cases: 0,
            new_deaths: 0,
            growth_rate: None,
        }
    }

    fn grouped(country: &str, province: Option<&str>, m: u32, d: u32, confirmed: u64) -> GroupedRecord {
        GroupedRecord {
            country: country.to_string(),
            province: province.map(str::to_string),
            date: date(m, d),
            confirmed,
            deaths: 0,
            recovered: 0,
            active: 0,
        }
    }

    // ── Overview ──────────────────────────────────────────────────────────────

    #[test]
    fn test_overview_totals_and_rates() {
        let rows = vec![
            snapshot("Alpha", None, 100, 10, 80),
            snapshot("Beta", None, 0, 0, 0),
        ];
        let report = overview_report(&rows);
        assert_eq!(report.total_cases, 100);
        assert_eq!(report.total_deaths, 10);
        assert_eq!(report.total_recovered, 80);
        assert!((report.mortality_rate - 10.0).abs() < 1e-9);
        assert!((report.recovery_rate - 80.0).abs() < 1e-9);
        assert!(report.continent_shares.is_none());
        assert_eq!(report.top_countries[0].key, "Alpha");
        assert_eq!(report.table[0].country, "Alpha");
        assert_eq!(report.table.len(), 2);
    }

    #[test]
    fn test_overview_empty_table() {
        let report = overview_report(&[]);
        assert_eq!(report.total_cases, 0);
        assert!((report.mortality_rate - 0.0).abs() < 1e-9);
        assert!(report.top_countries.is_empty());
        assert!(report.table.is_empty());
    }

    #[test]
    fn test_overview_continent_shares() {
        let rows = vec![
            snapshot("France", Some("Europe"), 100, 0, 0),
            snapshot("Italy", Some("Europe"), 50, 0, 0),
            snapshot("Japan", Some("Asia"), 60, 0, 0),
        ];
        let shares = overview_report(&rows).continent_shares.unwrap();
        assert_eq!(shares[0].key, "Europe");
        assert_eq!(shares[0].value, 150);
        assert_eq!(shares[1].key, "Asia");
        assert_eq!(shares[1].value, 60);
    }

    #[test]
    fn test_overview_top_countries_capped() {
        let rows: Vec<SummaryRecord> = (0..12)
            .map(|i| snapshot(&format!("Country{:02}", i), None, 100 + i, 0, 0))
            .collect();
        let report = overview_report(&rows);
        assert_eq!(report.top_countries.len(), 10);
        assert_eq!(report.top_countries[0].value, 111);
        assert_eq!(report.table.len(), 12);
    }

    // ── Country ───────────────────────────────────────────────────────────────

    #[test]
    fn test_country_report_windowed_deltas() {
        let rows = vec![daily("US", 1, 1, 10, 1, 0), daily("US", 1, 8, 50, 5, 20)];
        let params = CountryParams {
            country: Some("US".to_string()),
            ..CountryParams::default()
        };
        let report = country_report(&rows, &params).unwrap();

        let kpis = report.kpis.unwrap();
        assert_eq!(kpis.date, date(1, 8));
        assert_eq!(kpis.confirmed, 50);
        assert!((kpis.mortality_rate - 10.0).abs() < 1e-9);

        let trends = report.trends.unwrap();
        assert_eq!(trends.window, 2);
        assert_eq!(trends.confirmed, 40);
        assert_eq!(trends.deaths, 4);
        assert_eq!(trends.recovered, 20);
        assert_eq!(report.series.len(), 2);
    }

    #[test]
    fn test_country_report_empty_table_is_none() {
        assert!(country_report(&[], &CountryParams::default()).is_none());
    }

    #[test]
    fn test_country_report_out_of_range_selection() {
        let rows = vec![daily("US", 3, 1, 100, 10, 0)];
        let params = CountryParams {
            country: Some("US".to_string()),
            start: Some(date(5, 1)),
            end: Some(date(5, 31)),
            ..CountryParams::default()
        };
        let report = country_report(&rows, &params).unwrap();
        assert!(report.kpis.is_none());
        assert!(report.trends.is_none());
        assert!(report.series.is_empty());
        assert!(report.comparison.is_empty());
        assert!(report.world.is_empty());
    }

    #[test]
    fn test_country_report_defaults_to_first_alphabetical() {
        let rows = vec![daily("Brazil", 3, 1, 5, 0, 0), daily("Albania", 3, 1, 3, 0, 0)];
        let report = country_report(&rows, &CountryParams::default()).unwrap();
        assert_eq!(report.country, "Albania");
    }

    #[test]
    fn test_country_report_collapses_provinces() {
        let mut quebec = daily("Canada", 3, 1, 10, 1, 2);
        quebec.province = Some("Quebec".to_string());
        let mut ontario = daily("Canada", 3, 1, 15, 2, 3);
        ontario.province = Some("Ontario".to_string());
        let params = CountryParams {
            country: Some("Canada".to_string()),
            ..CountryParams::default()
        };
        let report = country_report(&[quebec, ontario], &params).unwrap();
        assert_eq!(report.series.len(), 1);
        assert_eq!(report.series[0].confirmed, 25);
        assert_eq!(report.kpis.unwrap().deaths, 3);
    }

    #[test]
    fn test_country_report_comparison_defaults_to_focus() {
        let rows = vec![daily("US", 3, 1, 5, 0, 0), daily("Brazil", 3, 1, 7, 0, 0)];
        let params = CountryParams {
            country: Some("US".to_string()),
            ..CountryParams::default()
        };
        let report = country_report(&rows, &params).unwrap();
        let keys: Vec<&str> = report.comparison.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["US"]);
    }

    #[test]
    fn test_country_report_comparison_lists_each_country() {
        let rows = vec![
            daily("US", 3, 1, 5, 0, 0),
            daily("US", 3, 2, 8, 0, 0),
            daily("Brazil", 3, 1, 7, 0, 0),
            daily("India", 3, 1, 9, 0, 0),
        ];
        let params = CountryParams {
            country: Some("US".to_string()),
            compare: vec!["Brazil".to_string(), "US".to_string()],
            ..CountryParams::default()
        };
        let report = country_report(&rows, &params).unwrap();
        let keys: Vec<&str> = report.comparison.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Brazil", "US"]);
        assert_eq!(report.comparison["US"].len(), 2);
    }

    #[test]
    fn test_country_report_world_extremes_use_selected_range() {
        let rows = vec![
            daily("US", 3, 1, 100, 10, 0),
            daily("US", 3, 5, 200, 5, 0),
            daily("US", 4, 1, 900, 90, 0),
            daily("Brazil", 3, 2, 50, 1, 0),
        ];
        let params = CountryParams {
            country: Some("US".to_string()),
            start: Some(date(3, 1)),
            end: Some(date(3, 31)),
            ..CountryParams::default()
        };
        let report = country_report(&rows, &params).unwrap();
        assert_eq!(
            report.world,
            vec![
                CountryExtremes {
                    country: "Brazil".to_string(),
                    confirmed: 50,
                    deaths: 1,
                },
                CountryExtremes {
                    country: "US".to_string(),
                    confirmed: 200,
                    deaths: 10,
                },
            ]
        );
    }

    // ── Trends ────────────────────────────────────────────────────────────────

    #[test]
    fn test_trends_report_latest_snapshot() {
        let mut early = global(1, 1, 100, 5, 20);
        early.new_cases = 100;
        let mut late = global(1, 2, 250, 10, 80);
        late.new_cases = 150;
        late.new_deaths = 5;

        // Input deliberately unsorted.
        let report = trends_report(&[late, early]);
        let latest = report.latest.unwrap();
        assert_eq!(latest.date, date(1, 2));
        assert_eq!(latest.confirmed, 250);
        assert_eq!(latest.new_cases, 150);
        assert_eq!(latest.new_deaths, 5);
        assert!((latest.mortality_rate - 4.0).abs() < 1e-9);
        assert_eq!(report.series[0].date, date(1, 1));
    }

    #[test]
    fn test_trends_report_empty_table() {
        let report = trends_report(&[]);
        assert!(report.latest.is_none());
        assert!(report.series.is_empty());
        assert!(report.preview.is_empty());
        assert!(!report.has_growth_rate);
    }

    #[test]
    fn test_trends_report_growth_rate_detection() {
        let mut row = global(1, 1, 10, 0, 0);
        row.growth_rate = Some(1.5);
        assert!(trends_report(&[row]).has_growth_rate);
    }

    #[test]
    fn test_trends_report_preview_truncates() {
        let rows: Vec<GlobalRecord> = (0..35)
            .map(|i| {
                let mut row = global(1, 1, 10, 0, 0);
                row.date = date(1, 1) + chrono::Days::new(i);
                row
            })
            .collect();
        let report = trends_report(&rows);
        assert_eq!(report.series.len(), 35);
        assert_eq!(report.preview.len(), PREVIEW_ROWS);
        assert_eq!(report.preview[0].date, date(1, 1));
    }

    // ── Heatmap ───────────────────────────────────────────────────────────────

    #[test]
    fn test_heatmap_report_defaults_to_recent_months() {
        let rows: Vec<GroupedRecord> = (1..=5)
            .map(|m| grouped("US", None, m, 1, 100))
            .collect();
        let report = heatmap_report(&rows, &HeatmapParams::default());
        let months: Vec<(i32, u32)> = report.months.iter().map(|m| (m.year, m.month)).collect();
        assert_eq!(months, vec![(2020, 3), (2020, 4), (2020, 5)]);
    }

    #[test]
    fn test_heatmap_report_month_default_with_short_history() {
        let rows = vec![grouped("US", None, 1, 1, 100), grouped("US", None, 2, 1, 100)];
        let report = heatmap_report(&rows, &HeatmapParams::default());
        assert_eq!(report.months.len(), 2);
    }

    #[test]
    fn test_heatmap_report_sorts_and_dedups_explicit_months() {
        let rows = vec![grouped("US", None, 3, 1, 100)];
        let params = HeatmapParams {
            months: vec![
                YearMonth { year: 2020, month: 4 },
                YearMonth { year: 2020, month: 3 },
                YearMonth { year: 2020, month: 4 },
            ],
            ..HeatmapParams::default()
        };
        let report = heatmap_report(&rows, &params);
        let months: Vec<u32> = report.months.iter().map(|m| m.month).collect();
        assert_eq!(months, vec![3, 4]);
    }

    #[test]
    fn test_heatmap_report_matrix_and_default_detail() {
        let rows = vec![
            grouped("Austria", None, 3, 1, 60),
            grouped("Austria", None, 3, 2, 70),
            grouped("Belgium", None, 3, 1, 80),
            grouped("Belgium", None, 3, 2, 90),
        ];
        let report = heatmap_report(&rows, &HeatmapParams::default());

        match &report.outcome {
            HeatmapOutcome::Matrix(matrix) => {
                assert_eq!(matrix.countries, vec!["Austria", "Belgium"]);
            }
            HeatmapOutcome::NoData(stage) => panic!("unexpected NoData({:?})", stage),
        }

        let detail = report.country_detail.unwrap();
        assert_eq!(detail.country, "Austria");
        assert!(!detail.no_signal);
        assert_eq!(
            detail.series,
            vec![
                DatedValue { date: date(3, 1), value: 60 },
                DatedValue { date: date(3, 2), value: 70 },
            ]
        );
        assert!(matches!(report.breakdown, Some(BreakdownOutcome::NotApplicable)));
    }

    #[test]
    fn test_heatmap_report_detail_without_signal() {
        let rows = vec![
            grouped("Austria", None, 3, 1, 0),
            grouped("Belgium", None, 3, 1, 100),
        ];
        let report = heatmap_report(&rows, &HeatmapParams::default());
        let detail = report.country_detail.unwrap();
        assert_eq!(detail.country, "Austria");
        assert!(detail.no_signal);
        assert!(report.breakdown.is_none());
    }

    #[test]
    fn test_heatmap_report_breakdown_with_provinces() {
        let rows = vec![
            grouped("Canada", Some("Quebec"), 3, 1, 60),
            grouped("Canada", Some("Ontario"), 3, 1, 80),
            grouped("Canada", Some("Quebec"), 3, 2, 65),
            grouped("Canada", Some("Ontario"), 3, 2, 85),
        ];
        let report = heatmap_report(&rows, &HeatmapParams::default());
        match report.breakdown {
            Some(BreakdownOutcome::Breakdown(breakdown)) => {
                assert_eq!(breakdown.date, date(3, 2));
                assert_eq!(breakdown.rows[0].key, "Ontario");
                assert_eq!(breakdown.rows[0].value, 85);
            }
            other => panic!("expected Breakdown, got {:?}", other),
        }
    }

    #[test]
    fn test_heatmap_report_explicit_country() {
        let rows = vec![
            grouped("Austria", None, 3, 1, 60),
            grouped("US", None, 3, 1, 80),
        ];
        let params = HeatmapParams {
            country: Some("US".to_string()),
            ..HeatmapParams::default()
        };
        let report = heatmap_report(&rows, &params);
        assert_eq!(report.country_detail.unwrap().country, "US");
    }

    #[test]
    fn test_heatmap_report_carries_pipeline_outcome() {
        let rows = vec![grouped("US", None, 3, 1, 100)];
        let params = HeatmapParams {
            months: vec![YearMonth { year: 2021, month: 1 }],
            ..HeatmapParams::default()
        };
        let report = heatmap_report(&rows, &params);
        assert!(matches!(
            report.outcome,
            HeatmapOutcome::NoData(EmptyStage::MonthFilter)
        ));
        let detail = report.country_detail.unwrap();
        assert!(detail.no_signal);
        assert!(detail.series.is_empty());
    }

    #[test]
    fn test_reports_serialize_to_json() {
        let overview = overview_report(&[snapshot("Alpha", Some("Europe"), 10, 1, 2)]);
        let json = serde_json::to_string(&overview).unwrap();
        assert!(json.contains("\"total_cases\":10"));

        let heatmap = heatmap_report(
            &[grouped("US", None, 3, 1, 100)],
            &HeatmapParams::default(),
        );
        let json = serde_json::to_string(&heatmap).unwrap();
        assert!(json.contains("\"2020-03\""));
    }
}
