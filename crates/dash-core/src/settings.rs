use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{DEFAULT_TOP_N, DEFAULT_TREND_WINDOW};
use crate::dates::YearMonth;
use crate::error::{DashError, Result};

// ── Page ──────────────────────────────────────────────────────────────────────

/// The four dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Overview,
    Country,
    Trends,
    Heatmap,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Overview => "overview",
            Page::Country => "country",
            Page::Trends => "trends",
            Page::Heatmap => "heatmap",
        }
    }
}

impl FromStr for Page {
    type Err = DashError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "overview" => Ok(Page::Overview),
            "country" => Ok(Page::Country),
            "trends" => Ok(Page::Trends),
            "heatmap" => Ok(Page::Heatmap),
            other => Err(DashError::UnknownPage(other.to_string())),
        }
    }
}

// ── Settings ──────────────────────────────────────────────────────────────────

/// Command line settings.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "covid-dash",
    about = "COVID-19 analytics dashboard for the terminal",
    version
)]
pub struct Settings {
    /// Dashboard page to render
    #[arg(long, default_value = "overview", value_parser = ["overview", "country", "trends", "heatmap"])]
    pub page: String,

    /// Directory holding the source CSV files (default: ./archive, then ./data)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Country shown on the country and heatmap pages
    #[arg(long)]
    pub country: Option<String>,

    /// Countries for the comparison chart (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub compare: Vec<String>,

    /// Inclusive start of the date filter (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Inclusive end of the date filter (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Months shown in the heatmap (YYYY-MM, comma separated; default: the
    /// last three months present in the data)
    #[arg(long, value_delimiter = ',')]
    pub months: Vec<YearMonth>,

    /// Metric to aggregate (Confirmed, Deaths, Recovered, Active, ...)
    #[arg(long, default_value = "Confirmed")]
    pub metric: String,

    /// Number of top-ranked countries kept in the heatmap
    #[arg(long, default_value_t = DEFAULT_TOP_N, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub top_n: usize,

    /// Trend window in days (minimum 2)
    #[arg(long, default_value_t = DEFAULT_TREND_WINDOW, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(2..))]
    pub window: usize,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Logging level
    #[arg(long, default_value = "info", value_parser = ["debug", "info", "warn", "error"])]
    pub log_level: String,

    /// Shortcut for --log-level debug
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse settings from the process arguments.
    pub fn load() -> Self {
        Self::apply_overrides(Self::parse())
    }

    /// Parse settings from an explicit argument list. Used by tests so they
    /// do not depend on the process environment.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::apply_overrides(Self::parse_from(args))
    }

    /// The page selection as a typed value.
    pub fn selected_page(&self) -> Result<Page> {
        self.page.parse()
    }

    fn apply_overrides(mut settings: Self) -> Self {
        if settings.debug {
            settings.log_level = "debug".to_string();
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::load_from_args(["covid-dash"]);
        assert_eq!(settings.page, "overview");
        assert_eq!(settings.metric, "Confirmed");
        assert_eq!(settings.top_n, 30);
        assert_eq!(settings.window, 7);
        assert_eq!(settings.format, "text");
        assert_eq!(settings.log_level, "info");
        assert!(settings.data_dir.is_none());
        assert!(settings.country.is_none());
        assert!(settings.compare.is_empty());
        assert!(settings.months.is_empty());
        assert!(settings.start_date.is_none());
        assert!(settings.end_date.is_none());
        assert!(!settings.debug);
    }

    #[test]
    fn test_explicit_page_and_metric() {
        let settings =
            Settings::load_from_args(["covid-dash", "--page", "heatmap", "--metric", "Deaths"]);
        assert_eq!(settings.page, "heatmap");
        assert_eq!(settings.metric, "Deaths");
    }

    #[test]
    fn test_comma_separated_compare_list() {
        let settings = Settings::load_from_args(["covid-dash", "--compare", "US,Brazil,India"]);
        assert_eq!(settings.compare, vec!["US", "Brazil", "India"]);
    }

    #[test]
    fn test_typed_months() {
        let settings = Settings::load_from_args(["covid-dash", "--months", "2020-05,2020-06"]);
        assert_eq!(
            settings.months,
            vec![
                YearMonth { year: 2020, month: 5 },
                YearMonth { year: 2020, month: 6 }
            ]
        );
    }

    #[test]
    fn test_typed_date_range() {
        let settings = Settings::load_from_args([
            "covid-dash",
            "--start-date",
            "2020-03-01",
            "--end-date",
            "2020-03-31",
        ]);
        assert_eq!(
            settings.start_date,
            NaiveDate::from_ymd_opt(2020, 3, 1)
        );
        assert_eq!(settings.end_date, NaiveDate::from_ymd_opt(2020, 3, 31));
    }

    #[test]
    fn test_debug_flag_overrides_log_level() {
        let settings = Settings::load_from_args(["covid-dash", "--debug"]);
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn test_page_from_str() {
        assert_eq!("overview".parse::<Page>().unwrap(), Page::Overview);
        assert_eq!("Country".parse::<Page>().unwrap(), Page::Country);
        assert_eq!("TRENDS".parse::<Page>().unwrap(), Page::Trends);
        assert_eq!("heatmap".parse::<Page>().unwrap(), Page::Heatmap);
    }

    #[test]
    fn test_page_from_str_invalid() {
        let err = "map".parse::<Page>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown page: map");
    }

    #[test]
    fn test_page_as_str_round_trip() {
        for page in [Page::Overview, Page::Country, Page::Trends, Page::Heatmap] {
            assert_eq!(page.as_str().parse::<Page>().unwrap(), page);
        }
    }

    #[test]
    fn test_selected_page() {
        let settings = Settings::load_from_args(["covid-dash", "--page", "trends"]);
        assert_eq!(settings.selected_page().unwrap(), Page::Trends);
    }
}
