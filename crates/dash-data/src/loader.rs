//! CSV dataset loading.
//!
//! Reads each of the four source tables into a vector of typed records.
//! Header whitespace is trimmed and date columns parsed; beyond that rows
//! pass through unfiltered, so downstream aggregation sees the data as-is.

use std::fs::File;
use std::path::{Path, PathBuf};

use dash_core::error::{DashError, Result};
use dash_core::models::{DailyRecord, GlobalRecord, GroupedRecord, SummaryRecord};
use serde::de::DeserializeOwned;
use tracing::debug;

// ── Dataset ───────────────────────────────────────────────────────────────────

/// The four source tables, keyed by their conventional file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    /// Country-level daily time series.
    Daily,
    /// Latest per-country snapshot.
    Summary,
    /// Global daily time series.
    Global,
    /// Country/province daily time series.
    Grouped,
}

impl Dataset {
    /// The conventional file name under the data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Dataset::Daily => "covid_19_clean_complete.csv",
            Dataset::Summary => "worldometer_data.csv",
            Dataset::Global => "day_wise.csv",
            Dataset::Grouped => "full_grouped.csv",
        }
    }

    /// Full path of this dataset under `data_dir`.
    pub fn path_in(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.file_name())
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the country-level daily table from `data_dir`.
pub fn load_daily(data_dir: &Path) -> Result<Vec<DailyRecord>> {
    read_table(&Dataset::Daily.path_in(data_dir))
}

/// Load the per-country snapshot table from `data_dir`.
pub fn load_summary(data_dir: &Path) -> Result<Vec<SummaryRecord>> {
    read_table(&Dataset::Summary.path_in(data_dir))
}

/// Load the global daily table from `data_dir`.
pub fn load_global(data_dir: &Path) -> Result<Vec<GlobalRecord>> {
    read_table(&Dataset::Global.path_in(data_dir))
}

/// Load the country/province daily table from `data_dir`.
pub fn load_grouped(data_dir: &Path) -> Result<Vec<GroupedRecord>> {
    read_table(&Dataset::Grouped.path_in(data_dir))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Read `path` into typed rows.
///
/// Header cells are trimmed so that `" Country/Region "` still matches the
/// schema; row cells keep their raw values. Extra columns are ignored.
fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|source| DashError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(file);

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: T = result.map_err(|source| DashError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(row);
    }

    debug!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_load_daily_basic() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "covid_19_clean_complete.csv",
            "Province/State,Country/Region,Date,Confirmed,Deaths,Recovered\n\
             ,Afghanistan,2020-01-22,0,0,0\n\
             British Columbia,Canada,2020-01-22,1,0,0\n",
        );

        let rows = load_daily(dir.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].country, "Afghanistan");
        assert_eq!(rows[0].province, None);
        assert_eq!(rows[0].date, date(2020, 1, 22));
        assert_eq!(rows[1].province.as_deref(), Some("British Columbia"));
        assert_eq!(rows[1].confirmed, 1);
    }

    #[test]
    fn test_load_daily_trims_header_whitespace() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "covid_19_clean_complete.csv",
            " Province/State , Country/Region , Date , Confirmed , Deaths , Recovered \n\
             ,US,2020-07-27,4290259,148011,1325804\n",
        );

        let rows = load_daily(dir.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].country, "US");
        assert_eq!(rows[0].confirmed, 4_290_259);
    }

    #[test]
    fn test_load_daily_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_daily(dir.path()).unwrap_err();
        assert!(matches!(err, DashError::FileRead { .. }));
        assert!(err.to_string().contains("covid_19_clean_complete.csv"));
    }

    #[test]
    fn test_load_daily_bad_date_cell() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "covid_19_clean_complete.csv",
            "Province/State,Country/Region,Date,Confirmed,Deaths,Recovered\n\
             ,US,not-a-date,1,0,0\n",
        );

        let err = load_daily(dir.path()).unwrap_err();
        assert!(matches!(err, DashError::Csv { .. }));
    }

    #[test]
    fn test_load_daily_non_numeric_cell() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "covid_19_clean_complete.csv",
            "Province/State,Country/Region,Date,Confirmed,Deaths,Recovered\n\
             ,US,2020-01-22,lots,0,0\n",
        );

        assert!(matches!(
            load_daily(dir.path()),
            Err(DashError::Csv { .. })
        ));
    }

    #[test]
    fn test_load_summary_empty_numeric_cells_read_as_zero() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "worldometer_data.csv",
            "Country/Region,Continent,TotalCases,TotalDeaths,TotalRecovered\n\
             UK,Europe,306862,46364,\n\
             USA,North America,5032179,162804,2576668\n",
        );

        let rows = load_summary(dir.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].total_recovered, 0);
        assert_eq!(rows[1].total_recovered, 2_576_668);
    }

    #[test]
    fn test_load_summary_without_continent_column() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "worldometer_data.csv",
            "Country/Region,TotalCases,TotalDeaths,TotalRecovered\n\
             USA,5032179,162804,2576668\n",
        );

        let rows = load_summary(dir.path()).unwrap();
        assert_eq!(rows[0].continent, None);
    }

    #[test]
    fn test_load_summary_ignores_extra_columns() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "worldometer_data.csv",
            "Country/Region,Continent,Population,TotalCases,NewCases,TotalDeaths,TotalRecovered\n\
             USA,North America,331198130,5032179,,162804,2576668\n",
        );

        let rows = load_summary(dir.path()).unwrap();
        assert_eq!(rows[0].total_cases, 5_032_179);
    }

    #[test]
    fn test_load_global_optional_growth_rate() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "day_wise.csv",
            "Date,Confirmed,Deaths,Recovered,New cases,New deaths\n\
             2020-01-22,555,17,28,0,0\n",
        );

        let rows = load_global(dir.path()).unwrap();
        assert_eq!(rows[0].growth_rate, None);
        assert_eq!(rows[0].new_cases, 0);
    }

    #[test]
    fn test_load_global_with_growth_rate() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "day_wise.csv",
            "Date,Confirmed,Deaths,Recovered,New cases,New deaths,Growth rate\n\
             2020-01-23,654,18,30,99,1,1.18\n",
        );

        let rows = load_global(dir.path()).unwrap();
        assert_eq!(rows[0].growth_rate, Some(1.18));
    }

    #[test]
    fn test_load_grouped_without_province_column() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "full_grouped.csv",
            "Date,Country/Region,Confirmed,Deaths,Recovered,Active\n\
             2020-07-27,Afghanistan,36263,1269,25198,9796\n",
        );

        let rows = load_grouped(dir.path()).unwrap();
        assert_eq!(rows[0].province, None);
        assert_eq!(rows[0].active, 9_796);
    }

    #[test]
    fn test_dataset_paths() {
        assert_eq!(Dataset::Summary.file_name(), "worldometer_data.csv");
        assert_eq!(
            Dataset::Grouped.path_in(Path::new("/data")),
            Path::new("/data/full_grouped.csv")
        );
    }
}
