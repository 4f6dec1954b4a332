use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::dates;
use crate::error::{DashError, Result};

// ── Metric ────────────────────────────────────────────────────────────────────

/// The numeric measures carried by the source datasets.
///
/// Not every dataset carries every metric; [`MetricSource::metric_value`]
/// returns `None` for the ones a record does not have. `GrowthRate` exists
/// for presence detection only: it is fractional in the source, so integer
/// aggregation over it always sees `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    Confirmed,
    Deaths,
    Recovered,
    Active,
    #[serde(rename = "New cases")]
    NewCases,
    #[serde(rename = "New deaths")]
    NewDeaths,
    #[serde(rename = "Growth rate")]
    GrowthRate,
}

impl Metric {
    /// The column-name spelling of this metric.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Confirmed => "Confirmed",
            Metric::Deaths => "Deaths",
            Metric::Recovered => "Recovered",
            Metric::Active => "Active",
            Metric::NewCases => "New cases",
            Metric::NewDeaths => "New deaths",
            Metric::GrowthRate => "Growth rate",
        }
    }
}

impl FromStr for Metric {
    type Err = DashError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "confirmed" => Ok(Metric::Confirmed),
            "deaths" => Ok(Metric::Deaths),
            "recovered" => Ok(Metric::Recovered),
            "active" => Ok(Metric::Active),
            "new cases" | "new_cases" => Ok(Metric::NewCases),
            "new deaths" | "new_deaths" => Ok(Metric::NewDeaths),
            "growth rate" | "growth_rate" => Ok(Metric::GrowthRate),
            other => Err(DashError::InvalidMetric(other.to_string())),
        }
    }
}

// ── Trait seams ───────────────────────────────────────────────────────────────

/// A record carrying an observation date.
pub trait Dated {
    /// The record's calendar date.
    fn date(&self) -> NaiveDate;
}

/// A record that can yield integer metric values.
pub trait MetricSource {
    /// The value of `metric` for this record, `None` when the record does
    /// not carry that measure.
    fn metric_value(&self, metric: Metric) -> Option<u64>;
}

// ── Record types ──────────────────────────────────────────────────────────────

/// One row of the country-level daily time series
/// (`covid_19_clean_complete.csv`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRecord {
    #[serde(rename = "Country/Region")]
    pub country: String,
    #[serde(rename = "Province/State", default)]
    pub province: Option<String>,
    #[serde(rename = "Date", deserialize_with = "dates::deserialize_date")]
    pub date: NaiveDate,
    #[serde(rename = "Confirmed")]
    pub confirmed: u64,
    #[serde(rename = "Deaths")]
    pub deaths: u64,
    #[serde(rename = "Recovered")]
    pub recovered: u64,
}

impl Dated for DailyRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl MetricSource for DailyRecord {
    fn metric_value(&self, metric: Metric) -> Option<u64> {
        match metric {
            Metric::Confirmed => Some(self.confirmed),
            Metric::Deaths => Some(self.deaths),
            Metric::Recovered => Some(self.recovered),
            _ => None,
        }
    }
}

/// One row of the latest per-country snapshot (`worldometer_data.csv`).
///
/// The snapshot file leaves some numeric cells empty; those read as zero,
/// matching how the observed data is aggregated downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRecord {
    #[serde(rename = "Country/Region")]
    pub country: String,
    #[serde(rename = "Continent", default)]
    pub continent: Option<String>,
    #[serde(rename = "TotalCases", deserialize_with = "u64_or_zero")]
    pub total_cases: u64,
    #[serde(rename = "TotalDeaths", deserialize_with = "u64_or_zero")]
    pub total_deaths: u64,
    #[serde(rename = "TotalRecovered", deserialize_with = "u64_or_zero")]
    pub total_recovered: u64,
}

impl MetricSource for SummaryRecord {
    fn metric_value(&self, metric: Metric) -> Option<u64> {
        match metric {
            Metric::Confirmed => Some(self.total_cases),
            Metric::Deaths => Some(self.total_deaths),
            Metric::Recovered => Some(self.total_recovered),
            _ => None,
        }
    }
}

/// One row of the global daily time series (`day_wise.csv`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalRecord {
    #[serde(rename = "Date", deserialize_with = "dates::deserialize_date")]
    pub date: NaiveDate,
    #[serde(rename = "Confirmed")]
    pub confirmed: u64,
    #[serde(rename = "Deaths")]
    pub deaths: u64,
    #[serde(rename = "Recovered")]
    pub recovered: u64,
    #[serde(rename = "New cases")]
    pub new_cases: u64,
    #[serde(rename = "New deaths")]
    pub new_deaths: u64,
    #[serde(rename = "Growth rate", default)]
    pub growth_rate: Option<f64>,
}

impl Dated for GlobalRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl MetricSource for GlobalRecord {
    fn metric_value(&self, metric: Metric) -> Option<u64> {
        match metric {
            Metric::Confirmed => Some(self.confirmed),
            Metric::Deaths => Some(self.deaths),
            Metric::Recovered => Some(self.recovered),
            Metric::NewCases => Some(self.new_cases),
            Metric::NewDeaths => Some(self.new_deaths),
            Metric::Active | Metric::GrowthRate => None,
        }
    }
}

/// One row of the country/province daily time series (`full_grouped.csv`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupedRecord {
    #[serde(rename = "Country/Region")]
    pub country: String,
    #[serde(rename = "Province/State", default)]
    pub province: Option<String>,
    #[serde(rename = "Date", deserialize_with = "dates::deserialize_date")]
    pub date: NaiveDate,
    #[serde(rename = "Confirmed")]
    pub confirmed: u64,
    #[serde(rename = "Deaths")]
    pub deaths: u64,
    #[serde(rename = "Recovered")]
    pub recovered: u64,
    #[serde(rename = "Active")]
    pub active: u64,
}

impl Dated for GroupedRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl MetricSource for GroupedRecord {
    fn metric_value(&self, metric: Metric) -> Option<u64> {
        match metric {
            Metric::Confirmed => Some(self.confirmed),
            Metric::Deaths => Some(self.deaths),
            Metric::Recovered => Some(self.recovered),
            Metric::Active => Some(self.active),
            Metric::NewCases | Metric::NewDeaths | Metric::GrowthRate => None,
        }
    }
}

/// Deserialize an integer cell, reading empty or missing values as zero.
fn u64_or_zero<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(0),
        Some(value) => value.parse::<u64>().map_err(serde::de::Error::custom),
    }
}
