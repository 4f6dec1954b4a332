//! Province-level breakdowns for a single country.
//!
//! A breakdown only makes sense when the data distinguishes more than one
//! province; single-province and province-free countries report
//! `NotApplicable` rather than a one-row table.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use dash_core::models::{GroupedRecord, Metric};
use serde::Serialize;

use crate::groupby::{self, GroupTotal};

/// Per-province totals on the most recent date in the selection.
#[derive(Debug, Clone, Serialize)]
pub struct ProvinceBreakdown {
    /// The date the totals were taken on.
    pub date: NaiveDate,
    /// Province totals, descending by value.
    pub rows: Vec<GroupTotal>,
}

/// Result of asking for a province breakdown.
#[derive(Debug, Clone, Serialize)]
pub enum BreakdownOutcome {
    /// Multiple provinces with signal on the latest date.
    Breakdown(ProvinceBreakdown),
    /// Provinces exist but all report zero on the latest date.
    NoSignal { date: NaiveDate },
    /// Zero or one distinct province; nothing to break down.
    NotApplicable,
}

/// Compute the latest-date province breakdown for one country's rows.
///
/// `country_rows` must already be narrowed to a single country.
pub fn latest_breakdown(country_rows: &[GroupedRecord], metric: Metric) -> BreakdownOutcome {
    let provinces: BTreeSet<&str> = country_rows
        .iter()
        .filter_map(|row| row.province.as_deref())
        .collect();
    if provinces.len() <= 1 {
        return BreakdownOutcome::NotApplicable;
    }

    let latest = match country_rows.iter().map(|row| row.date).max() {
        Some(date) => date,
        None => return BreakdownOutcome::NotApplicable,
    };
    let on_latest: Vec<GroupedRecord> = country_rows
        .iter()
        .filter(|row| row.date == latest)
        .cloned()
        .collect();

    let rows = groupby::group_sum(
        &on_latest,
        |row: &GroupedRecord| row.province.as_deref(),
        metric,
    );
    if rows.iter().map(|group| group.value).sum::<u64>() == 0 {
        return BreakdownOutcome::NoSignal { date: latest };
    }

    BreakdownOutcome::Breakdown(ProvinceBreakdown { date: latest, rows })
}
