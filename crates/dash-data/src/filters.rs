//! Pure subsetting operations over record slices.
//!
//! All filters preserve row order and never mutate their input; an empty
//! selection is an ordinary empty vector, not an error.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use dash_core::dates::YearMonth;
use dash_core::models::Dated;

/// Rows whose date falls within `[start, end]`, both bounds inclusive.
pub fn filter_by_date_range<R: Dated + Clone>(
    rows: &[R],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<R> {
    rows.iter()
        .filter(|row| {
            let date = row.date();
            start <= date && date <= end
        })
        .cloned()
        .collect()
}

/// Rows whose key is a member of `allowed`.
///
/// An empty `allowed` set selects nothing.
pub fn filter_by_membership<R, F>(rows: &[R], key_fn: F, allowed: &HashSet<String>) -> Vec<R>
where
    R: Clone,
    F: Fn(&R) -> Option<&str>,
{
    rows.iter()
        .filter(|row| key_fn(row).map(|key| allowed.contains(key)).unwrap_or(false))
        .cloned()
        .collect()
}

/// Rows whose date falls in any of the selected year-months.
///
/// An empty `months` selection selects nothing.
pub fn filter_by_months<R: Dated + Clone>(rows: &[R], months: &[YearMonth]) -> Vec<R> {
    rows.iter()
        .filter(|row| months.iter().any(|month| month.contains(row.date())))
        .cloned()
        .collect()
}

/// The distinct year-months present in `rows`, ascending.
pub fn months_present<R: Dated>(rows: &[R]) -> Vec<YearMonth> {
    let months: BTreeSet<YearMonth> = rows
        .iter()
        .map(|row| YearMonth::from_date(row.date()))
        .collect();
    months.into_iter().collect()
}

/// Earliest and latest dates in `rows`, `None` for an empty table.
pub fn date_bounds<R: Dated>(rows: &[R]) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = rows.iter().map(|row| row.date());
    let first = dates.next()?;
    Some(dates.fold((first, first), |(min, max), date| {
        (min.min(date), max.max(date))
    }))
}
