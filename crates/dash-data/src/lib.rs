//! Data layer for the COVID dashboard.
//!
//! Responsible for loading the four source CSV tables into typed records and
//! deriving everything the pages show: totals and ratios, ranked group-bys,
//! filtered subsets, trend deltas, the heatmap matrix and province
//! breakdowns, composed into per-page reports.

pub mod breakdown;
pub mod filters;
pub mod groupby;
pub mod heatmap;
pub mod loader;
pub mod pages;
pub mod summary;
pub mod trend;

pub use dash_core as core;
