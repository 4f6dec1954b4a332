//! Core types for the COVID dashboard.
//!
//! Record schemas for the four source datasets, the metric taxonomy, shared
//! errors, date handling, policy constants, CLI settings and the number
//! formatting used by the presentation layer.

pub mod config;
pub mod dates;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
