use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the dashboard crates.
#[derive(Error, Debug)]
pub enum DashError {
    /// A dataset file could not be opened or read.
    #[error("Failed to read dataset {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV row or column could not be deserialized.
    #[error("Failed to parse {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A date cell matched none of the accepted formats.
    #[error("Invalid date format: {0}")]
    DateParse(String),

    /// An unknown metric name was requested.
    #[error("Invalid metric name: {0}")]
    InvalidMetric(String),

    /// An unknown page name was requested.
    #[error("Unknown page: {0}")]
    UnknownPage(String),

    /// None of the data directory candidates exists.
    #[error("Data directory not found: {0}")]
    DataDirNotFound(PathBuf),

    /// A trend window was asked of a series too short to carry one.
    #[error("Not enough rows for a trend window: {rows} row(s), window {window}")]
    InsufficientData { rows: usize, window: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DashError>;
