use std::path::{Path, PathBuf};

use dash_core::error::{DashError, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is mapped to an [`EnvFilter`] directive; unrecognised values
/// fall back to `"info"`. Diagnostics go to stderr so that report text on
/// stdout stays pipeable.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Data-directory discovery ───────────────────────────────────────────────────

/// Locate the directory holding the CSV exports.
///
/// An explicit flag value must name an existing directory. Without a flag,
/// `archive/` then `data/` under the current directory are tried in order.
pub fn resolve_data_dir(flag: Option<&Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    resolve_data_dir_in(&cwd, flag)
}

fn resolve_data_dir_in(base: &Path, flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        if dir.is_dir() {
            return Ok(dir.to_path_buf());
        }
        return Err(DashError::DataDirNotFound(dir.to_path_buf()));
    }

    let candidates = [base.join("archive"), base.join("data")];
    candidates
        .into_iter()
        .find(|p| p.is_dir())
        .ok_or_else(|| DashError::DataDirNotFound(base.join("archive")))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
