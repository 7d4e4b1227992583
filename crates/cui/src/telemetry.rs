//! Tracing setup. The terminal belongs to the UI, so logs go to a file.
//!
//! - CROPMATCH_LOG sets the filter (e.g. "debug" or "info,cropmatch_core=trace").
//! - CROPMATCH_LOG_FILE overrides the log path (default `cropmatch.log`).

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,cropmatch_core=debug";

pub fn log_path() -> PathBuf {
    std::env::var_os("CROPMATCH_LOG_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("cropmatch.log"))
}

pub fn init_tracing() -> Result<PathBuf> {
    let path = log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_env("CROPMATCH_LOG")
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err.to_string()))
        .context("install tracing subscriber")?;
    Ok(path)
}
