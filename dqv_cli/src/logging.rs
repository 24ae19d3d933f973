//! Logging setup: console plus an optional per-run log file.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use dqv_config::LogConfig;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Path of the log file for a run started at `started`:
/// `<dir>/<dd-mm-YYYY>/<dd-mm-YYYY-HH-MM-SS>.log`.
pub fn log_file_path(dir: &Path, started: DateTime<Local>) -> PathBuf {
    dir.join(started.format("%d-%m-%Y").to_string())
        .join(format!("{}.log", started.format("%d-%m-%Y-%H-%M-%S")))
}

pub fn init(config: &LogConfig, verbose: bool) -> Result<()> {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::from_str(&config.level)
            .with_context(|| format!("Invalid log level: {}", config.level))?
    };

    let file_layer = match &config.dir {
        Some(dir) => {
            let path = log_file_path(dir, Local::now());
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create log directory: {}", parent.display())
                })?;
            }
            let file = File::create(&path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(file_layer)
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    Ok(())
}
