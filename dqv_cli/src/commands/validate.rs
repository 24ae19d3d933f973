use anyhow::{Context, Result};
use dqv_config::AppConfig;
use dqv_validator::{DataSet, DataValidator};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{open_database, rule_source};
use crate::output::{self, OutputFormat};

/// Options of the `validate` command.
pub struct ValidateArgs {
    pub table: String,
    pub dataset: Option<PathBuf>,
    pub query: Option<String>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

/// Runs the rules of `args.table` and prints the log.
///
/// Returns whether every evaluated rule held.
pub fn execute(config: &AppConfig, args: &ValidateArgs) -> Result<bool> {
    info!("Validating table: {}", args.table);
    info!("Database: {}", config.database.path);

    let connection = open_database(config)?;
    let source = rule_source(config, &connection)?;

    let dataset = match (&args.dataset, &args.query) {
        (Some(path), _) => Some(load_dataset(path)?),
        (None, Some(sql)) => Some(
            connection
                .fetch(sql)
                .with_context(|| format!("Failed to fetch dataset: {}", sql))?,
        ),
        (None, None) => None,
    };

    if args.format == OutputFormat::Text {
        match &dataset {
            Some(data) => output::print_info(&format!(
                "Dataset loaded: {} row(s), {} column(s)",
                data.len(),
                data.columns().len()
            )),
            None => output::print_info("No dataset given, running SQL assertions only"),
        }
    }

    let validator =
        DataValidator::new(&connection, source.as_ref()).with_context(config.validation.to_context());
    let log = validator
        .validate(&args.table, dataset.as_ref())
        .with_context(|| format!("Validation of {} aborted", args.table))?;

    output::print_validation_log(&log, args.format)?;

    if let Some(path) = &args.output {
        let json = log.to_json().context("Failed to serialize validation log")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write validation log: {}", path.display()))?;
        if args.format == OutputFormat::Text {
            output::print_success(&format!("Validation log written to {}", path.display()));
        }
    }

    Ok(log.passed())
}

fn load_dataset(path: &Path) -> Result<DataSet> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Dataset is not valid JSON: {}", path.display()))?;
    DataSet::from_json(&value).with_context(|| format!("Invalid dataset: {}", path.display()))
}
