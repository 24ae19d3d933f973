use anyhow::{Context, Result};
use dqv_config::AppConfig;
use dqv_validator::RuleSource;
use tracing::info;

use super::{open_database, rule_source};
use crate::output::{self, OutputFormat};

pub fn execute(config: &AppConfig, table: &str, format: OutputFormat) -> Result<()> {
    info!("Listing rules for {}", table);

    let connection = open_database(config)?;
    let source = rule_source(config, &connection)?;
    let rules = source
        .load(table)
        .with_context(|| format!("Failed to load rules for {}", table))?;

    output::print_rules(table, &rules, format)
}
