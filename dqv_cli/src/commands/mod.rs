pub mod rules;
pub mod validate;

use anyhow::{Context, Result};
use dqv_config::{AppConfig, RuleFile};
use dqv_duckdb::DuckDbConnection;
use dqv_validator::{RuleSource, SqlCatalog};

/// Opens the configured database.
pub fn open_database(config: &AppConfig) -> Result<DuckDbConnection> {
    DuckDbConnection::open(&config.database.path, config.database.read_only)
        .with_context(|| format!("Failed to open database: {}", config.database.path))
}

/// Rule source for the run: the rule file when configured, the catalog table otherwise.
pub fn rule_source<'a>(
    config: &AppConfig,
    connection: &'a DuckDbConnection,
) -> Result<Box<dyn RuleSource + 'a>> {
    match &config.catalog.rules_file {
        Some(path) => {
            let file = RuleFile::load(path)
                .with_context(|| format!("Failed to load rules file: {}", path.display()))?;
            Ok(Box::new(file.into_catalog()))
        }
        None => Ok(Box::new(SqlCatalog::with_table(
            connection,
            config.catalog.table.as_str(),
        ))),
    }
}
