//! Application configuration.

use crate::{DocumentFormat, Result, parse_document, parse_file};
use dqv_core::{MAX_SAMPLE_ROWS, ValidationContext};
use dqv_validator::DEFAULT_CATALOG_TABLE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::{Validate, ValidationError};

/// Log levels accepted in `logs.level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate(nested)]
    pub database: DatabaseConfig,

    #[validate(nested)]
    pub catalog: CatalogConfig,

    #[validate(nested)]
    pub logs: LogConfig,

    #[validate(nested)]
    pub validation: ValidationSettings,
}

impl AppConfig {
    /// Loads the configuration from a YAML or TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        parse_file(path)
    }
}

/// Database holding the catalog, reference tables and the data itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DatabaseConfig {
    /// DuckDB database file
    #[validate(length(min = 1, message = "database path cannot be empty"))]
    pub path: String,

    /// Open without write access
    pub read_only: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "warehouse.duckdb".to_string(),
            read_only: true,
        }
    }
}

/// Where rule declarations come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog table in the database
    #[validate(length(min = 1, message = "catalog table cannot be empty"))]
    pub table: String,

    /// Rule file used instead of the catalog table when set
    pub rules_file: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            table: DEFAULT_CATALOG_TABLE.to_string(),
            rules_file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LogConfig {
    /// Directory for per-run log files; console only when unset
    pub dir: Option<PathBuf>,

    #[validate(custom(function = "validate_level"))]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: None,
            level: "info".to_string(),
        }
    }
}

fn validate_level(level: &str) -> std::result::Result<(), ValidationError> {
    if LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("log_level"))
    }
}

/// Run options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ValidationSettings {
    /// Rows sampled into a failure detail
    #[validate(range(min = 1, max = 10))]
    pub sample_limit: usize,

    /// Abort the run on the first infrastructure error
    pub fail_fast: bool,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            sample_limit: MAX_SAMPLE_ROWS,
            fail_fast: true,
        }
    }
}

impl ValidationSettings {
    /// Builds the engine context for these settings.
    pub fn to_context(&self) -> ValidationContext {
        ValidationContext::new()
            .with_sample_limit(self.sample_limit)
            .with_fail_fast(self.fail_fast)
    }
}

/// Parse the application config from a YAML string.
pub fn parse_config_yaml(content: &str) -> Result<AppConfig> {
    parse_document(content, DocumentFormat::Yaml)
}

/// Parse the application config from a TOML string.
pub fn parse_config_toml(content: &str) -> Result<AppConfig> {
    parse_document(content, DocumentFormat::Toml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = parse_config_yaml("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.catalog.table, "_DataValidationCfg");
        assert_eq!(config.validation.sample_limit, 10);
        assert!(config.validation.fail_fast);
        assert_eq!(config.logs.level, "info");
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r#"
database:
  path: /data/warehouse.duckdb
  read_only: false
catalog:
  table: dq_rules
  rules_file: rules.yml
logs:
  dir: /var/log/dqv
  level: debug
validation:
  sample_limit: 3
  fail_fast: false
"#;
        let config = parse_config_yaml(yaml).unwrap();
        assert_eq!(config.database.path, "/data/warehouse.duckdb");
        assert!(!config.database.read_only);
        assert_eq!(config.catalog.rules_file, Some(PathBuf::from("rules.yml")));
        assert_eq!(config.logs.dir, Some(PathBuf::from("/var/log/dqv")));

        let context = config.validation.to_context();
        assert_eq!(context.sample_limit(), 3);
        assert!(!context.fail_fast);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[database]
path = "dq.duckdb"

[validation]
sample_limit = 10
"#;
        let config = parse_config_toml(toml).unwrap();
        assert_eq!(config.database.path, "dq.duckdb");
        assert!(config.database.read_only);
        assert_eq!(config.catalog, CatalogConfig::default());
    }

    #[test]
    fn test_sample_limit_out_of_range() {
        for limit in ["0", "11"] {
            let yaml = format!("validation:\n  sample_limit: {limit}\n");
            assert!(matches!(parse_config_yaml(&yaml), Err(ConfigError::Invalid(_))));
        }
    }

    #[test]
    fn test_empty_values_rejected() {
        assert!(parse_config_yaml("database:\n  path: ''\n").is_err());
        assert!(parse_config_yaml("catalog:\n  table: ''\n").is_err());
        assert!(parse_config_yaml("logs:\n  level: loud\n").is_err());
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            parse_config_yaml("validation: [unclosed"),
            Err(ConfigError::YamlError(_))
        ));
    }
}
