//! Configuration loading for the Data Quality Validator (YAML/TOML formats).
//!
//! Two kinds of documents are read here:
//! - the application config ([`AppConfig`]): database, catalog, logging and
//!   run options
//! - rule files ([`RuleFile`]): rule declarations kept outside the database
//!
//! # Example
//!
//! ```rust
//! use dqv_config::parse_config_yaml;
//!
//! let yaml = r#"
//! database:
//!   path: warehouse.duckdb
//! validation:
//!   sample_limit: 5
//! "#;
//!
//! let config = parse_config_yaml(yaml).expect("Failed to parse config");
//! assert_eq!(config.validation.sample_limit, 5);
//! assert!(config.database.read_only);
//! ```

use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;
use validator::Validate;

mod rules;
mod settings;

pub use rules::*;
pub use settings::*;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The document parsed but holds invalid values
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,
}

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Detect the document format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `DocumentFormat::Yaml`
/// * `.toml` → `DocumentFormat::Toml`
///
/// # Errors
///
/// Returns `ConfigError::InvalidExtension` if the file has no extension.
/// Returns `ConfigError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<DocumentFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ConfigError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(DocumentFormat::Yaml),
        "toml" => Ok(DocumentFormat::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

/// Deserializes and validates a document.
pub fn parse_document<T>(content: &str, format: DocumentFormat) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    let document: T = match format {
        DocumentFormat::Yaml => serde_yaml_ng::from_str(content)?,
        DocumentFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::TomlError(e.to_string()))?
        }
    };
    document.validate()?;
    Ok(document)
}

/// Reads, deserializes and validates a document, detecting its format from
/// the file extension.
pub fn parse_file<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_document(&content, format)
}
