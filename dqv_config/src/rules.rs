//! Rule files.
//!
//! A rule file carries catalog entries outside the database:
//!
//! ```yaml
//! rules:
//!   - target_table: st_project
//!     column_name: age
//!     test: Accepted Values
//!     value_config: [0, 1, 2, 3]
//!     severity: High
//! ```
//!
//! `value_config` may be written as a string (used verbatim) or as structured
//! data, which is stored as its JSON text.

use crate::{DocumentFormat, Result, parse_document, parse_file};
use dqv_core::{RuleDeclaration, TestType};
use dqv_validator::StaticCatalog;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use validator::Validate;

/// A rule file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct RuleFile {
    #[serde(default)]
    #[validate(nested)]
    pub rules: Vec<RuleEntry>,
}

/// One rule as written in a rule file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RuleEntry {
    #[validate(length(min = 1, message = "target_table cannot be empty"))]
    pub target_table: String,

    #[serde(default)]
    pub column_name: Option<String>,

    #[validate(length(min = 1, message = "test cannot be empty"))]
    pub test: String,

    #[serde(default)]
    pub value_config: Option<Value>,

    #[serde(default)]
    pub severity: Option<String>,
}

impl RuleEntry {
    /// Converts the entry into a catalog declaration.
    pub fn to_declaration(&self) -> RuleDeclaration {
        let value_config = match &self.value_config {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(structured) => structured.to_string(),
        };

        RuleDeclaration {
            target_table: self.target_table.clone(),
            column_name: self.column_name.clone(),
            test_type: TestType::parse(&self.test),
            value_config,
            severity: self.severity.clone().unwrap_or_default(),
        }
    }
}

impl RuleFile {
    /// Loads a rule file from a YAML or TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        parse_file(path)
    }

    /// Parses a rule file from a string.
    pub fn parse(content: &str, format: DocumentFormat) -> Result<Self> {
        parse_document(content, format)
    }

    pub fn declarations(&self) -> Vec<RuleDeclaration> {
        self.rules.iter().map(RuleEntry::to_declaration).collect()
    }

    /// Builds an in-memory catalog from the file's rules.
    pub fn into_catalog(self) -> StaticCatalog {
        StaticCatalog::new(self.declarations())
    }
}
