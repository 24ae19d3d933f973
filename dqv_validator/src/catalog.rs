//! Rule catalog loading.
//!
//! The catalog is the ordered set of rule declarations for one target table.
//! It normally lives in a relational table with the columns `TargetTable`,
//! `ColumnName`, `Test`, `ValueConfig` and `Severity`; rule files loaded into
//! memory go through the same filtering and ordering.

use crate::connection::quote_literal;
use crate::{Connection, DataValue};
use dqv_core::{RuleDeclaration, TestType, ValidationError};
use std::collections::HashSet;
use tracing::debug;

/// Default name of the catalog table.
pub const DEFAULT_CATALOG_TABLE: &str = "_DataValidationCfg";

/// Source of rule declarations.
pub trait RuleSource {
    /// Returns the distinct rules whose target table equals `target_table`
    /// exactly, ordered by `(column_name, test)`.
    fn load(&self, target_table: &str) -> Result<Vec<RuleDeclaration>, ValidationError>;
}

/// Catalog stored in a database table.
pub struct SqlCatalog<C> {
    connection: C,
    table: String,
}

impl<C: Connection> SqlCatalog<C> {
    /// Creates a catalog reading from the default catalog table.
    pub fn new(connection: C) -> Self {
        Self::with_table(connection, DEFAULT_CATALOG_TABLE)
    }

    /// Creates a catalog reading from `table`.
    pub fn with_table(connection: C, table: impl Into<String>) -> Self {
        Self {
            connection,
            table: table.into(),
        }
    }

    /// Builds the catalog query for `target_table`.
    pub fn catalog_query(&self, target_table: &str) -> String {
        format!(
            "select distinct TargetTable, ColumnName, Test, ValueConfig, Severity \
             from {} where TargetTable = {} \
             order by ColumnName, Test",
            self.table,
            quote_literal(target_table)
        )
    }
}

impl<C: Connection> RuleSource for SqlCatalog<C> {
    fn load(&self, target_table: &str) -> Result<Vec<RuleDeclaration>, ValidationError> {
        let sql = self.catalog_query(target_table);
        debug!("Loading validation rules: {}", sql);

        let result = self
            .connection
            .query(&sql)
            .map_err(|e| ValidationError::catalog(target_table, e.to_string()))?;

        if result.columns().len() < 5 {
            return Err(ValidationError::catalog(
                target_table,
                format!(
                    "expected 5 catalog columns, found {}",
                    result.columns().len()
                ),
            ));
        }

        Ok(result
            .rows()
            .map(|row| RuleDeclaration {
                target_table: cell_text(&row[0]).unwrap_or_default(),
                column_name: cell_text(&row[1]),
                test_type: TestType::parse(&cell_text(&row[2]).unwrap_or_default()),
                value_config: cell_text(&row[3]).unwrap_or_default(),
                severity: cell_text(&row[4]).unwrap_or_default(),
            })
            .collect())
    }
}

fn cell_text(value: &DataValue) -> Option<String> {
    match value {
        DataValue::Null => None,
        DataValue::String(s) => Some(s.clone()),
        other => Some(match other.to_json() {
            serde_json::Value::String(s) => s,
            json => json.to_string(),
        }),
    }
}

/// Catalog held in memory, e.g. loaded from a rules file.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    rules: Vec<RuleDeclaration>,
}

impl StaticCatalog {
    pub fn new(rules: Vec<RuleDeclaration>) -> Self {
        Self { rules }
    }
}

impl RuleSource for StaticCatalog {
    fn load(&self, target_table: &str) -> Result<Vec<RuleDeclaration>, ValidationError> {
        let mut seen = HashSet::new();
        let mut rules: Vec<RuleDeclaration> = self
            .rules
            .iter()
            .filter(|rule| rule.target_table == target_table)
            .filter(|rule| seen.insert(*rule))
            .cloned()
            .collect();

        // Table-level rules (no column name) sort first
        rules.sort_by(|a, b| {
            a.column_name
                .cmp(&b.column_name)
                .then_with(|| a.test_type.as_str().cmp(b.test_type.as_str()))
        });
        Ok(rules)
    }
}
