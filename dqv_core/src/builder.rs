//! Builder pattern for creating rule declarations.
//!
//! Catalog rows normally come from the database; the builder is used by
//! static rule files and tests.

use crate::{RuleDeclaration, TestType};

/// Builder for creating a `RuleDeclaration`.
///
/// # Example
///
/// ```rust
/// use dqv_core::{RuleBuilder, TestType};
///
/// let rule = RuleBuilder::new("st_project", TestType::Unique)
///     .value_config(r#"{"columns": ["project_name", "postal_code"]}"#)
///     .severity("Medium")
///     .build();
///
/// assert_eq!(rule.column(), None);
/// ```
#[derive(Debug)]
pub struct RuleBuilder {
    target_table: String,
    column_name: Option<String>,
    test_type: TestType,
    value_config: String,
    severity: String,
}

impl RuleBuilder {
    /// Creates a new rule builder with required fields.
    ///
    /// # Arguments
    ///
    /// * `target_table` - Table the rule applies to
    /// * `test_type` - Check to run
    pub fn new(target_table: impl Into<String>, test_type: impl Into<TestType>) -> Self {
        Self {
            target_table: target_table.into(),
            column_name: None,
            test_type: test_type.into(),
            value_config: String::new(),
            severity: String::new(),
        }
    }

    /// Sets the target column.
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column_name = Some(column.into());
        self
    }

    /// Sets the value config (JSON or raw SQL).
    pub fn value_config(mut self, value_config: impl Into<String>) -> Self {
        self.value_config = value_config.into();
        self
    }

    /// Sets the value config from a JSON value.
    pub fn json_config(mut self, value: serde_json::Value) -> Self {
        self.value_config = value.to_string();
        self
    }

    /// Sets the severity label.
    pub fn severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = severity.into();
        self
    }

    /// Builds the rule declaration.
    pub fn build(self) -> RuleDeclaration {
        RuleDeclaration {
            target_table: self.target_table,
            column_name: self.column_name,
            test_type: self.test_type,
            value_config: self.value_config,
            severity: self.severity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_rule_builder() {
        let rule = RuleBuilder::new("st_project", "Reference Values")
            .column("asset_id")
            .json_config(json!({"table": "assets", "column": "id"}))
            .severity("High")
            .build();

        assert_eq!(rule.target_table, "st_project");
        assert_eq!(rule.column_name.as_deref(), Some("asset_id"));
        assert_eq!(rule.test_type, TestType::ReferenceValues);
        assert_eq!(rule.severity, "High");

        let config = rule.reference_config().unwrap();
        assert_eq!(config.table, "assets");
        assert_eq!(config.column, "id");
    }

    #[test]
    fn test_builder_defaults() {
        let rule = RuleBuilder::new("t", TestType::SqlAssertion).build();
        assert_eq!(rule.column_name, None);
        assert_eq!(rule.value_config, "");
        assert_eq!(rule.severity, "");
    }
}
