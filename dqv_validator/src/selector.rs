//! Rule selection.
//!
//! Filters the catalog down to the rules runnable for the current invocation:
//! without a dataset only SQL assertions run; with a dataset, assertions never
//! run and column-scoped rules need their column to be present.

use crate::DataSet;
use dqv_core::RuleDeclaration;

/// How a run was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// No dataset supplied; only SQL assertions run against the database
    AssertionOnly,
    /// A dataset was supplied; all non-assertion rules that apply to it run
    DatasetDriven,
}

impl RunMode {
    pub fn for_dataset(dataset: Option<&DataSet>) -> Self {
        match dataset {
            Some(_) => RunMode::DatasetDriven,
            None => RunMode::AssertionOnly,
        }
    }
}

/// Returns true if `rule` should run for `dataset` (or for no dataset).
pub fn is_selected(rule: &RuleDeclaration, dataset: Option<&DataSet>) -> bool {
    match dataset {
        None => rule.test_type.is_sql_assertion(),
        Some(_) if rule.test_type.is_sql_assertion() => false,
        Some(dataset) => match rule.column_name.as_deref() {
            Some(column) if dataset.has_column(column) => true,
            _ => rule.column().is_none(),
        },
    }
}

/// Keeps the rules that should run, preserving catalog order.
pub fn select_rules<'a>(
    rules: &'a [RuleDeclaration],
    dataset: Option<&DataSet>,
) -> Vec<&'a RuleDeclaration> {
    rules
        .iter()
        .filter(|rule| is_selected(rule, dataset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dqv_core::{RuleBuilder, TestType};
    use pretty_assertions::assert_eq;

    fn catalog() -> Vec<RuleDeclaration> {
        vec![
            RuleBuilder::new("t", TestType::SqlAssertion)
                .value_config("select 1 where false")
                .build(),
            RuleBuilder::new("t", TestType::Unique)
                .value_config(r#"{"columns": ["id", "name"]}"#)
                .build(),
            RuleBuilder::new("t", TestType::AcceptedValues)
                .column("age")
                .value_config("[1, 2]")
                .build(),
            RuleBuilder::new("t", TestType::NotNull).column("id").build(),
            RuleBuilder::new("t", TestType::NotNull).column("missing").build(),
            RuleBuilder::new("t", TestType::SqlAssertion)
                .column("id")
                .value_config("select 1 where false")
                .build(),
        ]
    }

    #[test]
    fn test_assertion_only_mode() {
        let rules = catalog();
        let selected = select_rules(&rules, None);
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|r| r.test_type == TestType::SqlAssertion));
    }

    #[test]
    fn test_dataset_driven_mode() {
        let rules = catalog();
        let dataset = DataSet::new(["id", "age"]);
        let selected = select_rules(&rules, Some(&dataset));

        let picked: Vec<(Option<&str>, &TestType)> = selected
            .iter()
            .map(|r| (r.column(), &r.test_type))
            .collect();
        assert_eq!(
            picked,
            vec![
                (None, &TestType::Unique),
                (Some("age"), &TestType::AcceptedValues),
                (Some("id"), &TestType::NotNull),
            ]
        );
    }

    #[test]
    fn test_column_match_is_case_sensitive() {
        let rule = RuleBuilder::new("t", TestType::NotNull).column("ID").build();
        let dataset = DataSet::new(["id"]);
        assert!(!is_selected(&rule, Some(&dataset)));
    }

    #[test]
    fn test_run_mode() {
        assert_eq!(RunMode::for_dataset(None), RunMode::AssertionOnly);
        assert_eq!(
            RunMode::for_dataset(Some(&DataSet::default())),
            RunMode::DatasetDriven
        );
    }
}
