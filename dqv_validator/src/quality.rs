//! Quality checks evaluated against the dataset alone.
//!
//! This module handles:
//! - Not Null: no value in the column belongs to the null-equivalent set
//! - Unique: no key (one column, or a column list) occurs more than once

use crate::checks::{outcome_from_findings, required_column};
use crate::{DataSet, DataValue, RuleIssue, ValueKey};
use dqv_core::{Outcome, RuleDeclaration};
use std::collections::HashMap;

/// Name of the occurrence-count column in uniqueness failure samples.
pub const FOUND_COLUMN: &str = "found";

/// Fails if any row's value in the rule's column is null-equivalent.
///
/// The failure detail samples the offending rows in split layout.
pub fn check_not_null(
    rule: &RuleDeclaration,
    dataset: &DataSet,
    sample_limit: usize,
) -> Result<Outcome, RuleIssue> {
    let (_, idx) = required_column(rule, dataset)?;
    let findings = dataset.filter(|row| row[idx].is_null_equivalent());
    Ok(outcome_from_findings(rule, &findings, sample_limit))
}

/// Fails if any key occurs more than once.
///
/// The key is the rule's column or, for table-level rules, the `columns` list
/// in the value config. Rows with a null in any key column are not grouped.
/// The failure detail lists each duplicated key with its `found` count, in
/// order of first appearance.
pub fn check_unique(
    rule: &RuleDeclaration,
    dataset: &DataSet,
    sample_limit: usize,
) -> Result<Outcome, RuleIssue> {
    let columns = unique_columns(rule)?;
    let indices = columns
        .iter()
        .map(|c| {
            dataset
                .column_index(c)
                .ok_or_else(|| RuleIssue::MissingColumn(c.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let groups = group_counts(dataset, &indices);

    let mut header = columns.clone();
    header.push(FOUND_COLUMN.to_string());
    let mut findings = DataSet::new(header);
    for (values, found) in groups.into_iter().filter(|(_, found)| *found > 1) {
        let mut row = values;
        row.push(DataValue::Int(found as i64));
        findings
            .add_row(row)
            .map_err(|e| RuleIssue::config(e.to_string()))?;
    }

    Ok(outcome_from_findings(rule, &findings, sample_limit))
}

fn unique_columns(rule: &RuleDeclaration) -> Result<Vec<String>, RuleIssue> {
    let columns = match rule.column() {
        Some(column) => vec![column.to_string()],
        None if rule.value_config.trim().is_empty() => Vec::new(),
        None => rule.unique_config()?.columns,
    };

    if columns.is_empty() {
        return Err(RuleIssue::config("Unique check required column(s)."));
    }
    Ok(columns)
}

/// Counts rows per key, keeping first-appearance order.
fn group_counts(dataset: &DataSet, indices: &[usize]) -> Vec<(Vec<DataValue>, usize)> {
    let mut positions: HashMap<Vec<ValueKey>, usize> = HashMap::new();
    let mut groups: Vec<(Vec<DataValue>, usize)> = Vec::new();

    for row in dataset.rows() {
        let values: Vec<DataValue> = indices.iter().map(|&i| row[i].clone()).collect();
        let key: Vec<ValueKey> = values.iter().map(DataValue::key).collect();
        if key
            .iter()
            .any(|k| matches!(k, ValueKey::Null | ValueKey::NaN))
        {
            continue;
        }

        match positions.get(&key) {
            Some(&pos) => groups[pos].1 += 1,
            None => {
                positions.insert(key, groups.len());
                groups.push((values, 1));
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use dqv_core::{RuleBuilder, TestType, Validated};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn detail(outcome: &Outcome) -> Value {
        serde_json::from_str(outcome.failure_detail.as_deref().unwrap()).unwrap()
    }

    fn people() -> DataSet {
        DataSet::from_rows(
            ["id", "name", "city"],
            vec![
                vec![DataValue::Int(1), "ann".into(), "Rome".into()],
                vec![DataValue::Int(2), "bob".into(), "None".into()],
                vec![DataValue::Int(3), "cid".into(), DataValue::Null],
                vec![DataValue::Int(4), "ann".into(), "Rome".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_not_null_pass() {
        let rule = RuleBuilder::new("people", TestType::NotNull).column("id").build();
        let outcome = check_not_null(&rule, &people(), 10).unwrap();
        assert_eq!(outcome.validated, Validated::Passed);
        assert_eq!(outcome.failure_detail, None);
    }

    #[test]
    fn test_not_null_fail_samples_rows() {
        let rule = RuleBuilder::new("people", TestType::NotNull).column("city").build();
        let outcome = check_not_null(&rule, &people(), 10).unwrap();
        assert_eq!(outcome.validated, Validated::Failed);
        assert_eq!(
            detail(&outcome),
            json!({
                "columns": ["id", "name", "city"],
                "data": [[2, "bob", "None"], [3, "cid", null]]
            })
        );
    }

    #[test]
    fn test_not_null_is_idempotent() {
        let rule = RuleBuilder::new("people", TestType::NotNull).column("city").build();
        let dataset = people();
        let first = check_not_null(&rule, &dataset, 10).unwrap();
        let second = check_not_null(&rule, &dataset, 10).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_not_null_sampling_cap() {
        let rows = (0..50).map(|i| vec![DataValue::Int(i), DataValue::Null]).collect();
        let dataset = DataSet::from_rows(["id", "email"], rows).unwrap();
        let rule = RuleBuilder::new("t", TestType::NotNull).column("email").build();

        let outcome = check_not_null(&rule, &dataset, 10).unwrap();
        assert_eq!(detail(&outcome)["data"].as_array().unwrap().len(), 10);
    }

    #[test]
    fn test_not_null_without_column() {
        let rule = RuleBuilder::new("people", TestType::NotNull).build();
        assert!(matches!(
            check_not_null(&rule, &people(), 10),
            Err(RuleIssue::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_unique_single_column_pass() {
        let rule = RuleBuilder::new("people", TestType::Unique).column("id").build();
        let outcome = check_unique(&rule, &people(), 10).unwrap();
        assert_eq!(outcome.validated, Validated::Passed);
    }

    #[test]
    fn test_unique_one_duplicate_pair() {
        let rule = RuleBuilder::new("people", TestType::Unique)
            .value_config(r#"{"columns": ["name", "city"]}"#)
            .build();
        let outcome = check_unique(&rule, &people(), 10).unwrap();

        assert_eq!(outcome.validated, Validated::Failed);
        assert_eq!(
            detail(&outcome),
            json!({"columns": ["name", "city", "found"], "data": [["ann", "Rome", 2]]})
        );
    }

    #[test]
    fn test_unique_ignores_null_keys() {
        let dataset = DataSet::from_rows(
            ["code"],
            vec![
                vec![DataValue::Null],
                vec![DataValue::Null],
                vec![DataValue::Float(f64::NAN)],
                vec![DataValue::Float(f64::NAN)],
            ],
        )
        .unwrap();
        let rule = RuleBuilder::new("t", TestType::Unique).column("code").build();
        assert_eq!(
            check_unique(&rule, &dataset, 10).unwrap().validated,
            Validated::Passed
        );
    }

    #[test]
    fn test_unique_numeric_equivalence() {
        let dataset = DataSet::from_rows(
            ["code"],
            vec![vec![DataValue::Int(7)], vec![DataValue::Float(7.0)]],
        )
        .unwrap();
        let rule = RuleBuilder::new("t", TestType::Unique).column("code").build();
        assert_eq!(
            check_unique(&rule, &dataset, 10).unwrap().validated,
            Validated::Failed
        );
    }

    #[test]
    fn test_unique_group_cap() {
        let rows = (0..30)
            .flat_map(|i| [vec![DataValue::Int(i)], vec![DataValue::Int(i)]])
            .collect();
        let dataset = DataSet::from_rows(["id"], rows).unwrap();
        let rule = RuleBuilder::new("t", TestType::Unique).column("id").build();

        let outcome = check_unique(&rule, &dataset, 10).unwrap();
        let data = detail(&outcome)["data"].as_array().unwrap().clone();
        assert_eq!(data.len(), 10);
        assert_eq!(data[0], json!([0, 2]));
    }

    #[test]
    fn test_unique_configuration_errors() {
        let no_columns = RuleBuilder::new("t", TestType::Unique).build();
        assert_eq!(
            check_unique(&no_columns, &people(), 10),
            Err(RuleIssue::config("Unique check required column(s)."))
        );

        let empty_list = RuleBuilder::new("t", TestType::Unique)
            .value_config(r#"{"columns": []}"#)
            .build();
        assert!(check_unique(&empty_list, &people(), 10).is_err());

        let unknown = RuleBuilder::new("t", TestType::Unique)
            .value_config(r#"{"columns": ["nope"]}"#)
            .build();
        assert_eq!(
            check_unique(&unknown, &people(), 10),
            Err(RuleIssue::MissingColumn("nope".to_string()))
        );
    }
}
