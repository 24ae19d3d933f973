//! Membership constraints.
//!
//! This module handles:
//! - Accepted Values: every value in the column must be in a literal allow-list
//! - Reference Values: every distinct value must exist in a reference table

use crate::checks::{Evaluation, outcome_from_findings, required_column};
use crate::connection::quote_literal;
use crate::{Connection, DataSet, DataValue, RuleIssue, ValueKey};
use dqv_core::{Outcome, RuleDeclaration, ValidationError};
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::debug;

/// Fails if any row's value in the rule's column is not in the allow-list.
///
/// The allow-list is the JSON array in the value config. Values compare with
/// numeric equivalence, so `1` accepts `1.0`. The failure detail samples the
/// offending rows in split layout.
pub fn check_accepted_values(
    rule: &RuleDeclaration,
    dataset: &DataSet,
    sample_limit: usize,
) -> Result<Outcome, RuleIssue> {
    let allowed: HashSet<ValueKey> = rule
        .accepted_values()?
        .iter()
        .map(|v| DataValue::from_json(v).key())
        .collect();
    let (_, idx) = required_column(rule, dataset)?;

    let findings = dataset.filter(|row| !allowed.contains(&row[idx].key()));
    Ok(outcome_from_findings(rule, &findings, sample_limit))
}

/// Fails if any distinct value of the rule's column is absent from the
/// reference table.
///
/// Issues one lookup against `connection`. Null-equivalent values are never
/// looked up, and a column with nothing to look up passes without a query.
/// The failure detail is a JSON array of the missing values.
///
/// Lookup failures are infrastructure errors and are returned as `Err`.
pub fn check_reference_values(
    rule: &RuleDeclaration,
    dataset: &DataSet,
    connection: &dyn Connection,
) -> Result<Evaluation, ValidationError> {
    let prepared = prepare_reference(rule, dataset);
    let (values, sql) = match prepared {
        Ok(Some(lookup)) => lookup,
        Ok(None) => return Ok(Evaluation::Outcome(Outcome::passed(rule))),
        Err(issue) => return Ok(Evaluation::Skipped(issue)),
    };

    debug!("Reference lookup: {}", sql);
    let reference = connection.query(&sql)?;
    let found: HashSet<ValueKey> = reference
        .rows()
        .filter_map(|row| row.first())
        .map(DataValue::key)
        .collect();

    let missing: Vec<Value> = values
        .iter()
        .filter(|v| !found.contains(&v.key()))
        .map(DataValue::to_json)
        .collect();

    let outcome = if missing.is_empty() {
        Outcome::passed(rule)
    } else {
        Outcome::failed(rule, Value::Array(missing).to_string())
    };
    Ok(Evaluation::Outcome(outcome))
}

/// Collects the distinct values and builds the lookup query, or `None` when
/// there is nothing to look up.
fn prepare_reference(
    rule: &RuleDeclaration,
    dataset: &DataSet,
) -> Result<Option<(Vec<DataValue>, String)>, RuleIssue> {
    let config = rule.reference_config()?;
    if config.table.trim().is_empty() || config.column.trim().is_empty() {
        return Err(RuleIssue::config(
            "Reference Values requires 'table' and 'column'.",
        ));
    }
    let (_, idx) = required_column(rule, dataset)?;

    let values = distinct_values(dataset, idx);
    if values.is_empty() {
        return Ok(None);
    }

    let sql = reference_query(&config.table, &config.column, config.filter(), &values);
    Ok(Some((values, sql)))
}

/// Distinct non-null-equivalent values of a column in first-appearance order.
///
/// Infinite floats cannot match a reference key and are left out.
fn distinct_values(dataset: &DataSet, idx: usize) -> Vec<DataValue> {
    let mut seen = HashSet::new();
    dataset
        .rows()
        .map(|row| &row[idx])
        .filter(|value| !value.is_null_equivalent())
        .filter(|value| !matches!(value, DataValue::Float(f) if !f.is_finite()))
        .filter(|value| seen.insert(value.key()))
        .cloned()
        .collect()
}

/// Timestamp layout for SQL literals; keeps sub-second precision.
const SQL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

fn has_where_keyword(filter: &str) -> bool {
    static WHERE: OnceLock<Option<Regex>> = OnceLock::new();
    WHERE
        .get_or_init(|| Regex::new(r"(?i)^\s*where\b").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(filter))
}

/// Builds `select <column> as id from <table> where [<filter> and] <column> in (..)`.
///
/// A single value is listed twice so the IN-list is never a one-element
/// tuple, which some dialects reject.
pub fn reference_query(
    table: &str,
    column: &str,
    filter: Option<&str>,
    values: &[DataValue],
) -> String {
    let mut literals: Vec<String> = values.iter().map(sql_literal).collect();
    if literals.len() == 1 {
        literals.push(literals[0].clone());
    }
    let membership = format!("{column} in ({})", literals.join(", "));

    let condition = match filter.map(str::trim) {
        Some(filter) if has_where_keyword(filter) => {
            format!("{filter} and {membership}")
        }
        Some(filter) => format!("where {filter} and {membership}"),
        None => format!("where {membership}"),
    };

    format!("select {column} as id from {table} {condition}")
}

/// Renders a value as a SQL literal.
pub fn sql_literal(value: &DataValue) -> String {
    match value {
        DataValue::Null => "null".to_string(),
        DataValue::String(s) => quote_literal(s),
        DataValue::Int(i) => i.to_string(),
        DataValue::Float(f) if f.is_finite() => f.to_string(),
        DataValue::Float(f) => quote_literal(&f.to_string()),
        DataValue::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        DataValue::Timestamp(ts) => quote_literal(&ts.format(SQL_TIMESTAMP_FORMAT).to_string()),
    }
}
