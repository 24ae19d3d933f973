//! Tests to verify consistent handling of null-equivalent values across checks.
//!
//! Upstream sources spell "missing" in several ways. Every check must agree on
//! the same family: a real null, NaN, and the strings "", "None", "NaN", "nan"
//! and "NaT".

use dqv_core::{RuleBuilder, TestType, Validated, ValidationError};
use dqv_validator::{
    Connection, DataSet, DataValidator, DataValue, StaticCatalog, check_freshness, check_not_null,
    check_unique,
};
use std::cell::RefCell;

/// Connection that records queries and returns an empty result.
#[derive(Default)]
struct RecordingConnection {
    executed: RefCell<Vec<String>>,
}

impl Connection for RecordingConnection {
    fn query(&self, sql: &str) -> Result<DataSet, ValidationError> {
        self.executed.borrow_mut().push(sql.to_string());
        Ok(DataSet::new(["id"]))
    }
}

fn null_spellings() -> Vec<DataValue> {
    vec![
        DataValue::Null,
        DataValue::Float(f64::NAN),
        "".into(),
        "None".into(),
        "NaN".into(),
        "nan".into(),
        "NaT".into(),
    ]
}

fn single_column(name: &str, values: Vec<DataValue>) -> DataSet {
    DataSet::from_rows([name], values.into_iter().map(|v| vec![v]).collect()).unwrap()
}

#[test]
fn test_every_null_spelling_fails_not_null() {
    let rule = RuleBuilder::new("t", TestType::NotNull).column("email").build();

    for value in null_spellings() {
        let dataset = single_column("email", vec!["a@b.c".into(), value.clone()]);
        let outcome = check_not_null(&rule, &dataset, 10).unwrap();
        assert_eq!(
            outcome.validated,
            Validated::Failed,
            "{value:?} should count as missing"
        );
    }
}

#[test]
fn test_lookalikes_are_not_null() {
    let rule = RuleBuilder::new("t", TestType::NotNull).column("email").build();
    let dataset = single_column(
        "email",
        vec!["null".into(), "NULL".into(), " ".into(), "none".into(), DataValue::Int(0)],
    );

    let outcome = check_not_null(&rule, &dataset, 10).unwrap();
    assert_eq!(outcome.validated, Validated::Passed);
}

#[test]
fn test_null_keys_never_duplicate() {
    let rule = RuleBuilder::new("t", TestType::Unique).column("code").build();
    let dataset = single_column(
        "code",
        vec![DataValue::Null, DataValue::Null, DataValue::Float(f64::NAN), DataValue::Float(f64::NAN)],
    );

    assert_eq!(
        check_unique(&rule, &dataset, 10).unwrap().validated,
        Validated::Passed
    );
}

#[test]
fn test_freshness_ignores_missing_timestamps() {
    let now = chrono::NaiveDateTime::parse_from_str("2024-03-10 12:00:00", "%Y-%m-%d %H:%M:%S")
        .unwrap();
    let rule = RuleBuilder::new("t", TestType::Freshness)
        .column("ts")
        .value_config(r#"{"count": 1, "period": "hour"}"#)
        .build();

    let mut values = null_spellings();
    values.push("2024-03-10 11:30:00".into());
    let dataset = single_column("ts", values);

    assert_eq!(
        check_freshness(&rule, &dataset, now).unwrap().validated,
        Validated::Passed
    );
}

#[test]
fn test_freshness_passes_on_only_missing_timestamps() {
    let now = chrono::NaiveDateTime::parse_from_str("2024-03-10 12:00:00", "%Y-%m-%d %H:%M:%S")
        .unwrap();
    let rule = RuleBuilder::new("t", TestType::Freshness)
        .column("ts")
        .value_config(r#"{"count": 1, "period": "hour"}"#)
        .build();
    let dataset = single_column("ts", null_spellings());

    let outcome = check_freshness(&rule, &dataset, now).unwrap();
    assert_eq!(outcome.validated, Validated::Passed);
    assert_eq!(outcome.failure_detail, None);
}

#[test]
fn test_reference_lookup_skips_null_spellings() {
    let connection = RecordingConnection::default();
    let catalog = StaticCatalog::new(vec![
        RuleBuilder::new("orders", TestType::ReferenceValues)
            .column("customer")
            .value_config(r#"{"table": "customers", "column": "name"}"#)
            .build(),
    ]);

    let mut values = null_spellings();
    values.push("ann".into());
    let dataset = single_column("customer", values);

    let log = DataValidator::new(&connection, &catalog)
        .validate("orders", Some(&dataset))
        .unwrap();

    assert_eq!(
        connection.executed.borrow().as_slice(),
        ["select name as id from customers where name in ('ann', 'ann')"]
    );
    assert_eq!(log.outcomes[0].failure_detail.as_deref(), Some(r#"["ann"]"#));
}

#[test]
fn test_all_null_reference_column_passes_without_query() {
    let connection = RecordingConnection::default();
    let catalog = StaticCatalog::new(vec![
        RuleBuilder::new("orders", TestType::ReferenceValues)
            .column("customer")
            .value_config(r#"{"table": "customers", "column": "name"}"#)
            .build(),
    ]);
    let dataset = single_column("customer", null_spellings());

    let log = DataValidator::new(&connection, &catalog)
        .validate("orders", Some(&dataset))
        .unwrap();

    assert!(log.passed());
    assert_eq!(log.len(), 1);
    assert!(connection.executed.borrow().is_empty());
}
