//! SQL assertion check.
//!
//! The value config is a query that returns no rows while the assertion
//! holds. It is executed verbatim: the query text is operator-supplied
//! configuration and is trusted as such.

use crate::checks::{Evaluation, outcome_from_findings};
use crate::{Connection, RuleIssue};
use dqv_core::{RuleDeclaration, ValidationError};
use tracing::debug;

/// Runs the rule's query and fails if it returns any row.
///
/// The failure detail samples the returned rows in split layout. An empty
/// query skips the rule; execution failures are returned as `Err`.
pub fn check_sql_assertion(
    rule: &RuleDeclaration,
    connection: &dyn Connection,
    sample_limit: usize,
) -> Result<Evaluation, ValidationError> {
    let sql = rule.value_config.trim();
    if sql.is_empty() {
        return Ok(Evaluation::Skipped(RuleIssue::config(
            "SQL-Assertion definition is empty.",
        )));
    }

    debug!("Assertion query: {}", sql);
    let violations = connection.query(sql)?;
    Ok(Evaluation::Outcome(outcome_from_findings(
        rule,
        &violations,
        sample_limit,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::mock::MockConnection;
    use crate::{DataSet, DataValue};
    use dqv_core::{RuleBuilder, TestType, Validated};
    use pretty_assertions::assert_eq;

    fn assertion(sql: &str) -> RuleDeclaration {
        RuleBuilder::new("orders", TestType::SqlAssertion)
            .value_config(sql)
            .severity("High")
            .build()
    }

    #[test]
    fn test_no_rows_passes() {
        let connection = MockConnection::new().respond("from orders", DataSet::new(["id"]));
        let rule = assertion("select id from orders where amount < 0");

        let evaluation = check_sql_assertion(&rule, &connection, 10).unwrap();
        assert_eq!(evaluation.outcome().unwrap().validated, Validated::Passed);
        assert_eq!(
            connection.executed(),
            vec!["select id from orders where amount < 0".to_string()]
        );
    }

    #[test]
    fn test_returned_rows_fail() {
        let rows = (0..25).map(|i| vec![DataValue::Int(i)]).collect();
        let connection = MockConnection::new()
            .respond("from orders", DataSet::from_rows(["id"], rows).unwrap());
        let rule = assertion("select id from orders where amount < 0");

        let evaluation = check_sql_assertion(&rule, &connection, 10).unwrap();
        let outcome = evaluation.outcome().unwrap();
        assert_eq!(outcome.validated, Validated::Failed);

        let detail: serde_json::Value =
            serde_json::from_str(outcome.failure_detail.as_deref().unwrap()).unwrap();
        assert_eq!(detail["columns"], serde_json::json!(["id"]));
        assert_eq!(detail["data"].as_array().unwrap().len(), 10);
    }

    #[test]
    fn test_empty_query_is_skipped() {
        let connection = MockConnection::new();
        let evaluation = check_sql_assertion(&assertion("  "), &connection, 10).unwrap();
        assert!(matches!(evaluation, Evaluation::Skipped(RuleIssue::InvalidConfig(_))));
        assert!(connection.executed().is_empty());
    }

    #[test]
    fn test_query_failure_is_fatal() {
        let connection = MockConnection::new().fail("from orders", "syntax error");
        let err = check_sql_assertion(&assertion("select from orders"), &connection, 10)
            .unwrap_err();
        assert!(matches!(err, ValidationError::Query { .. }));
    }
}
