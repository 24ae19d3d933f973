//! Dispatch target shared by the check routines.
//!
//! Every routine consumes one rule declaration and emits exactly one
//! [`Evaluation`]: an outcome, or the reason the rule was skipped.

use crate::{DataSet, RuleIssue};
use dqv_core::{Outcome, RuleDeclaration};

/// Result of running one check routine.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// The rule was evaluated
    Outcome(Outcome),
    /// The rule could not be evaluated and produces no outcome
    Skipped(RuleIssue),
}

impl Evaluation {
    /// Returns the outcome, if the rule was evaluated.
    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            Evaluation::Outcome(outcome) => Some(outcome),
            Evaluation::Skipped(_) => None,
        }
    }
}

impl From<Result<Outcome, RuleIssue>> for Evaluation {
    fn from(result: Result<Outcome, RuleIssue>) -> Self {
        match result {
            Ok(outcome) => Evaluation::Outcome(outcome),
            Err(issue) => Evaluation::Skipped(issue),
        }
    }
}

/// Resolves the rule's column to its position in `dataset`.
pub(crate) fn required_column<'r>(
    rule: &'r RuleDeclaration,
    dataset: &DataSet,
) -> Result<(&'r str, usize), RuleIssue> {
    let column = rule.column().ok_or_else(|| {
        RuleIssue::config(format!("'{}' check requires a column name.", rule.test_type))
    })?;
    let idx = dataset
        .column_index(column)
        .ok_or_else(|| RuleIssue::MissingColumn(column.to_string()))?;
    Ok((column, idx))
}

/// Builds the outcome for a row-sampling check from its offending rows.
pub(crate) fn outcome_from_findings(
    rule: &RuleDeclaration,
    findings: &DataSet,
    sample_limit: usize,
) -> Outcome {
    if findings.is_empty() {
        Outcome::passed(rule)
    } else {
        Outcome::failed(rule, findings.to_split_json(sample_limit).to_string())
    }
}
