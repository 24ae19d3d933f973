//! Reasons a rule is skipped without producing an outcome.

use dqv_core::{Diagnostic, DiagnosticKind, RuleDeclaration};
use thiserror::Error;

/// Non-fatal problems that skip a single rule.
///
/// Infrastructure failures are not listed here; they are
/// [`ValidationError`](dqv_core::ValidationError)s and abort the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleIssue {
    /// The catalog names a test type the engine does not implement
    #[error("Test '{0}' is not supported")]
    UnsupportedTest(String),

    /// The value config is malformed or incomplete
    #[error("Incorrect validation configuration. {0}")]
    InvalidConfig(String),

    /// The rule needs a column but none is configured or it is absent from the dataset
    #[error("Column '{0}' is not present in the dataset")]
    MissingColumn(String),

    /// A dataset check was dispatched without a dataset
    #[error("Test '{0}' requires a dataset")]
    MissingDataset(String),

    /// The column cannot be read as timestamps
    #[error("Data type of {column} is not a date/time style. Validation was ignored. ({reason})")]
    NotTemporal { column: String, reason: String },
}

impl RuleIssue {
    /// Creates a new configuration issue.
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Category of this issue.
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            RuleIssue::NotTemporal { .. } => DiagnosticKind::Data,
            _ => DiagnosticKind::Configuration,
        }
    }

    /// Attaches this issue to `rule`.
    pub fn into_diagnostic(self, rule: &RuleDeclaration) -> Diagnostic {
        Diagnostic::new(rule, self.kind(), self.to_string())
    }
}

impl From<serde_json::Error> for RuleIssue {
    fn from(err: serde_json::Error) -> Self {
        RuleIssue::InvalidConfig(format!("Value config is not valid: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dqv_core::{RuleBuilder, TestType};

    #[test]
    fn test_issue_kinds() {
        assert_eq!(
            RuleIssue::UnsupportedTest("Range".into()).kind(),
            DiagnosticKind::Configuration
        );
        assert_eq!(
            RuleIssue::NotTemporal {
                column: "ts".into(),
                reason: "cannot read bool value as a timestamp".into(),
            }
            .kind(),
            DiagnosticKind::Data
        );
    }

    #[test]
    fn test_into_diagnostic() {
        let rule = RuleBuilder::new("t", "Range").column("age").build();
        let diagnostic = RuleIssue::UnsupportedTest(rule.test_type.to_string()).into_diagnostic(&rule);
        assert_eq!(diagnostic.rule.test_type, TestType::Unknown("Range".into()));
        assert_eq!(diagnostic.message, "Test 'Range' is not supported");
    }
}
