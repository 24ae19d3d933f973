//! Outcomes, diagnostics and the aggregated validation log.

use crate::RuleDeclaration;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pass/fail status of one evaluated rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Validated {
    Passed,
    Failed,
}

impl Validated {
    pub fn as_str(&self) -> &'static str {
        match self {
            Validated::Passed => "Passed",
            Validated::Failed => "Failed",
        }
    }
}

impl fmt::Display for Validated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of evaluating one rule declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// The evaluated rule, echoed verbatim
    pub rule: RuleDeclaration,

    /// Whether the rule held
    pub validated: Validated,

    /// `None` on pass; on failure a JSON fragment describing the offending data
    pub failure_detail: Option<String>,
}

impl Outcome {
    /// Creates a passing outcome.
    pub fn passed(rule: &RuleDeclaration) -> Self {
        Self {
            rule: rule.clone(),
            validated: Validated::Passed,
            failure_detail: None,
        }
    }

    /// Creates a failing outcome carrying `detail`.
    pub fn failed(rule: &RuleDeclaration, detail: impl Into<String>) -> Self {
        Self {
            rule: rule.clone(),
            validated: Validated::Failed,
            failure_detail: Some(detail.into()),
        }
    }

    /// Returns true if the rule did not hold.
    pub fn is_failed(&self) -> bool {
        self.validated == Validated::Failed
    }
}

/// Category of a skipped rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// Unsupported test type, malformed value config, missing column list, ...
    Configuration,
    /// Data cannot be interpreted the way the check requires
    Data,
    /// Infrastructure failure isolated to a single rule (fail-fast disabled)
    Infrastructure,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::Configuration => "configuration",
            DiagnosticKind::Data => "data",
            DiagnosticKind::Infrastructure => "infrastructure",
        };
        f.write_str(name)
    }
}

/// A rule that produced no outcome, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub rule: RuleDeclaration,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(rule: &RuleDeclaration, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            rule: rule.clone(),
            kind,
            message: message.into(),
        }
    }
}

/// One row of the tabular log, keyed by the log header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRow {
    #[serde(rename = "Target Table")]
    pub target_table: String,
    #[serde(rename = "Column Name")]
    pub column_name: Option<String>,
    #[serde(rename = "Test")]
    pub test: String,
    #[serde(rename = "Value Config")]
    pub value_config: String,
    #[serde(rename = "Severity")]
    pub severity: String,
    #[serde(rename = "Validated")]
    pub validated: Validated,
    #[serde(rename = "Failure Data")]
    pub failure_data: Option<String>,
}

impl From<&Outcome> for LogRow {
    fn from(outcome: &Outcome) -> Self {
        Self {
            target_table: outcome.rule.target_table.clone(),
            column_name: outcome.rule.column_name.clone(),
            test: outcome.rule.test_type.to_string(),
            value_config: outcome.rule.value_config.clone(),
            severity: outcome.rule.severity.clone(),
            validated: outcome.validated,
            failure_data: outcome.failure_detail.clone(),
        }
    }
}

/// Ordered result of a validation run.
///
/// Outcomes appear in dispatch order, which is the catalog order filtered by
/// rule selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationLog {
    /// Table the run validated
    pub target_table: String,

    /// One entry per dispatched rule that produced a result
    pub outcomes: Vec<Outcome>,

    /// Rules that were skipped, in dispatch order
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationLog {
    /// Column header of the tabular log.
    pub const HEADER: [&'static str; 7] = [
        "Target Table",
        "Column Name",
        "Test",
        "Value Config",
        "Severity",
        "Validated",
        "Failure Data",
    ];

    /// Creates an empty log for `target_table`.
    pub fn new(target_table: impl Into<String>) -> Self {
        Self {
            target_table: target_table.into(),
            ..Default::default()
        }
    }

    /// Appends an outcome.
    pub fn record(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    /// Appends a diagnostic.
    pub fn skip(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Materialises the outcomes as header-keyed rows.
    pub fn rows(&self) -> Vec<LogRow> {
        self.outcomes.iter().map(LogRow::from).collect()
    }

    /// Outcomes whose rule did not hold.
    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    /// Returns true if no outcome failed.
    pub fn passed(&self) -> bool {
        self.failures().next().is_none()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Serializes the tabular log as a JSON array of header-keyed records.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.rows())
    }
}
