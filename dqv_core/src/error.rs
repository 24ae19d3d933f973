//! Error types for validation runs.
//!
//! Only infrastructure failures are errors. Configuration and data problems
//! that merely skip a rule are reported as [`Diagnostic`](crate::Diagnostic)s
//! inside the validation log instead.

use thiserror::Error;

/// Maximum length, in characters, of the error context surfaced to callers.
pub const MAX_ERROR_CONTEXT: usize = 4000;

/// Result type for validation operations.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Run-terminating failures.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The rule catalog could not be read
    #[error("Failed to load validation rules for '{table}': {message}")]
    Catalog {
        /// Target table whose rules were requested
        table: String,
        /// Underlying failure
        message: String,
    },

    /// A query issued against the database failed
    #[error("Query execution failed: {message}")]
    Query {
        /// Query text as issued
        query: String,
        /// Database error message
        message: String,
    },

    /// The database connection could not be opened or was lost
    #[error("Connection error: {0}")]
    Connection(String),

    /// A dataset could not be built from the supplied data
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// A rule raised an infrastructure error and the run was aborted
    #[error("Validation aborted on {rule}: {context}")]
    Aborted {
        /// Display form of the rule that was running
        rule: String,
        /// Error chain, truncated to [`MAX_ERROR_CONTEXT`] characters
        context: String,
    },
}

impl ValidationError {
    /// Creates a new query error.
    pub fn query(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Query {
            query: query.into(),
            message: message.into(),
        }
    }

    /// Creates a new catalog error.
    pub fn catalog(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Catalog {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Wraps `source` as the reason a run was aborted while evaluating `rule`.
    ///
    /// The full error chain is captured and truncated to [`MAX_ERROR_CONTEXT`].
    pub fn aborted(rule: impl Into<String>, source: &(dyn std::error::Error + 'static)) -> Self {
        Self::Aborted {
            rule: rule.into(),
            context: error_context(source),
        }
    }
}

/// Renders an error and its sources as one line, truncated to [`MAX_ERROR_CONTEXT`].
pub fn error_context(error: &(dyn std::error::Error + 'static)) -> String {
    let mut context = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        context.push_str(": ");
        context.push_str(&cause.to_string());
        source = cause.source();
    }
    truncate_chars(context, MAX_ERROR_CONTEXT)
}

fn truncate_chars(mut text: String, max_chars: usize) -> String {
    if let Some((byte_idx, _)) = text.char_indices().nth(max_chars) {
        text.truncate(byte_idx);
    }
    text
}
