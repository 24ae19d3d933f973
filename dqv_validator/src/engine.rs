//! Main validation engine.
//!
//! This module provides the `DataValidator` that loads the rule catalog for a
//! table, selects the runnable rules, dispatches each one to its check routine
//! and aggregates the outcomes into a [`ValidationLog`].

use crate::{
    Connection, DataSet, Evaluation, RuleIssue, RuleSource, RunMode, check_accepted_values,
    check_freshness, check_not_null, check_reference_values, check_sql_assertion, check_unique,
    select_rules,
};
use dqv_core::{
    Diagnostic, DiagnosticKind, Outcome, RuleDeclaration, TestType, ValidationContext,
    ValidationError, ValidationLog, error_context,
};
use std::time::Instant;
use tracing::{debug, error, info};

/// Main validation engine.
///
/// Borrows the database connection for its whole lifetime; opening and
/// releasing it is the caller's job.
///
/// # Example
///
/// ```rust,ignore
/// use dqv_validator::{DataValidator, SqlCatalog};
///
/// let catalog = SqlCatalog::new(&connection);
/// let validator = DataValidator::new(&connection, &catalog);
///
/// let log = validator.validate("st_project", Some(&dataset))?;
/// for failure in log.failures() {
///     println!("{}: {:?}", failure.rule, failure.failure_detail);
/// }
/// ```
pub struct DataValidator<'a> {
    connection: &'a dyn Connection,
    source: &'a dyn RuleSource,
    context: ValidationContext,
}

impl<'a> DataValidator<'a> {
    /// Creates a validator with the default context.
    pub fn new(connection: &'a dyn Connection, source: &'a dyn RuleSource) -> Self {
        Self {
            connection,
            source,
            context: ValidationContext::default(),
        }
    }

    /// Replaces the validation context.
    pub fn with_context(mut self, context: ValidationContext) -> Self {
        self.context = context;
        self
    }

    /// Validates `target_table`.
    ///
    /// Without a dataset only SQL assertions run. With one, every other rule
    /// whose column is present (or that is table-level) runs, in catalog order.
    ///
    /// # Errors
    ///
    /// Fails if the catalog cannot be read, or, with `fail_fast` set, on the
    /// first infrastructure error raised by a rule. No partial log is returned
    /// in either case.
    pub fn validate(
        &self,
        target_table: &str,
        dataset: Option<&DataSet>,
    ) -> Result<ValidationLog, ValidationError> {
        let start = Instant::now();
        let rules = self.source.load(target_table)?;
        let selected = select_rules(&rules, dataset);
        let mode = RunMode::for_dataset(dataset);

        info!(
            "Validating {}: {} of {} rule(s) selected ({:?})",
            target_table,
            selected.len(),
            rules.len(),
            mode
        );

        let mut run = ValidationRun {
            log: ValidationLog::new(target_table),
            mode,
            connection: self.connection,
            dataset,
            context: &self.context,
        };
        for rule in selected {
            run.dispatch(rule)?;
        }

        let log = run.finish();
        info!(
            "Validated {} in {} ms: {} outcome(s), {} failed, {} skipped",
            target_table,
            start.elapsed().as_millis(),
            log.len(),
            log.failures().count(),
            log.diagnostics.len()
        );
        Ok(log)
    }
}

/// State of one invocation; dropped once the log is handed back.
struct ValidationRun<'r> {
    log: ValidationLog,
    mode: RunMode,
    connection: &'r dyn Connection,
    dataset: Option<&'r DataSet>,
    context: &'r ValidationContext,
}

impl ValidationRun<'_> {
    fn dispatch(&mut self, rule: &RuleDeclaration) -> Result<(), ValidationError> {
        info!("Validating on {}", rule);
        let limit = self.context.sample_limit();

        let evaluation = match &rule.test_type {
            TestType::Freshness => {
                let now = self.context.current_time();
                self.dataset_check(rule, |d| check_freshness(rule, d, now))
            }
            TestType::Unique => self.dataset_check(rule, |d| check_unique(rule, d, limit)),
            TestType::NotNull => self.dataset_check(rule, |d| check_not_null(rule, d, limit)),
            TestType::AcceptedValues => {
                self.dataset_check(rule, |d| check_accepted_values(rule, d, limit))
            }
            TestType::ReferenceValues => match self.dataset {
                Some(dataset) => check_reference_values(rule, dataset, self.connection),
                None => Ok(Evaluation::Skipped(RuleIssue::MissingDataset(
                    rule.test_type.to_string(),
                ))),
            },
            TestType::SqlAssertion => check_sql_assertion(rule, self.connection, limit),
            TestType::Unknown(name) => Ok(Evaluation::Skipped(RuleIssue::UnsupportedTest(
                name.clone(),
            ))),
        };

        match evaluation {
            Ok(Evaluation::Outcome(outcome)) => self.record(outcome),
            Ok(Evaluation::Skipped(issue)) => {
                error!("{} ({})", issue, rule);
                self.log.skip(issue.into_diagnostic(rule));
            }
            Err(err) if self.context.fail_fast => {
                error!("Validation aborted on {}: {}", rule, err);
                return Err(ValidationError::aborted(rule.to_string(), &err));
            }
            Err(err) => {
                error!("Rule failed to run, continuing: {} ({})", err, rule);
                self.log.skip(Diagnostic::new(
                    rule,
                    DiagnosticKind::Infrastructure,
                    error_context(&err),
                ));
            }
        }
        Ok(())
    }

    fn dataset_check<F>(&self, rule: &RuleDeclaration, check: F) -> Result<Evaluation, ValidationError>
    where
        F: FnOnce(&DataSet) -> Result<Outcome, RuleIssue>,
    {
        Ok(match self.dataset {
            Some(dataset) => check(dataset).into(),
            None => Evaluation::Skipped(RuleIssue::MissingDataset(rule.test_type.to_string())),
        })
    }

    fn record(&mut self, outcome: Outcome) {
        debug!(
            "{} -> {} ({:?} run)",
            outcome.rule, outcome.validated, self.mode
        );
        self.log.record(outcome);
    }

    fn finish(self) -> ValidationLog {
        self.log
    }
}
