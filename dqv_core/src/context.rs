//! Options for a validation run.

use chrono::{Local, NaiveDateTime};

/// Hard upper bound on the number of rows sampled into a failure detail.
pub const MAX_SAMPLE_ROWS: usize = 10;

/// Context for validation operations.
///
/// Carries the per-run options that do not belong to any single rule.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Maximum number of rows reported in a failure sample (never above [`MAX_SAMPLE_ROWS`])
    pub sample_limit: usize,

    /// Abort the whole run on the first infrastructure error.
    ///
    /// When disabled, a rule whose query fails is reported as a diagnostic and
    /// the remaining rules still run.
    pub fail_fast: bool,

    /// Clock override for freshness checks; local wall time when unset
    pub now: Option<NaiveDateTime>,
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self {
            sample_limit: MAX_SAMPLE_ROWS,
            fail_fast: true,
            now: None,
        }
    }
}

impl ValidationContext {
    /// Creates a new validation context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failure sample size, clamped to `1..=MAX_SAMPLE_ROWS`.
    pub fn with_sample_limit(mut self, limit: usize) -> Self {
        self.sample_limit = limit.clamp(1, MAX_SAMPLE_ROWS);
        self
    }

    /// Sets fail-fast mode.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Pins the clock used by freshness checks.
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    /// Effective sample size.
    pub fn sample_limit(&self) -> usize {
        self.sample_limit.min(MAX_SAMPLE_ROWS)
    }

    /// Current time as seen by freshness checks.
    pub fn current_time(&self) -> NaiveDateTime {
        self.now.unwrap_or_else(|| Local::now().naive_local())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_defaults() {
        let context = ValidationContext::new();
        assert_eq!(context.sample_limit(), 10);
        assert!(context.fail_fast);
        assert!(context.now.is_none());
    }

    #[test]
    fn test_sample_limit_is_clamped() {
        assert_eq!(ValidationContext::new().with_sample_limit(50).sample_limit(), 10);
        assert_eq!(ValidationContext::new().with_sample_limit(0).sample_limit(), 1);
        assert_eq!(ValidationContext::new().with_sample_limit(3).sample_limit(), 3);
    }

    #[test]
    fn test_pinned_clock() {
        let now = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(ValidationContext::new().with_now(now).current_time(), now);
    }
}
