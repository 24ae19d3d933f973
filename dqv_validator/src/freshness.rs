//! Freshness check.
//!
//! Reads the rule's column as timestamps without touching the caller's
//! dataset, then compares the latest one against the current time.

use crate::checks::required_column;
use crate::dataset::TIMESTAMP_FORMAT;
use crate::{DataSet, DataValue, RuleIssue};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use dqv_core::{Outcome, Period, RuleDeclaration};
use serde_json::json;

/// Epochs above this are taken to be in milliseconds.
const MILLIS_THRESHOLD: i64 = 10_000_000_000;

/// Fails when the newest timestamp in the column is at least `count`
/// periods older than `now`.
///
/// Skips the rule (no outcome) when the config is malformed, the period is
/// unsupported, or the column cannot be read as timestamps. A column with no
/// timestamps at all (empty, or only null-equivalents) passes. The failure
/// detail is `{"latest_timestamp", "current_datetime", "total_diff"}`.
pub fn check_freshness(
    rule: &RuleDeclaration,
    dataset: &DataSet,
    now: NaiveDateTime,
) -> Result<Outcome, RuleIssue> {
    let config = rule.freshness_config()?;
    let (column, idx) = required_column(rule, dataset)?;

    let timestamps = coerce_column(column, dataset.rows().map(|row| &row[idx]))?;

    let period = Period::parse(&config.period).ok_or_else(|| {
        RuleIssue::config(format!("Period '{}' is not supported.", config.period))
    })?;

    let Some(latest) = timestamps.into_iter().flatten().max() else {
        return Ok(Outcome::passed(rule));
    };

    let total_diff = elapsed_seconds(latest, now) / period.seconds();

    if total_diff >= config.count {
        let detail = json!({
            "latest_timestamp": latest.format(TIMESTAMP_FORMAT).to_string(),
            "current_datetime": now.format(TIMESTAMP_FORMAT).to_string(),
            "total_diff": total_diff,
        });
        Ok(Outcome::failed(rule, detail.to_string()))
    } else {
        Ok(Outcome::passed(rule))
    }
}

fn elapsed_seconds(latest: NaiveDateTime, now: NaiveDateTime) -> f64 {
    let delta = now - latest;
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1_000.0,
    }
}

/// Reads every value of a column as a timestamp; null-equivalents become `None`.
///
/// Fails on the first value that is neither null-equivalent nor a timestamp.
pub fn coerce_column<'a>(
    column: &str,
    values: impl Iterator<Item = &'a DataValue>,
) -> Result<Vec<Option<NaiveDateTime>>, RuleIssue> {
    values
        .map(|value| {
            if value.is_null_equivalent() {
                return Ok(None);
            }
            coerce_value(value).map(Some).map_err(|reason| RuleIssue::NotTemporal {
                column: column.to_string(),
                reason,
            })
        })
        .collect()
}

fn coerce_value(value: &DataValue) -> Result<NaiveDateTime, String> {
    match value {
        DataValue::Timestamp(ts) => Ok(*ts),
        DataValue::String(s) => parse_timestamp(s),
        DataValue::Int(epoch) => from_epoch(*epoch),
        DataValue::Float(f) if f.fract() == 0.0 => from_epoch(*f as i64),
        other => Err(format!("cannot read {} value as a timestamp", other.type_name())),
    }
}

/// Parses a timestamp string in one of the supported layouts.
///
/// Supported layouts:
/// - RFC 3339 / ISO 8601 with offset, converted to local wall time
/// - Unix epoch in seconds or milliseconds
/// - `YYYY-MM-DD HH:MM:SS[.f]` and `YYYY-MM-DDTHH:MM:SS[.f]`
/// - `YYYY-MM-DD` (start of day)
pub fn parse_timestamp(ts_str: &str) -> Result<NaiveDateTime, String> {
    let ts_str = ts_str.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(ts_str) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }

    if let Ok(epoch) = ts_str.parse::<i64>() {
        return from_epoch(epoch);
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(ts_str, format) {
            return Ok(naive);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(ts_str, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN));
    }

    Err(format!(
        "invalid timestamp '{ts_str}'; supported formats: ISO 8601, Unix epoch (seconds/milliseconds), YYYY-MM-DD, YYYY-MM-DD HH:MM:SS"
    ))
}

fn from_epoch(epoch: i64) -> Result<NaiveDateTime, String> {
    let parsed = if epoch > MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(epoch)
    } else {
        DateTime::from_timestamp(epoch, 0)
    };
    parsed
        .map(|dt| dt.with_timezone(&Local).naive_local())
        .ok_or_else(|| format!("epoch {epoch} is out of range"))
}
