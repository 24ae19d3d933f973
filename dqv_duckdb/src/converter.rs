//! Value conversion from DuckDB to validator types.

use chrono::{DateTime, Local};
use dqv_validator::DataValue;
use duckdb::types::{TimeUnit, Value};
use tracing::warn;

const SECONDS_PER_DAY: i64 = 86_400;

/// Converts a DuckDB value to a `DataValue`.
///
/// Integers widen to `Int` (unsigned values beyond `i64` become `Float`),
/// decimals become `Float`, dates become midnight timestamps and text/enum
/// values become strings. Nested and binary values are kept as their debug
/// text.
pub fn duckdb_value_to_data_value(value: Value) -> DataValue {
    match value {
        Value::Null => DataValue::Null,
        Value::Boolean(b) => DataValue::Bool(b),
        Value::TinyInt(v) => DataValue::Int(v.into()),
        Value::SmallInt(v) => DataValue::Int(v.into()),
        Value::Int(v) => DataValue::Int(v.into()),
        Value::BigInt(v) => DataValue::Int(v),
        Value::HugeInt(v) => i64::try_from(v).map_or(DataValue::Float(v as f64), DataValue::Int),
        Value::UTinyInt(v) => DataValue::Int(v.into()),
        Value::USmallInt(v) => DataValue::Int(v.into()),
        Value::UInt(v) => DataValue::Int(v.into()),
        Value::UBigInt(v) => i64::try_from(v).map_or(DataValue::Float(v as f64), DataValue::Int),
        Value::Float(f) => DataValue::Float(f.into()),
        Value::Double(f) => DataValue::Float(f),
        Value::Decimal(d) => {
            let text = d.to_string();
            text.parse::<f64>()
                .map_or(DataValue::String(text), DataValue::Float)
        }
        Value::Timestamp(unit, v) => timestamp(unit, v),
        Value::Date32(days) => timestamp(TimeUnit::Second, i64::from(days) * SECONDS_PER_DAY),
        Value::Text(s) => DataValue::String(s),
        Value::Enum(s) => DataValue::String(s),
        other => {
            warn!("Unsupported DuckDB value kept as text: {:?}", other);
            DataValue::String(format!("{other:?}"))
        }
    }
}

/// Converts a value read from a time-zone-aware column (`TIMESTAMPTZ`).
///
/// DuckDB hands these out as UTC instants; they are shifted to local wall
/// time so they compare against the local clock. Other values convert as in
/// [`duckdb_value_to_data_value`].
pub fn duckdb_zoned_value_to_data_value(value: Value) -> DataValue {
    match value {
        Value::Timestamp(unit, v) => to_instant(unit, v)
            .map_or(DataValue::Null, |dt| {
                DataValue::Timestamp(dt.with_timezone(&Local).naive_local())
            }),
        other => duckdb_value_to_data_value(other),
    }
}

fn timestamp(unit: TimeUnit, value: i64) -> DataValue {
    to_instant(unit, value).map_or(DataValue::Null, |dt| DataValue::Timestamp(dt.naive_utc()))
}

fn to_instant(unit: TimeUnit, value: i64) -> Option<DateTime<chrono::Utc>> {
    let micros = match unit {
        TimeUnit::Second => value.checked_mul(1_000_000)?,
        TimeUnit::Millisecond => value.checked_mul(1_000)?,
        TimeUnit::Microsecond => value,
        TimeUnit::Nanosecond => value / 1_000,
    };
    DateTime::from_timestamp_micros(micros)
}
