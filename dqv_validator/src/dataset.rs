//! Dataset representation for validation.
//!
//! A dataset is the batch under validation: named, ordered columns and rows of
//! equal width. The engine only ever reads it.

use chrono::NaiveDateTime;
use dqv_core::{ValidationError, is_null_equivalent_str};
use serde_json::{Map, Number, Value};

/// Format used when rendering timestamps as text.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A value in a dataset.
///
/// Represents the different types of values that can appear in data records.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    /// Null/missing value (including missing timestamps)
    Null,
    /// String value
    String(String),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Timestamp value, without time zone
    Timestamp(NaiveDateTime),
}

impl DataValue {
    /// Returns true if this value belongs to the null-equivalent set.
    ///
    /// Upstream sources stringify missing values inconsistently, so besides a
    /// real null this covers NaN and the strings `""`, `None`, `NaN`, `nan`
    /// and `NaT`.
    pub fn is_null_equivalent(&self) -> bool {
        match self {
            DataValue::Null => true,
            DataValue::Float(f) => f.is_nan(),
            DataValue::String(s) => is_null_equivalent_str(s),
            _ => false,
        }
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Null => "null",
            DataValue::String(_) => "string",
            DataValue::Int(_) => "int64",
            DataValue::Float(_) => "float64",
            DataValue::Bool(_) => "boolean",
            DataValue::Timestamp(_) => "timestamp",
        }
    }

    /// Returns a hashable key with numeric equivalence (`1 == 1.0`).
    pub fn key(&self) -> ValueKey {
        match self {
            DataValue::Null => ValueKey::Null,
            DataValue::String(s) => ValueKey::String(s.clone()),
            DataValue::Int(i) => ValueKey::Int(*i),
            DataValue::Float(f) => float_key(*f),
            DataValue::Bool(b) => ValueKey::Bool(*b),
            DataValue::Timestamp(ts) => ValueKey::Timestamp(*ts),
        }
    }

    /// Converts a JSON scalar into a data value.
    ///
    /// Arrays and objects are kept as their JSON text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => DataValue::Null,
            Value::Bool(b) => DataValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => DataValue::Int(i),
                None => DataValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => DataValue::String(s.clone()),
            other => DataValue::String(other.to_string()),
        }
    }

    /// Converts this value into JSON. NaN becomes `null`.
    pub fn to_json(&self) -> Value {
        match self {
            DataValue::Null => Value::Null,
            DataValue::String(s) => Value::String(s.clone()),
            DataValue::Int(i) => Value::from(*i),
            DataValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            DataValue::Bool(b) => Value::Bool(*b),
            DataValue::Timestamp(ts) => Value::String(ts.format(TIMESTAMP_FORMAT).to_string()),
        }
    }
}

fn float_key(f: f64) -> ValueKey {
    if f.is_nan() {
        ValueKey::NaN
    } else if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        ValueKey::Int(f as i64)
    } else {
        ValueKey::Float(f.to_bits())
    }
}

/// Hashable identity of a [`DataValue`], used for grouping and set membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKey {
    Null,
    NaN,
    Bool(bool),
    Int(i64),
    Float(u64),
    String(String),
    Timestamp(NaiveDateTime),
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::String(s)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::String(s.to_string())
    }
}

impl From<i64> for DataValue {
    fn from(i: i64) -> Self {
        DataValue::Int(i)
    }
}

impl From<f64> for DataValue {
    fn from(f: f64) -> Self {
        DataValue::Float(f)
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        DataValue::Bool(b)
    }
}

impl From<NaiveDateTime> for DataValue {
    fn from(ts: NaiveDateTime) -> Self {
        DataValue::Timestamp(ts)
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(DataValue::Null, Into::into)
    }
}

/// A single row of data, positionally aligned with the dataset's columns.
pub type DataRow = Vec<DataValue>;

/// A dataset containing named columns and rows.
///
/// Represents the batch of records to be validated against the rule catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    columns: Vec<String>,
    rows: Vec<DataRow>,
}

impl DataSet {
    /// Creates a new dataset with the given columns and no rows.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Creates a dataset from columns and rows, rejecting rows of the wrong width.
    pub fn from_rows<I, S>(columns: I, rows: Vec<DataRow>) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dataset = Self::new(columns);
        for row in rows {
            dataset.add_row(row)?;
        }
        Ok(dataset)
    }

    /// Adds a row to the dataset.
    pub fn add_row(&mut self, row: DataRow) -> Result<(), ValidationError> {
        if row.len() != self.columns.len() {
            return Err(ValidationError::InvalidDataset(format!(
                "row {} has {} values but the dataset has {} columns",
                self.rows.len(),
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Returns the column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns true if the dataset has a column named `name`.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Returns the position of the column named `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns the number of rows in the dataset.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns an iterator over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &DataRow> {
        self.rows.iter()
    }

    /// Gets one cell by row index and column name.
    pub fn get(&self, index: usize, column: &str) -> Option<&DataValue> {
        let idx = self.column_index(column)?;
        self.rows.get(index).map(|row| &row[idx])
    }

    /// Builds a dataset from JSON.
    ///
    /// Accepts the split layout `{"columns": [...], "data": [[...], ...]}` or
    /// an array of records `[{"col": value, ...}, ...]`. For records, columns
    /// are ordered by first appearance and absent keys become nulls.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(map) => Self::from_split_json(map),
            Value::Array(records) => Self::from_records_json(records),
            _ => Err(ValidationError::InvalidDataset(
                "expected a split object or an array of records".to_string(),
            )),
        }
    }

    fn from_split_json(map: &Map<String, Value>) -> Result<Self, ValidationError> {
        let columns = map
            .get("columns")
            .and_then(Value::as_array)
            .ok_or_else(|| ValidationError::InvalidDataset("missing 'columns' array".into()))?
            .iter()
            .map(|c| match c {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>();

        let data = map
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| ValidationError::InvalidDataset("missing 'data' array".into()))?;

        let mut dataset = Self::new(columns);
        for row in data {
            let values = row
                .as_array()
                .ok_or_else(|| ValidationError::InvalidDataset("'data' rows must be arrays".into()))?;
            dataset.add_row(values.iter().map(DataValue::from_json).collect())?;
        }
        Ok(dataset)
    }

    fn from_records_json(records: &[Value]) -> Result<Self, ValidationError> {
        let mut columns: Vec<String> = Vec::new();
        for record in records {
            let object = record
                .as_object()
                .ok_or_else(|| ValidationError::InvalidDataset("records must be objects".into()))?;
            for key in object.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .filter_map(Value::as_object)
            .map(|object| {
                columns
                    .iter()
                    .map(|c| object.get(c).map_or(DataValue::Null, DataValue::from_json))
                    .collect()
            })
            .collect();

        Self::from_rows(columns, rows)
    }

    /// Renders the first `limit` rows in split layout, without an index.
    pub fn to_split_json(&self, limit: usize) -> Value {
        let data = self
            .rows
            .iter()
            .take(limit)
            .map(|row| Value::Array(row.iter().map(DataValue::to_json).collect()))
            .collect();

        let mut split = Map::new();
        split.insert(
            "columns".to_string(),
            Value::Array(self.columns.iter().cloned().map(Value::String).collect()),
        );
        split.insert("data".to_string(), Value::Array(data));
        Value::Object(split)
    }

    /// Returns a new dataset with the rows for which `keep` returns true.
    pub fn filter<F>(&self, mut keep: F) -> DataSet
    where
        F: FnMut(&DataRow) -> bool,
    {
        DataSet {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|row| keep(row)).cloned().collect(),
        }
    }
}
