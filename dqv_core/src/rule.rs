//! Rule declarations and their typed value configurations.
//!
//! A rule declaration is one row of the validation catalog. Its `value_config`
//! is stored exactly as loaded (JSON for most test types, raw SQL for
//! assertions) and parsed on demand by the check that consumes it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// String spellings that upstream sources use for a missing value.
///
/// Applies both to column names in the catalog and to string cells in a dataset.
pub const NULL_EQUIVALENT_STRINGS: [&str; 5] = ["", "None", "NaN", "nan", "NaT"];

/// Returns true if `value` is one of the recognised null spellings.
pub fn is_null_equivalent_str(value: &str) -> bool {
    NULL_EQUIVALENT_STRINGS.contains(&value)
}

/// The kind of check a rule declaration asks for.
///
/// Catalog entries carry the test type as free text; anything that is not one
/// of the six supported spellings becomes [`TestType::Unknown`] and is skipped
/// by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TestType {
    /// Latest timestamp in a column must be recent enough
    Freshness,
    /// Column (or column set) must not contain duplicates
    Unique,
    /// Column must not contain null-equivalent values
    NotNull,
    /// Column values must exist in a reference table
    ReferenceValues,
    /// Column values must belong to an allow-list
    AcceptedValues,
    /// Raw SQL query that must return zero rows
    SqlAssertion,
    /// Unrecognised test type, kept verbatim
    Unknown(String),
}

impl TestType {
    /// Parses a catalog spelling. Matching is exact and case-sensitive.
    pub fn parse(name: &str) -> Self {
        match name {
            "Freshness" => TestType::Freshness,
            "Unique" => TestType::Unique,
            "Not Null" => TestType::NotNull,
            "Reference Values" => TestType::ReferenceValues,
            "Accepted Values" => TestType::AcceptedValues,
            "SQL-Assertion" => TestType::SqlAssertion,
            other => TestType::Unknown(other.to_string()),
        }
    }

    /// Returns the catalog spelling of this test type.
    pub fn as_str(&self) -> &str {
        match self {
            TestType::Freshness => "Freshness",
            TestType::Unique => "Unique",
            TestType::NotNull => "Not Null",
            TestType::ReferenceValues => "Reference Values",
            TestType::AcceptedValues => "Accepted Values",
            TestType::SqlAssertion => "SQL-Assertion",
            TestType::Unknown(name) => name,
        }
    }

    /// Returns true for the assertion type, which runs against the database only.
    pub fn is_sql_assertion(&self) -> bool {
        matches!(self, TestType::SqlAssertion)
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for TestType {
    fn from(name: String) -> Self {
        TestType::parse(&name)
    }
}

impl From<&str> for TestType {
    fn from(name: &str) -> Self {
        TestType::parse(name)
    }
}

impl From<TestType> for String {
    fn from(test_type: TestType) -> Self {
        test_type.as_str().to_string()
    }
}

/// One configured validation check.
///
/// Immutable once loaded for a run. All fields are echoed verbatim into the
/// outcome produced for the rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleDeclaration {
    /// Table the rule applies to
    pub target_table: String,

    /// Column the rule applies to, as stored in the catalog
    pub column_name: Option<String>,

    /// Check to run
    pub test_type: TestType,

    /// JSON document or raw SQL, depending on the test type
    pub value_config: String,

    /// Free-form severity label
    pub severity: String,
}

impl RuleDeclaration {
    /// Returns the column this rule targets, treating null spellings as absent.
    ///
    /// Table-level rules (such as multi-column uniqueness) leave the column
    /// empty and carry their columns inside `value_config`.
    pub fn column(&self) -> Option<&str> {
        self.column_name
            .as_deref()
            .filter(|name| !is_null_equivalent_str(name))
    }

    /// Parses `value_config` as a freshness configuration.
    pub fn freshness_config(&self) -> Result<FreshnessConfig, serde_json::Error> {
        serde_json::from_str(&self.value_config)
    }

    /// Parses `value_config` as a table-level uniqueness configuration.
    pub fn unique_config(&self) -> Result<UniqueConfig, serde_json::Error> {
        serde_json::from_str(&self.value_config)
    }

    /// Parses `value_config` as a reference lookup configuration.
    pub fn reference_config(&self) -> Result<ReferenceConfig, serde_json::Error> {
        serde_json::from_str(&self.value_config)
    }

    /// Parses `value_config` as a JSON array of accepted literals.
    pub fn accepted_values(&self) -> Result<Vec<serde_json::Value>, serde_json::Error> {
        serde_json::from_str(&self.value_config)
    }
}

impl fmt::Display for RuleDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}, {}]",
            self.target_table,
            self.column_name.as_deref().unwrap_or("None"),
            self.test_type,
            self.value_config,
            self.severity
        )
    }
}

/// Configuration of a freshness check, e.g. `{"count": 1, "period": "day"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreshnessConfig {
    /// Maximum allowed age, in `period` units (exclusive)
    pub count: f64,

    /// Unit of `count`; validated separately so unsupported values can be reported
    pub period: String,
}

/// Time unit for freshness checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl Period {
    /// Parses a lowercase period name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "minute" => Some(Period::Minute),
            "hour" => Some(Period::Hour),
            "day" => Some(Period::Day),
            "month" => Some(Period::Month),
            "year" => Some(Period::Year),
            _ => None,
        }
    }

    /// Width of one unit in seconds.
    ///
    /// Month and year use the average Gregorian lengths (365.2425 days per
    /// year, one twelfth of that per month).
    pub fn seconds(&self) -> f64 {
        match self {
            Period::Minute => 60.0,
            Period::Hour => 3_600.0,
            Period::Day => 86_400.0,
            Period::Month => 2_629_746.0,
            Period::Year => 31_556_952.0,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Period::Minute => "minute",
            Period::Hour => "hour",
            Period::Day => "day",
            Period::Month => "month",
            Period::Year => "year",
        };
        f.write_str(name)
    }
}

/// Column list for a table-level uniqueness check, e.g. `{"columns": ["a", "b"]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueConfig {
    pub columns: Vec<String>,
}

/// Reference lookup for a referential-integrity check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// Table holding the reference values
    pub table: String,

    /// Column in `table` holding the reference values
    pub column: String,

    /// Optional SQL filter narrowing the lookup; the leading `WHERE` keyword is optional
    #[serde(default)]
    pub where_sql: Option<String>,
}

impl ReferenceConfig {
    /// Returns the filter predicate, treating null spellings as absent.
    pub fn filter(&self) -> Option<&str> {
        self.where_sql
            .as_deref()
            .filter(|sql| !is_null_equivalent_str(sql.trim()))
    }
}
