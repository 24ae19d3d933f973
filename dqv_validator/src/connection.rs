//! Database access used by the engine.
//!
//! The engine only issues SELECT-shaped queries: the catalog fetch, reference
//! lookups and assertion queries. Opening and closing the connection is the
//! caller's business; a run borrows it for its whole duration.

use crate::DataSet;
use dqv_core::ValidationError;

/// A borrowed, read-only database handle.
pub trait Connection {
    /// Runs `sql` and returns the result set as a dataset.
    fn query(&self, sql: &str) -> Result<DataSet, ValidationError>;
}

impl<C: Connection + ?Sized> Connection for &C {
    fn query(&self, sql: &str) -> Result<DataSet, ValidationError> {
        (**self).query(sql)
    }
}

impl<C: Connection + ?Sized> Connection for Box<C> {
    fn query(&self, sql: &str) -> Result<DataSet, ValidationError> {
        (**self).query(sql)
    }
}

/// Quotes `value` as a SQL string literal, doubling embedded quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_literal() {
        assert_eq!(quote_literal("abc"), "'abc'");
        assert_eq!(quote_literal("O'Brien"), "'O''Brien'");
    }
}
