//! DuckDB integration for the Data Quality Validator.
//!
//! Provides a [`Connection`](dqv_validator::Connection) over an embedded DuckDB
//! database. The same handle serves the rule catalog, reference-value lookups
//! and SQL assertions, and can fetch the dataset under validation.
//!
//! # Example
//!
//! ```no_run
//! use dqv_duckdb::DuckDbConnection;
//! use dqv_validator::{DataValidator, SqlCatalog};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let connection = DuckDbConnection::open("warehouse.duckdb", true)?;
//! let catalog = SqlCatalog::new(&connection);
//!
//! let dataset = connection.fetch("select * from st_project")?;
//! let log = DataValidator::new(&connection, &catalog).validate("st_project", Some(&dataset))?;
//! println!("{} failure(s)", log.failures().count());
//! # Ok(())
//! # }
//! ```

use dqv_core::ValidationError;
use thiserror::Error;

mod connection;
mod converter;

pub use connection::DuckDbConnection;
pub use converter::{duckdb_value_to_data_value, duckdb_zoned_value_to_data_value};

/// Error types specific to DuckDB operations.
#[derive(Error, Debug)]
pub enum DuckDbError {
    /// The database file could not be opened
    #[error("Failed to open DuckDB database '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: duckdb::Error,
    },

    /// A statement failed to prepare or execute
    #[error("{source}")]
    Statement {
        sql: String,
        #[source]
        source: duckdb::Error,
    },
}

impl From<DuckDbError> for ValidationError {
    fn from(err: DuckDbError) -> Self {
        match err {
            DuckDbError::Open { .. } => ValidationError::Connection(err.to_string()),
            DuckDbError::Statement { sql, source } => ValidationError::query(sql, source.to_string()),
        }
    }
}
