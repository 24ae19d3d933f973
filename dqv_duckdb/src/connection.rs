//! DuckDB-backed connection.

use crate::DuckDbError;
use crate::converter::{duckdb_value_to_data_value, duckdb_zoned_value_to_data_value};
use dqv_core::ValidationError;
use dqv_validator::{Connection, DataSet};
use duckdb::arrow::datatypes::DataType;
use duckdb::types::Value;
use duckdb::{AccessMode, Config};
use std::path::Path;
use tracing::debug;

/// A DuckDB database handle.
///
/// The underlying connection is closed when this value is dropped.
pub struct DuckDbConnection {
    conn: duckdb::Connection,
    path: String,
}

impl DuckDbConnection {
    /// Opens the database file at `path`, creating it unless `read_only`.
    pub fn open(path: impl AsRef<Path>, read_only: bool) -> Result<Self, DuckDbError> {
        let path = path.as_ref();
        let display_path = path.display().to_string();
        let open_err = |source| DuckDbError::Open {
            path: display_path.clone(),
            source,
        };

        let mut config = Config::default();
        if read_only {
            config = config.access_mode(AccessMode::ReadOnly).map_err(open_err)?;
        }
        let conn = duckdb::Connection::open_with_flags(path, config).map_err(open_err)?;

        debug!("Opened DuckDB database {} (read_only: {})", display_path, read_only);
        Ok(Self {
            conn,
            path: display_path,
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self, DuckDbError> {
        let conn = duckdb::Connection::open_in_memory().map_err(|source| DuckDbError::Open {
            path: ":memory:".to_string(),
            source,
        })?;
        Ok(Self {
            conn,
            path: ":memory:".to_string(),
        })
    }

    /// Location of the database, `:memory:` for in-memory databases.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Executes one or more statements that return no rows.
    pub fn execute_batch(&self, sql: &str) -> Result<(), DuckDbError> {
        debug!("Executing batch on {}", self.path);
        self.conn
            .execute_batch(sql)
            .map_err(|source| statement_error(sql, source))
    }

    /// Runs `sql` and collects the full result set.
    pub fn fetch(&self, sql: &str) -> Result<DataSet, ValidationError> {
        debug!("Query on {}: {}", self.path, sql);

        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|source| statement_error(sql, source))?;
        let mut rows = stmt
            .query([])
            .map_err(|source| statement_error(sql, source))?;

        let columns = rows
            .as_ref()
            .map(|stmt| stmt.column_names())
            .unwrap_or_default();
        // TIMESTAMPTZ columns carry a zone in their arrow type
        let zoned: Vec<bool> = (0..columns.len())
            .map(|idx| {
                rows.as_ref().is_some_and(|stmt| {
                    matches!(stmt.column_type(idx), DataType::Timestamp(_, Some(_)))
                })
            })
            .collect();
        let mut dataset = DataSet::new(columns);

        while let Some(row) = rows.next().map_err(|source| statement_error(sql, source))? {
            let values = zoned
                .iter()
                .enumerate()
                .map(|(idx, &zoned)| {
                    let convert = if zoned {
                        duckdb_zoned_value_to_data_value
                    } else {
                        duckdb_value_to_data_value
                    };
                    row.get::<_, Value>(idx).map(convert)
                })
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| statement_error(sql, source))?;
            dataset.add_row(values)?;
        }

        debug!("Fetched {} row(s)", dataset.len());
        Ok(dataset)
    }
}

impl Connection for DuckDbConnection {
    fn query(&self, sql: &str) -> Result<DataSet, ValidationError> {
        self.fetch(sql)
    }
}

fn statement_error(sql: &str, source: duckdb::Error) -> DuckDbError {
    DuckDbError::Statement {
        sql: sql.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dqv_validator::DataValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fetch_preserves_columns_and_order() {
        let conn = DuckDbConnection::open_in_memory().unwrap();
        conn.execute_batch(
            "create table t (id integer, name varchar, score double);
             insert into t values (2, 'bob', 1.5), (1, 'ann', null);",
        )
        .unwrap();

        let dataset = conn.fetch("select id, name, score from t order by id").unwrap();
        assert_eq!(dataset.columns(), ["id", "name", "score"]);
        assert_eq!(
            dataset.rows().next(),
            Some(&vec![DataValue::Int(1), DataValue::from("ann"), DataValue::Null])
        );
        assert_eq!(dataset.get(1, "score"), Some(&DataValue::Float(1.5)));
    }

    #[test]
    fn test_empty_result_keeps_header() {
        let conn = DuckDbConnection::open_in_memory().unwrap();
        let dataset = conn.fetch("select 1 as one where false").unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.columns(), ["one"]);
    }

    #[test]
    fn test_query_error_maps_to_query_failure() {
        let conn = DuckDbConnection::open_in_memory().unwrap();
        let err = conn.query("select * from missing_table").unwrap_err();
        match err {
            ValidationError::Query { query, .. } => {
                assert_eq!(query, "select * from missing_table");
            }
            other => panic!("expected a query error, got {other:?}"),
        }
    }
}
