//! # Data Quality Validator engine
//!
//! Runs a catalog of declared validation rules against a dataset and produces
//! an ordered pass/fail log. This crate provides:
//!
//! - Rule catalog loading (SQL catalog table or in-memory rules)
//! - Rule selection (assertion-only vs dataset-driven runs)
//! - Check routines: Freshness, Unique, Not Null, Reference Values,
//!   Accepted Values and SQL-Assertion
//! - Dispatch and result aggregation
//!
//! ## Example
//!
//! ```rust
//! use dqv_core::{RuleBuilder, TestType, Validated};
//! use dqv_validator::{Connection, DataSet, DataValidator, DataValue, StaticCatalog};
//! # use dqv_core::ValidationError;
//! # struct NoDatabase;
//! # impl Connection for NoDatabase {
//! #     fn query(&self, sql: &str) -> Result<DataSet, ValidationError> {
//! #         Err(ValidationError::query(sql, "no database"))
//! #     }
//! # }
//! # let connection = NoDatabase;
//!
//! let catalog = StaticCatalog::new(vec![
//!     RuleBuilder::new("st_project", TestType::AcceptedValues)
//!         .column("age")
//!         .value_config("[0,1,2,3]")
//!         .build(),
//! ]);
//! let dataset = DataSet::from_rows(
//!     ["age"],
//!     vec![vec![DataValue::Int(1)], vec![DataValue::Int(5)]],
//! )
//! .unwrap();
//!
//! let validator = DataValidator::new(&connection, &catalog);
//! let log = validator.validate("st_project", Some(&dataset)).unwrap();
//!
//! assert_eq!(log.outcomes[0].validated, Validated::Failed);
//! ```

mod assertion;
mod catalog;
mod checks;
mod connection;
mod constraints;
mod dataset;
mod engine;
mod error;
mod freshness;
mod quality;
mod selector;

pub use assertion::*;
pub use catalog::*;
pub use checks::Evaluation;
pub use connection::{Connection, quote_literal};
pub use constraints::*;
pub use dataset::*;
pub use engine::*;
pub use error::*;
pub use freshness::*;
pub use quality::*;
pub use selector::*;
