//! # Data Quality Validator Core
//!
//! Core data structures for the Data Quality Validator.
//!
//! A validation run takes a catalog of rule declarations keyed by target table
//! and column, evaluates each applicable rule and produces an ordered pass/fail
//! log. This crate holds the types shared by every stage of that pipeline.
//!
//! ## Key Concepts
//!
//! - **Rule declaration**: one catalog entry (table, column, test type, value config, severity)
//! - **Outcome**: the pass/fail result of evaluating one rule declaration
//! - **Diagnostic**: a rule that was skipped because of a configuration or data problem
//! - **Validation log**: the ordered outcomes of a run, with a fixed column header
//!
//! ## Example
//!
//! ```rust
//! use dqv_core::{RuleBuilder, TestType};
//!
//! let rule = RuleBuilder::new("st_project", TestType::AcceptedValues)
//!     .column("active")
//!     .value_config("[0, 1]")
//!     .severity("High")
//!     .build();
//!
//! assert_eq!(rule.column(), Some("active"));
//! assert_eq!(rule.test_type.to_string(), "Accepted Values");
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod log;
pub mod rule;

pub use builder::*;
pub use context::*;
pub use error::*;
pub use log::*;
pub use rule::*;
