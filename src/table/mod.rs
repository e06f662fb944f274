//! Tabular candidate data.
//!
//! Candidate configurations arrive as a table of named columns whose cells
//! are kept in their textual form. Numeric interpretation is lenient and
//! happens on demand: a cell that does not parse as a finite number is
//! treated as missing for numeric purposes, never as an error.
//!
//! # Key Types
//!
//! - [`Table`]: Column names plus row-major string cells
//! - [`resolve_column`]: Case-insensitive column lookup with a small alias table
//!
//! Column lookups used by constraints and weights always go through the
//! resolver, so `"acc"`, `"Accuracy"` and `"ACCURACY"` all reach the same
//! `accuracy` column.

mod io;
mod resolve;
mod types;

pub(crate) use io::create_file;
pub use resolve::{parse_number, resolve_column, COLUMN_ALIASES};
pub use types::Table;
