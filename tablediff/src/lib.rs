//! # tablediff
//!
//! Structured tables and an expected-versus-actual diff engine for them.
//!
//! ## Overview
//!
//! A [`Table`] is an ordered, rectangular set of [`Row`]s of [`Cell`]s whose
//! first row names the columns. Tables come from a parser (any matrix of
//! optional strings will do), get reshaped by the client with
//! [`Table::map_column`], [`Table::map_headers`], [`Table::transpose`] or
//! [`Table::arguments_replaced`], and are finally compared against the
//! actual data with [`Table::diff`].
//!
//! Diffing annotates the expected table in place: every cell ends up
//! unchanged, inserted or removed, and rows that only exist on the actual
//! side are spliced in. The annotated table can then be walked by a
//! renderer through [`TableVisitor`], or reduced to its canonical
//! [`SymbolicTable`] form.
//!
//! ## Features
//!
//! - **Shared cells**: [`Table::columns`] views the same cells as
//!   [`Table::rows`], nothing is copied
//! - **LCS row alignment**: removals before insertions at every divergence
//! - **Column reconciliation**: with `coldiff`, columns are matched by header,
//!   surplus columns appended and missing ones marked removed
//! - **Hash views**: [`Table::hashes`] and [`Table::rows_hash`] as ordered
//!   `serde_json` maps, with per-column converters
//!
//! ## Example
//!
//! ```rust
//! use tablediff::{DiffOptions, Table};
//!
//! let mut expected = Table::new([["a", "b"], ["c", "d"], ["e", "f"]]).unwrap();
//! let actual = vec![vec!["c", "d"], vec!["e", "f"]];
//!
//! // Differences are an error by default
//! assert!(expected.clone().diff(actual.clone(), DiffOptions::new()).is_err());
//!
//! // ...or just recorded on the table
//! let summary = expected.diff(actual, DiffOptions::new().raise(false)).unwrap();
//! assert_eq!(summary.removed_rows, 1);
//! assert_eq!(
//!     expected.to_symbolic_tree().to_string(),
//!     r#"(table (row -1 (minus_cell "a") (minus_cell "b")) (row -1 (cell "c") (cell "d")) (row -1 (cell "e") (cell "f")))"#
//! );
//! ```

pub mod align;
pub mod cell;
pub mod column;
pub mod diff;
pub mod error;
pub mod options;
pub mod row;
pub mod symbolic;
pub mod table;
pub mod visitor;

pub use align::{align, Edit};
pub use cell::{Cell, CellStatus};
pub use column::Column;
pub use diff::{Actual, DiffSummary};
pub use error::{StructureError, TableError, TableMismatch};
pub use options::DiffOptions;
pub use row::{Row, UNKNOWN_LINE};
pub use symbolic::{SymbolicCell, SymbolicRow, SymbolicTable};
pub use table::{ConvertFn, Location, Table};
pub use visitor::{walk_row, walk_table, TableVisitor};

/// Result type for tablediff operations
pub type Result<T> = std::result::Result<T, TableError>;
