//! Error types for tablediff

use std::fmt;

use thiserror::Error;

use crate::table::Table;

/// A structural precondition of a table operation was violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// The operation needs a fixed number of columns
    #[error("The table must have exactly {expected} columns")]
    WrongColumnCount { expected: usize, found: usize },

    /// No header matches the requested column name
    #[error("The column named \"{0}\" does not exist")]
    MissingColumn(String),

    /// A row does not have as many cells as the first row
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Raised by [`Table::diff`] when differences were found and raising was requested.
///
/// The annotated table is attached so a renderer can show what differed.
#[derive(Error, Debug, Clone)]
pub struct TableMismatch {
    table: Box<Table>,
    summary: crate::diff::DiffSummary,
}

impl TableMismatch {
    pub(crate) fn new(table: Table, summary: crate::diff::DiffSummary) -> Self {
        Self {
            table: Box::new(table),
            summary,
        }
    }

    /// The annotated expected table
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Counts of what changed
    pub fn summary(&self) -> &crate::diff::DiffSummary {
        &self.summary
    }

    /// Take ownership of the annotated table
    pub fn into_table(self) -> Table {
        *self.table
    }
}

impl fmt::Display for TableMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        write!(
            f,
            "Tables were not identical: {} rows removed, {} rows inserted, {} cells removed, {} cells inserted",
            s.removed_rows, s.inserted_rows, s.removed_cells, s.inserted_cells
        )
    }
}

/// Errors that can occur when building, transforming or diffing tables
#[derive(Error, Debug, Clone)]
pub enum TableError {
    /// Structural precondition failed
    #[error(transparent)]
    Structure(#[from] StructureError),

    /// Diff found differences
    #[error(transparent)]
    Mismatch(#[from] TableMismatch),
}

impl TableError {
    /// The annotated table, if this is a mismatch
    pub fn mismatch(&self) -> Option<&TableMismatch> {
        match self {
            TableError::Mismatch(m) => Some(m),
            TableError::Structure(_) => None,
        }
    }
}
