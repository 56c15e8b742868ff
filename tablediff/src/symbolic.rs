//! Canonical symbolic form of an annotated table.
//!
//! The tree mirrors the nested tuples
//! `(table, (row, line, (cell, value) | (plus_cell, value) | (minus_cell, value) ...) ...)`.
//! Row status is not encoded separately; it follows from the cells.
//!
//! `Serialize` writes the tree as nested sequences, so in JSON a table reads
//! `["table", ["row", -1, ["cell", "a"], ["plus_cell", "e"]]]` with `null`
//! for cells without a value. `Display` writes the same tree as an
//! s-expression.

use std::fmt;

use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;

use crate::cell::{Cell, CellStatus};
use crate::row::Row;
use crate::table::Table;
use crate::visitor::{walk_row, TableVisitor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolicCell {
    Cell(Option<String>),
    PlusCell(Option<String>),
    MinusCell(Option<String>),
}

impl SymbolicCell {
    pub fn tag(&self) -> &'static str {
        match self {
            SymbolicCell::Cell(_) => "cell",
            SymbolicCell::PlusCell(_) => "plus_cell",
            SymbolicCell::MinusCell(_) => "minus_cell",
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            SymbolicCell::Cell(v) | SymbolicCell::PlusCell(v) | SymbolicCell::MinusCell(v) => {
                v.as_deref()
            }
        }
    }
}

impl From<&Cell> for SymbolicCell {
    fn from(cell: &Cell) -> Self {
        let value = cell.value().map(str::to_string);
        match cell.status() {
            CellStatus::Unchanged => SymbolicCell::Cell(value),
            CellStatus::Inserted => SymbolicCell::PlusCell(value),
            CellStatus::Removed => SymbolicCell::MinusCell(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolicRow {
    /// Source line, or -1 when unknown
    pub line: i64,
    pub cells: Vec<SymbolicCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolicTable {
    pub rows: Vec<SymbolicRow>,
}

impl Serialize for SymbolicCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(self.tag())?;
        seq.serialize_element(&self.value())?;
        seq.end()
    }
}

impl Serialize for SymbolicRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.cells.len() + 2))?;
        seq.serialize_element("row")?;
        seq.serialize_element(&self.line)?;
        for cell in &self.cells {
            seq.serialize_element(cell)?;
        }
        seq.end()
    }
}

impl Serialize for SymbolicTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len() + 1))?;
        seq.serialize_element("table")?;
        for row in &self.rows {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}

impl fmt::Display for SymbolicCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(v) => write!(f, "({} {:?})", self.tag(), v),
            None => write!(f, "({} nil)", self.tag()),
        }
    }
}

impl fmt::Display for SymbolicRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(row {}", self.line)?;
        for cell in &self.cells {
            write!(f, " {}", cell)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for SymbolicTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(table")?;
        for row in &self.rows {
            write!(f, " {}", row)?;
        }
        write!(f, ")")
    }
}

/// Visitor that records the tree as it walks a table.
#[derive(Debug, Default)]
struct TreeBuilder {
    tree: SymbolicTable,
}

impl TableVisitor for TreeBuilder {
    fn visit_row(&mut self, row: &Row, widths: &[usize]) {
        self.tree.rows.push(SymbolicRow {
            line: row.line_ref(),
            cells: Vec::with_capacity(row.len()),
        });
        walk_row(self, row, widths);
    }

    fn visit_cell(&mut self, cell: &Cell, _width: usize) {
        if let Some(row) = self.tree.rows.last_mut() {
            row.cells.push(SymbolicCell::from(cell));
        }
    }
}

impl Table {
    /// The symbolic tree of this table and its annotations
    pub fn to_symbolic_tree(&self) -> SymbolicTable {
        let mut builder = TreeBuilder::default();
        self.accept(&mut builder);
        builder.tree
    }
}
