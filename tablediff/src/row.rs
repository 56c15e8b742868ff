//! Ordered groups of cells.

use crate::cell::{Cell, CellStatus};

/// Line reference reported for rows whose origin is unknown.
pub const UNKNOWN_LINE: i64 = -1;

/// One record of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<Cell>,
    line: Option<usize>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells, line: None }
    }

    /// Builder: attach the source line this row was parsed from
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// A row with the same line reference and new cells
    pub(crate) fn replaced(&self, cells: Vec<Cell>) -> Row {
        Row {
            cells,
            line: self.line,
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub(crate) fn push(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Line reference with [`UNKNOWN_LINE`] standing in for "unknown"
    pub fn line_ref(&self) -> i64 {
        self.line.map_or(UNKNOWN_LINE, |l| l as i64)
    }

    /// Status of the row as a whole.
    ///
    /// A row is inserted or removed only when every cell shares that status.
    pub fn status(&self) -> CellStatus {
        let mut statuses = self.cells.iter().map(Cell::status);
        match statuses.next() {
            Some(first) if statuses.all(|s| s == first) => first,
            _ => CellStatus::Unchanged,
        }
    }

    /// Mark every cell with `status`
    pub(crate) fn mark(&mut self, status: CellStatus) {
        for cell in &mut self.cells {
            cell.set_status(status);
        }
    }

    pub fn values(&self) -> impl Iterator<Item = Option<&str>> {
        self.cells.iter().map(Cell::value)
    }

    pub(crate) fn to_values(&self) -> Vec<Option<String>> {
        self.values().map(|v| v.map(str::to_string)).collect()
    }
}
