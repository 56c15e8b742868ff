//! Column-major view over a table's rows.
//!
//! A `Column` borrows the table's row storage and hands out the very same
//! `Cell` values the rows hold; nothing is copied.

use crate::cell::Cell;
use crate::row::Row;

/// A column of a table, addressed by index.
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    rows: &'a [Row],
    index: usize,
}

impl<'a> Column<'a> {
    pub(crate) fn new(rows: &'a [Row], index: usize) -> Self {
        Self { rows, index }
    }

    /// Position of this column in the table
    pub fn index(&self) -> usize {
        self.index
    }

    /// Cell in the header row
    pub fn header(&self) -> Option<&'a Cell> {
        self.cell(0)
    }

    pub fn cell(&self, row: usize) -> Option<&'a Cell> {
        self.rows.get(row).and_then(|r| r.cells().get(self.index))
    }

    pub fn cells(&self) -> impl Iterator<Item = &'a Cell> + 'a {
        let index = self.index;
        self.rows.iter().filter_map(move |r| r.cells().get(index))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest printable value in the column
    pub fn width(&self) -> usize {
        self.cells().map(Cell::width).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_width() {
        let rows = vec![
            Row::new(vec![Cell::from("one"), Cell::from("four")]),
            Row::new(vec![Cell::from("4444"), Cell::from("55555")]),
        ];
        let column = Column::new(&rows, 1);
        assert_eq!(column.width(), 5);
        assert_eq!(column.header().and_then(Cell::value), Some("four"));
        assert_eq!(column.len(), 2);
    }

    #[test]
    fn test_column_shares_cells_with_rows() {
        let rows = vec![Row::new(vec![Cell::from("a"), Cell::from("b")])];
        let column = Column::new(&rows, 1);
        let from_column = column.cell(0).unwrap();
        assert!(std::ptr::eq(from_column, &rows[0].cells()[1]));
    }
}
