//! Traversal contract for table renderers.
//!
//! A renderer implements [`TableVisitor`] and hands itself to
//! [`Table::accept`]. Rows are visited in order, then the cells of each row,
//! together with the printable width of the cell's column. Presentation
//! (indentation, colors, alignment) is entirely up to the visitor.
//!
//! Overriding `visit_table` or `visit_row` and calling [`walk_table`] /
//! [`walk_row`] keeps the default traversal while adding work around it.

use crate::cell::Cell;
use crate::row::Row;
use crate::table::Table;

pub trait TableVisitor {
    fn visit_table(&mut self, table: &Table) {
        walk_table(self, table);
    }

    fn visit_row(&mut self, row: &Row, widths: &[usize]) {
        walk_row(self, row, widths);
    }

    fn visit_cell(&mut self, cell: &Cell, width: usize);
}

/// Visit every row of `table`
pub fn walk_table<V: TableVisitor + ?Sized>(visitor: &mut V, table: &Table) {
    let widths = table.column_widths();
    for row in table.rows() {
        visitor.visit_row(row, &widths);
    }
}

/// Visit every cell of `row`
pub fn walk_row<V: TableVisitor + ?Sized>(visitor: &mut V, row: &Row, widths: &[usize]) {
    for (i, cell) in row.cells().iter().enumerate() {
        visitor.visit_cell(cell, widths.get(i).copied().unwrap_or_else(|| cell.width()));
    }
}

impl Table {
    /// Walk this table with `visitor`
    pub fn accept<V: TableVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_table(self);
    }
}
