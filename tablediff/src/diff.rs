//! Expected-versus-actual table diffing.
//!
//! [`Table::diff`] annotates the receiver (the expected table) in place:
//!
//! 1. The actual side is normalized into a matrix of values ([`Actual`]).
//! 2. Columns are reconciled, by position or, with `coldiff`, by header.
//!    Columns only the actual side has are appended; with `coldiff`,
//!    columns only the expected side has are marked removed.
//! 3. Rows are aligned with [`align`](crate::align::align) over the
//!    compared columns. Unmatched expected rows are marked removed and
//!    unmatched actual rows are spliced in as inserted rows, removals first
//!    at every point where the two sides diverge.
//!
//! The header row takes part in row alignment like any other row.
//!
//! The caller must not touch the table's cells from elsewhere while a diff
//! is running; the engine assumes exclusive access for the duration of the
//! call, which `&mut self` enforces for safe code.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::align::{align, Edit};
use crate::cell::{Cell, CellStatus};
use crate::error::{StructureError, TableMismatch};
use crate::options::DiffOptions;
use crate::row::Row;
use crate::table::{check_rectangular, Table};
use crate::Result;

/// The actual side of a diff.
#[derive(Debug, Clone, PartialEq)]
pub enum Actual {
    /// A matrix of values; its first row is compared like any other
    Rows(Vec<Vec<Option<String>>>),
    /// Records keyed by header, as produced by [`Table::hashes`]
    Hashes(Vec<Map<String, Value>>),
}

impl Actual {
    /// Normalize into a rectangular matrix.
    ///
    /// Hashes become a header row (the expected headers, then any other keys
    /// in first-seen order) followed by one row per record. Keys a record
    /// lacks become cells without a value.
    fn into_rows(self, headers: &[&str]) -> std::result::Result<Vec<Vec<Option<String>>>, StructureError> {
        match self {
            Actual::Rows(rows) => {
                check_rectangular(rows.iter().map(Vec::len))?;
                Ok(rows)
            }
            Actual::Hashes(records) => {
                let mut keys: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
                for record in &records {
                    for key in record.keys() {
                        if !keys.contains(key) {
                            keys.push(key.clone());
                        }
                    }
                }

                let mut rows = Vec::with_capacity(records.len() + 1);
                rows.push(keys.iter().cloned().map(Some).collect());
                rows.extend(records.iter().map(|record| {
                    keys.iter()
                        .map(|k| record.get(k).and_then(value_text))
                        .collect()
                }));
                Ok(rows)
            }
        }
    }
}

impl From<&Table> for Actual {
    fn from(table: &Table) -> Self {
        Actual::Rows(table.raw())
    }
}

impl From<Table> for Actual {
    fn from(table: Table) -> Self {
        Actual::Rows(
            table
                .rows
                .into_iter()
                .map(|row| {
                    row.cells()
                        .iter()
                        .map(|c| c.value().map(str::to_string))
                        .collect()
                })
                .collect(),
        )
    }
}

impl<V: Into<Cell>> From<Vec<Vec<V>>> for Actual {
    fn from(rows: Vec<Vec<V>>) -> Self {
        Actual::Rows(
            rows.into_iter()
                .map(|row| row.into_iter().map(|v| v.into().into_value()).collect())
                .collect(),
        )
    }
}

impl From<Vec<Map<String, Value>>> for Actual {
    fn from(records: Vec<Map<String, Value>>) -> Self {
        Actual::Hashes(records)
    }
}

/// What a diff found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    /// Rows present on both sides
    pub kept_rows: usize,
    /// Rows only present in the actual table
    pub inserted_rows: usize,
    /// Rows only present in the expected table
    pub removed_rows: usize,
    /// Cells marked inserted, including those of inserted rows
    pub inserted_cells: usize,
    /// Cells marked removed, including those of removed rows
    pub removed_cells: usize,
    /// Columns appended from the actual table
    pub surplus_columns: usize,
    /// Expected columns the actual table lacks (only with `coldiff`)
    pub missing_columns: usize,
}

impl DiffSummary {
    /// True when no cell was inserted or removed
    pub fn is_identical(&self) -> bool {
        self.inserted_cells == 0 && self.removed_cells == 0
    }

    fn tally(rows: &[Row], plan: &ColumnPlan) -> Self {
        let mut summary = DiffSummary {
            surplus_columns: plan.surplus.len(),
            missing_columns: plan.dropped.len(),
            ..Self::default()
        };
        for row in rows {
            match row.status() {
                CellStatus::Inserted => summary.inserted_rows += 1,
                CellStatus::Removed => summary.removed_rows += 1,
                CellStatus::Unchanged => summary.kept_rows += 1,
            }
            for cell in row.cells() {
                match cell.status() {
                    CellStatus::Inserted => summary.inserted_cells += 1,
                    CellStatus::Removed => summary.removed_cells += 1,
                    CellStatus::Unchanged => {}
                }
            }
        }
        summary
    }
}

/// How the actual table's columns map onto the expected table's.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnPlan {
    /// Actual column holding each expected column's values
    sources: Vec<Option<usize>>,
    /// Actual columns with no expected counterpart, in actual order
    surplus: Vec<usize>,
    /// Expected columns reported as removed and left out of row matching
    dropped: Vec<usize>,
}

impl ColumnPlan {
    fn positional(expected_width: usize, actual_width: usize) -> Self {
        Self {
            sources: (0..expected_width)
                .map(|c| (c < actual_width).then_some(c))
                .collect(),
            surplus: (expected_width..actual_width).collect(),
            dropped: Vec::new(),
        }
    }

    fn by_header(expected: &[Option<&str>], actual: &[Option<String>]) -> Self {
        let mut used = vec![false; actual.len()];
        let sources: Vec<Option<usize>> = expected
            .iter()
            .map(|header| {
                let found = actual
                    .iter()
                    .enumerate()
                    .position(|(i, h)| !used[i] && h.as_deref() == *header);
                if let Some(i) = found {
                    used[i] = true;
                }
                found
            })
            .collect();
        let dropped = sources
            .iter()
            .enumerate()
            .filter_map(|(c, s)| s.is_none().then_some(c))
            .collect();
        let surplus = used
            .iter()
            .enumerate()
            .filter_map(|(i, u)| (!u).then_some(i))
            .collect();
        Self {
            sources,
            surplus,
            dropped,
        }
    }

    /// Expected columns that take part in row matching
    fn compared(&self) -> Vec<usize> {
        (0..self.sources.len())
            .filter(|c| !self.dropped.contains(c))
            .collect()
    }

    /// True when a compared column has no actual source, so no row can match
    fn has_padding(&self) -> bool {
        self.sources
            .iter()
            .enumerate()
            .any(|(c, s)| s.is_none() && !self.dropped.contains(&c))
    }

    /// An actual row laid out in expected column order
    fn project(&self, row: &[Option<String>]) -> Vec<Option<String>> {
        self.sources
            .iter()
            .map(|s| s.and_then(|i| row.get(i).cloned().flatten()))
            .collect()
    }

    fn surplus_values<'a>(&'a self, row: &'a [Option<String>]) -> impl Iterator<Item = Option<String>> + 'a {
        self.surplus
            .iter()
            .map(move |&i| row.get(i).cloned().flatten())
    }
}

impl Table {
    /// Diff this (expected) table against `actual`, annotating it in place.
    ///
    /// After the call every cell carries a [`CellStatus`] and rows only the
    /// actual side had are spliced in. With `raise` set (the default) any
    /// difference is returned as a [`TableMismatch`] holding a copy of the
    /// annotated table; the receiver is annotated either way.
    ///
    /// Statuses left by an earlier diff are reset first, so each call
    /// reports only its own differences. Rows spliced in by that earlier
    /// diff stay in the table and are compared like any other row.
    ///
    /// ```rust
    /// use tablediff::{DiffOptions, Table};
    ///
    /// let mut expected = Table::new([["a", "b"], ["c", "d"]]).unwrap();
    /// let actual = Table::new([["a", "b"], ["c", "d"], ["e", "f"]]).unwrap();
    ///
    /// let summary = expected.diff(&actual, DiffOptions::new().raise(false)).unwrap();
    /// assert_eq!(summary.inserted_rows, 1);
    /// assert_eq!(expected.height(), 3);
    /// ```
    pub fn diff(&mut self, actual: impl Into<Actual>, options: DiffOptions) -> Result<DiffSummary> {
        let actual = actual.into().into_rows(&self.headers())?;
        for row in &mut self.rows {
            row.mark(CellStatus::Unchanged);
        }
        let expected_width = self.width();
        let actual_width = actual.first().map_or(0, Vec::len);

        let plan = match (options.coldiff, self.rows.first()) {
            (true, Some(header)) => {
                let expected: Vec<Option<&str>> = header.values().collect();
                let actual_header = actual.first().map(Vec::as_slice).unwrap_or_default();
                ColumnPlan::by_header(&expected, actual_header)
            }
            _ => ColumnPlan::positional(expected_width, actual_width),
        };
        trace!(?plan, "column plan");

        let projected: Vec<Vec<Option<String>>> = actual.iter().map(|r| plan.project(r)).collect();
        let compared = plan.compared();
        let padded = plan.has_padding();
        let edits = {
            let left: Vec<Vec<Option<&str>>> = self
                .rows
                .iter()
                .map(|row| compared.iter().map(|&c| row.cells()[c].value()).collect())
                .collect();
            align(&left, &projected, |l, r| {
                !padded
                    && l.iter()
                    .zip(&compared)
                    .all(|(value, &c)| *value == r[c].as_deref())
            })
        };

        let mut expected: Vec<Option<Row>> = std::mem::take(&mut self.rows).into_iter().map(Some).collect();
        let mut rows = Vec::with_capacity(edits.len());
        for edit in edits {
            match edit {
                Edit::Keep { left, right } => {
                    let Some(mut row) = expected.get_mut(left).and_then(Option::take) else {
                        continue;
                    };
                    for &c in &plan.dropped {
                        if let Some(cell) = row.cells_mut().get_mut(c) {
                            cell.set_status(CellStatus::Removed);
                        }
                    }
                    for value in plan.surplus_values(&actual[right]) {
                        row.push(Cell::new(value).with_status(CellStatus::Inserted));
                    }
                    rows.push(row);
                }
                Edit::Remove(left) => {
                    let Some(mut row) = expected.get_mut(left).and_then(Option::take) else {
                        continue;
                    };
                    row.mark(CellStatus::Removed);
                    for _ in &plan.surplus {
                        row.push(Cell::blank(CellStatus::Removed));
                    }
                    rows.push(row);
                }
                Edit::Insert(right) => {
                    let cells = projected[right]
                        .iter()
                        .cloned()
                        .chain(plan.surplus_values(&actual[right]))
                        .map(|v| Cell::new(v).with_status(CellStatus::Inserted))
                        .collect();
                    rows.push(Row::new(cells));
                }
            }
        }
        self.rows = rows;

        let summary = DiffSummary::tally(&self.rows, &plan);
        debug!(
            kept = summary.kept_rows,
            inserted = summary.inserted_rows,
            removed = summary.removed_rows,
            surplus_columns = summary.surplus_columns,
            missing_columns = summary.missing_columns,
            "table diff complete"
        );

        if options.raise && !summary.is_identical() {
            return Err(TableMismatch::new(self.clone(), summary).into());
        }
        Ok(summary)
    }
}

/// Text of a hash value: strings as they are, null as no value, anything
/// else in its JSON form.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
