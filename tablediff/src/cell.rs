//! Single table values and their diff status.

use serde::{Deserialize, Serialize};

/// Diff annotation of a cell or row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellStatus {
    /// Present on both sides (or never diffed)
    #[default]
    Unchanged,
    /// Only present in the actual table
    Inserted,
    /// Only present in the expected table
    Removed,
}

impl CellStatus {
    /// True for anything but [`CellStatus::Unchanged`]
    pub fn is_changed(self) -> bool {
        self != CellStatus::Unchanged
    }
}

/// A value holder with an independent diff status.
///
/// A value of `None` is the "no value" marker: a blank cell produced by a
/// parser, a placeholder added by the diff, or an argument replaced by nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    value: Option<String>,
    status: CellStatus,
}

impl Cell {
    /// Create an unchanged cell
    pub fn new(value: Option<String>) -> Self {
        Self {
            value,
            status: CellStatus::Unchanged,
        }
    }

    /// Create an empty cell with the given status
    pub(crate) fn blank(status: CellStatus) -> Self {
        Self {
            value: None,
            status,
        }
    }

    /// Builder: set the status
    pub fn with_status(mut self, status: CellStatus) -> Self {
        self.status = status;
        self
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn status(&self) -> CellStatus {
        self.status
    }

    pub fn set_status(&mut self, status: CellStatus) {
        self.status = status;
    }

    /// Printable width of the value, in characters
    pub fn width(&self) -> usize {
        self.value.as_deref().map_or(0, |v| v.chars().count())
    }

    /// True if the value contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.value.as_deref().is_some_and(|v| v.contains(needle))
    }

    pub(crate) fn into_value(self) -> Option<String> {
        self.value
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::new(Some(value.to_string()))
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::new(Some(value))
    }
}

impl From<&String> for Cell {
    fn from(value: &String) -> Self {
        Cell::new(Some(value.clone()))
    }
}

impl From<Option<&str>> for Cell {
    fn from(value: Option<&str>) -> Self {
        Cell::new(value.map(str::to_string))
    }
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self {
        Cell::new(value)
    }
}
