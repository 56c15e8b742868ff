//! The table data model.
//!
//! A `Table` owns its rows; everything else (columns, hashes, raw matrices)
//! is derived from them. The first row is the header row for header-keyed
//! operations (`hashes`, `map_column`, `map_headers`) and an ordinary row
//! everywhere else.
//!
//! Only [`Table::map_column`] and [`Table::diff`](crate::Table::diff) take
//! `&mut self`. Every other transformation builds a fresh table and leaves
//! the receiver and its cells alone.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

use crate::cell::Cell;
use crate::column::Column;
use crate::error::StructureError;
use crate::row::Row;
use crate::Result;

/// Conversion applied to a column's values when materializing hashes.
pub type ConvertFn = dyn Fn(Option<&str>) -> Value + Send + Sync;

/// Where a table came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Source file, when known
    pub file: Option<PathBuf>,
    /// Line of the first row
    pub line: usize,
}

impl Location {
    pub fn new(line: usize) -> Self {
        Self { file: None, line }
    }

    /// Builder: set the source file
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }
}

/// An ordered, rectangular collection of rows.
#[derive(Clone, Default)]
pub struct Table {
    pub(crate) rows: Vec<Row>,
    pub(crate) converters: HashMap<String, Arc<ConvertFn>>,
    pub(crate) file: Option<PathBuf>,
}

impl Table {
    /// Build a table from a matrix of values.
    ///
    /// Fails with [`StructureError::RaggedRow`] if the rows differ in length.
    ///
    /// ```rust
    /// use tablediff::Table;
    ///
    /// let table = Table::new([["one", "four"], ["4444", "55555"]]).unwrap();
    /// assert_eq!(table.headers(), vec!["one", "four"]);
    /// ```
    pub fn new<R, V>(rows: impl IntoIterator<Item = R>) -> Result<Self>
    where
        R: IntoIterator<Item = V>,
        V: Into<Cell>,
    {
        Self::from_rows(
            rows.into_iter()
                .map(|r| Row::new(r.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }

    /// Build a table whose rows remember the lines they were parsed from.
    ///
    /// Row `i` gets line `location.line + i`.
    pub fn with_location<R, V>(rows: impl IntoIterator<Item = R>, location: Location) -> Result<Self>
    where
        R: IntoIterator<Item = V>,
        V: Into<Cell>,
    {
        let mut table = Self::from_rows(
            rows.into_iter()
                .enumerate()
                .map(|(i, r)| {
                    Row::new(r.into_iter().map(Into::into).collect()).with_line(location.line + i)
                })
                .collect(),
        )?;
        table.file = location.file;
        Ok(table)
    }

    /// Build a table from already constructed rows.
    pub fn from_rows(rows: Vec<Row>) -> Result<Self> {
        check_rectangular(rows.iter().map(Row::len))?;
        Ok(Self {
            rows,
            converters: HashMap::new(),
            file: None,
        })
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.cells().get(col))
    }

    /// Mutable access to a cell; the change is visible from every view.
    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.rows.get_mut(row).and_then(|r| r.cells_mut().get_mut(col))
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Row::len)
    }

    /// Number of rows, header included
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn column(&self, index: usize) -> Option<Column<'_>> {
        (index < self.width()).then(|| Column::new(&self.rows, index))
    }

    /// Column-major view sharing the row-major cells
    pub fn columns(&self) -> impl Iterator<Item = Column<'_>> + '_ {
        let rows = &self.rows;
        (0..self.width()).map(move |i| Column::new(rows, i))
    }

    /// Printable width of every column
    pub fn column_widths(&self) -> Vec<usize> {
        self.columns().map(|c| c.width()).collect()
    }

    /// Values of the header row, with no-value headers as `""`
    pub fn headers(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|r| r.values().map(Option::unwrap_or_default).collect())
            .unwrap_or_default()
    }

    /// Index of the first column whose header is `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.rows
            .first()
            .and_then(|r| r.values().position(|v| v == Some(name)))
    }

    /// The whole matrix of values
    pub fn raw(&self) -> Vec<Vec<Option<String>>> {
        self.rows.iter().map(Row::to_values).collect()
    }

    /// The matrix of values below the header row
    pub fn data_rows(&self) -> Vec<Vec<Option<String>>> {
        self.rows.iter().skip(1).map(Row::to_values).collect()
    }

    /// One map per data row, keyed by header, in header order.
    ///
    /// Values pass through any converter registered with
    /// [`Table::map_column`]; otherwise they become strings, or null for
    /// cells without a value.
    pub fn hashes(&self) -> Vec<Map<String, Value>> {
        let headers = self.headers();
        self.rows
            .iter()
            .skip(1)
            .map(|row| {
                headers
                    .iter()
                    .zip(row.cells())
                    .map(|(header, cell)| (header.to_string(), self.convert(header, cell.value())))
                    .collect()
            })
            .collect()
    }

    /// Map column 0 to column 1 across every row, header included.
    pub fn rows_hash(&self) -> Result<Map<String, Value>> {
        self.verify_width(2)?;
        Ok(self
            .rows
            .iter()
            .filter_map(|row| match row.cells() {
                [key, value] => Some((
                    key.value().unwrap_or_default().to_string(),
                    plain_value(value.value()),
                )),
                _ => None,
            })
            .collect())
    }

    /// A new table whose rows are this table's columns.
    pub fn transpose(&self) -> Table {
        let rows = self
            .columns()
            .map(|column| {
                Row::new(
                    column
                        .cells()
                        .map(|c| Cell::new(c.value().map(str::to_string)))
                        .collect(),
                )
            })
            .collect();
        Table {
            rows,
            converters: HashMap::new(),
            file: None,
        }
    }

    /// Register a conversion for the column headed `name`.
    ///
    /// The conversion is applied by [`Table::hashes`] and survives
    /// [`Table::map_headers`]. A missing column is an error when `strict`,
    /// otherwise nothing happens.
    pub fn map_column<F>(&mut self, name: &str, strict: bool, converter: F) -> Result<()>
    where
        F: Fn(Option<&str>) -> Value + Send + Sync + 'static,
    {
        if self.column_index(name).is_none() {
            if strict {
                return Err(StructureError::MissingColumn(name.to_string()).into());
            }
            trace!(column = name, "no such column, conversion skipped");
            return Ok(());
        }
        self.converters.insert(name.to_string(), Arc::new(converter));
        Ok(())
    }

    /// A new table with header cells renamed.
    ///
    /// Converters follow their column to the new name.
    pub fn map_headers<I, K, V>(&self, renames: I) -> Table
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let renames: HashMap<String, String> = renames
            .into_iter()
            .map(|(from, to)| (from.as_ref().to_string(), to.into()))
            .collect();

        let mut table = self.clone();
        if let Some(header) = table.rows.first_mut() {
            for cell in header.cells_mut() {
                let renamed = cell.value().and_then(|v| renames.get(v)).cloned();
                if let Some(name) = renamed {
                    let status = cell.status();
                    *cell = Cell::new(Some(name)).with_status(status);
                }
            }
        }
        table.converters = self
            .converters
            .iter()
            .map(|(name, f)| {
                let key = renames.get(name).unwrap_or(name).clone();
                (key, Arc::clone(f))
            })
            .collect();
        table
    }

    /// A new table with placeholder arguments substituted.
    ///
    /// Substitutions are applied in order. Every occurrence of a name inside
    /// a cell is replaced by its value; a `None` value blanks the whole cell.
    /// Cells mentioning no name are copied as they are.
    pub fn arguments_replaced<'a, I>(&self, substitutions: I) -> Table
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        let substitutions: Vec<_> = substitutions.into_iter().collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.replaced(
                    row.cells()
                        .iter()
                        .map(|c| Cell::new(replace_arguments(c.value(), &substitutions)))
                        .collect(),
                )
            })
            .collect();
        Table {
            rows,
            converters: self.converters.clone(),
            file: self.file.clone(),
        }
    }

    /// True if any cell's value contains `text`
    pub fn has_text(&self, text: &str) -> bool {
        self.rows
            .iter()
            .any(|row| row.cells().iter().any(|c| c.contains(text)))
    }

    fn convert(&self, header: &str, value: Option<&str>) -> Value {
        match self.converters.get(header) {
            Some(convert) => convert(value),
            None => plain_value(value),
        }
    }

    fn verify_width(&self, expected: usize) -> std::result::Result<(), StructureError> {
        let found = self.width();
        if found == expected {
            Ok(())
        } else {
            Err(StructureError::WrongColumnCount { expected, found })
        }
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut converters: Vec<&String> = self.converters.keys().collect();
        converters.sort();
        f.debug_struct("Table")
            .field("rows", &self.rows)
            .field("converters", &converters)
            .field("file", &self.file)
            .finish()
    }
}

/// JSON form of a raw cell value
pub(crate) fn plain_value(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |v| Value::String(v.to_string()))
}

pub(crate) fn check_rectangular(
    lengths: impl IntoIterator<Item = usize>,
) -> std::result::Result<(), StructureError> {
    let mut lengths = lengths.into_iter().enumerate();
    let Some((_, expected)) = lengths.next() else {
        return Ok(());
    };
    for (row, found) in lengths {
        if found != expected {
            return Err(StructureError::RaggedRow {
                row,
                expected,
                found,
            });
        }
    }
    Ok(())
}

fn replace_arguments(value: Option<&str>, substitutions: &[(&str, Option<&str>)]) -> Option<String> {
    let mut current = value.map(str::to_string);
    for (name, replacement) in substitutions {
        let Some(text) = current.as_deref() else {
            break;
        };
        if name.is_empty() || !text.contains(name) {
            continue;
        }
        current = replacement.map(|r| text.replace(name, r));
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableError;
    use serde_json::json;

    fn sample() -> Table {
        Table::new([["one", "four", "seven"], ["4444", "55555", "666666"]]).unwrap()
    }

    fn to_int(v: Option<&str>) -> Value {
        v.and_then(|s| s.parse::<i64>().ok()).into()
    }

    #[test]
    fn test_rows_and_columns() {
        let table = sample();
        let first: Vec<_> = table.rows()[0].values().collect();
        assert_eq!(first, vec![Some("one"), Some("four"), Some("seven")]);

        let column: Vec<_> = table.column(1).unwrap().cells().map(Cell::value).collect();
        assert_eq!(column, vec![Some("four"), Some("55555")]);
        assert!(table.column(3).is_none());
    }

    #[test]
    fn test_headers() {
        assert_eq!(sample().headers(), vec!["one", "four", "seven"]);
        assert!(Table::default().headers().is_empty());
    }

    #[test]
    fn test_same_cells_in_rows_and_columns() {
        let table = sample();
        let from_row = &table.rows()[1].cells()[2];
        let from_column = table.columns().nth(2).unwrap().cell(1).unwrap();
        assert!(std::ptr::eq(from_row, from_column));
        assert_eq!(from_column.value(), Some("666666"));
    }

    #[test]
    fn test_mutation_visible_through_columns() {
        let mut table = sample();
        table
            .cell_mut(1, 2)
            .unwrap()
            .set_status(crate::CellStatus::Inserted);
        let cell = table.column(2).unwrap().cell(1).unwrap();
        assert_eq!(cell.status(), crate::CellStatus::Inserted);
    }

    #[test]
    fn test_column_width() {
        assert_eq!(sample().column(1).unwrap().width(), 5);
        assert_eq!(sample().column_widths(), vec![4, 5, 6]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Table::new(vec![vec!["a", "b"], vec!["c"]]).unwrap_err();
        assert!(matches!(
            err,
            TableError::Structure(StructureError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_location_numbers_rows() {
        let table =
            Table::with_location([["a"], ["b"]], Location::new(10).file("features/x.feature"))
                .unwrap();
        assert_eq!(table.rows()[0].line_ref(), 10);
        assert_eq!(table.rows()[1].line_ref(), 11);
        assert_eq!(table.file(), Some(Path::new("features/x.feature")));
    }

    #[test]
    fn test_hashes() {
        let hashes = sample().hashes();
        assert_eq!(hashes.len(), 1);
        assert_eq!(
            Value::Object(hashes[0].clone()),
            json!({"one": "4444", "four": "55555", "seven": "666666"})
        );
        let keys: Vec<_> = hashes[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["one", "four", "seven"]);
    }

    #[test]
    fn test_hashes_of_blank_cells_are_null() {
        let table = Table::new(vec![vec![Some("a")], vec![None]]).unwrap();
        assert_eq!(table.hashes()[0]["a"], Value::Null);
    }

    #[test]
    fn test_map_column() {
        let mut table = sample();
        table.map_column("one", true, to_int).unwrap();
        assert_eq!(table.hashes()[0]["one"], json!(4444));
        assert_eq!(table.hashes()[0]["four"], json!("55555"));
    }

    #[test]
    fn test_map_column_missing_lenient() {
        let mut table = sample();
        assert!(table.map_column("two", false, to_int).is_ok());
        assert_eq!(table.hashes()[0]["one"], json!("4444"));
    }

    #[test]
    fn test_map_column_missing_strict() {
        let mut table = sample();
        let err = table.map_column("two", true, to_int).unwrap_err();
        assert_eq!(err.to_string(), "The column named \"two\" does not exist");
    }

    #[test]
    fn test_transpose() {
        let table = Table::new([["one", "1111"], ["two", "22222"]]).unwrap();
        let transposed = table.transpose();
        assert_eq!(
            Value::Object(transposed.hashes()[0].clone()),
            json!({"one": "1111", "two": "22222"})
        );
        assert_eq!(table.headers(), vec!["one", "1111"]);
    }

    #[test]
    fn test_transpose_creates_new_cells() {
        let table = Table::new([["a", "b"], ["c", "d"]]).unwrap();
        let transposed = table.transpose();
        assert!(!std::ptr::eq(table.cell(0, 0).unwrap(), transposed.cell(0, 0).unwrap()));
        assert_eq!(transposed.cell(0, 1).and_then(Cell::value), Some("c"));
    }

    #[test]
    fn test_rows_hash() {
        let table = Table::new([["one", "1111"], ["two", "22222"]]).unwrap();
        assert_eq!(
            Value::Object(table.rows_hash().unwrap()),
            json!({"one": "1111", "two": "22222"})
        );
    }

    #[test]
    fn test_rows_hash_needs_two_columns() {
        let table = Table::new([["one", "1111", "abc"], ["two", "22222", "def"]]).unwrap();
        let err = table.rows_hash().unwrap_err();
        assert_eq!(err.to_string(), "The table must have exactly 2 columns");
    }

    #[test]
    fn test_map_headers() {
        let table = sample().map_headers([("one", "three")]);
        assert_eq!(table.hashes()[0]["three"], json!("4444"));
        assert_eq!(sample().headers()[0], "one");
    }

    #[test]
    fn test_map_headers_keeps_converters() {
        let mut table = sample();
        table.map_column("one", true, to_int).unwrap();
        let renamed = table.map_headers([("one", "three")]);
        assert_eq!(renamed.hashes()[0]["three"], json!(4444));
        assert_eq!(table.hashes()[0]["one"], json!(4444));
    }

    fn placeholders() -> Table {
        Table::new([["qty", "book"], ["<qty>", "<book>"]]).unwrap()
    }

    #[test]
    fn test_arguments_replaced() {
        let replaced = placeholders().arguments_replaced([
            ("<book>", Some("Unbearable lightness of being")),
            ("<qty>", Some("5")),
        ]);
        assert_eq!(
            replaced.hashes()[0]["book"],
            json!("Unbearable lightness of being")
        );
        assert_eq!(replaced.hashes()[0]["qty"], json!("5"));
    }

    #[test]
    fn test_arguments_replaced_inside_text() {
        let table = Table::new(vec![
            vec![Some("qty"), Some("book")],
            vec![None, Some("This is <who>'s book")],
        ])
        .unwrap();
        let replaced = table.arguments_replaced([("<who>", Some("Jane"))]);
        assert_eq!(replaced.hashes()[0]["book"], json!("This is Jane's book"));
        assert_eq!(replaced.hashes()[0]["qty"], Value::Null);
    }

    #[test]
    fn test_arguments_replaced_with_nothing() {
        let replaced = placeholders().arguments_replaced([("<book>", None)]);
        assert_eq!(replaced.hashes()[0]["book"], Value::Null);
    }

    #[test]
    fn test_arguments_replaced_keeps_unmatched_values() {
        let table = Table::new([["book"], ["cat"]]).unwrap();
        let replaced = table.arguments_replaced([("<book>", None)]);
        assert_eq!(replaced.hashes()[0]["book"], json!("cat"));
    }

    #[test]
    fn test_arguments_replaced_leaves_receiver_untouched() {
        let table = placeholders();
        let _ = table.arguments_replaced([("<book>", Some("Unbearable lightness of being"))]);
        assert_eq!(table.hashes()[0]["book"], json!("<book>"));
    }

    #[test]
    fn test_arguments_replaced_with_blank_cells() {
        let table = Table::new(vec![
            vec![Some("book"), Some("qty")],
            vec![Some("<book>"), None],
        ])
        .unwrap();
        let replaced = table.arguments_replaced([("<book>", None), ("<qty>", Some("5"))]);
        assert_eq!(replaced.hashes()[0]["book"], Value::Null);
        assert_eq!(replaced.hashes()[0]["qty"], Value::Null);
    }

    #[test]
    fn test_has_text() {
        assert!(placeholders().has_text("<book>"));
        assert!(!placeholders().has_text("<who>"));

        let table = Table::new(vec![
            vec![Some("qty"), Some("book")],
            vec![None, Some("This is <who>'s book")],
        ])
        .unwrap();
        assert!(table.has_text("<who>"));
    }

    #[test]
    fn test_raw_and_data_rows() {
        let table = sample();
        assert_eq!(table.raw().len(), 2);
        assert_eq!(
            table.data_rows(),
            vec![vec![
                Some("4444".to_string()),
                Some("55555".to_string()),
                Some("666666".to_string())
            ]]
        );
    }
}
