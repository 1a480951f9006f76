//! Tabular data: cells, rows and tables with a unique header.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::error::{ModelError, Result};

static BLANK: CellValue = CellValue::Blank;

/// A single scalar cell.
///
/// `Blank` is a value in its own right: a row that lacks a column reads as
/// `Blank`, and an empty spreadsheet cell is loaded as `Blank`.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    Number(f64),
    #[default]
    Blank,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Number(value) => write!(f, "{value}"),
            Self::Blank => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Row {
    pub cells: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a row from `(column, value)` pairs. Later pairs win.
    pub fn from_pairs<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, CellValue)>,
    {
        Self {
            cells: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Returns the value under `column`, or `Blank` when the row has none.
    pub fn get(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&BLANK)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: CellValue) {
        self.cells.insert(column.into(), value);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// An ordered set of rows under a header of unique column names.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "StoredTable")]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

/// Serialized table, validated through [`Table::with_rows`].
#[derive(serde::Deserialize)]
struct StoredTable {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Row>,
}

impl TryFrom<StoredTable> for Table {
    type Error = ModelError;

    fn try_from(stored: StoredTable) -> Result<Self> {
        Self::with_rows(stored.columns, stored.rows)
    }
}

impl Table {
    /// Creates an empty table.
    ///
    /// Fails with [`ModelError::DuplicateColumn`] when a name repeats.
    pub fn new(columns: Vec<String>) -> Result<Self> {
        if let Some(column) = first_duplicate(&columns) {
            return Err(ModelError::DuplicateColumn {
                column: column.to_string(),
            });
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    pub fn with_rows(columns: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        let mut table = Self::new(columns)?;
        table.rows = rows;
        Ok(table)
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of header columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Cell at `row` under `column`; `None` only when `row` is out of range.
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        self.rows.get(row).map(|r| r.get(column))
    }
}

/// Returns the first column name that appears more than once.
pub fn first_duplicate<S: AsRef<str>>(columns: &[S]) -> Option<&str> {
    let mut seen = HashSet::new();
    columns
        .iter()
        .map(AsRef::as_ref)
        .find(|column| !seen.insert(*column))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn missing_cell_reads_as_blank() {
        let row = Row::from_pairs([("Name", CellValue::text("Ada"))]);
        assert_eq!(row.get("Name"), &CellValue::text("Ada"));
        assert!(row.get("Email").is_blank());
    }

    #[test]
    fn duplicate_columns_are_rejected() {
        let err = Table::new(cols(&["Name", "Email", "Name"])).unwrap_err();
        assert_eq!(
            err,
            ModelError::DuplicateColumn {
                column: "Name".to_string()
            }
        );
    }

    #[test]
    fn first_duplicate_is_case_sensitive() {
        assert_eq!(first_duplicate(&["Name", "name"]), None);
        assert_eq!(first_duplicate(&["a", "b", "b", "a"]), Some("b"));
    }

    #[test]
    fn value_lookup() {
        let mut table = Table::new(cols(&["Name", "Age"])).unwrap();
        table.push_row(Row::from_pairs([
            ("Name", CellValue::text("Ada")),
            ("Age", CellValue::Number(36.0)),
        ]));
        assert_eq!(table.height(), 1);
        assert_eq!(table.width(), 2);
        assert_eq!(table.value(0, "Age"), Some(&CellValue::Number(36.0)));
        assert_eq!(table.value(0, "Phone"), Some(&CellValue::Blank));
        assert_eq!(table.value(1, "Name"), None);
    }

    #[test]
    fn display_renders_blank_as_empty() {
        assert_eq!(CellValue::Blank.to_string(), "");
        assert_eq!(CellValue::Number(3.0).to_string(), "3");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::text("x").to_string(), "x");
    }
}
