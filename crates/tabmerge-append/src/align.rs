//! Renaming of source columns through a finalized mapping.

use std::collections::BTreeSet;

use tabmerge_map::FinalMapping;
use tabmerge_model::{CellValue, Row, Table};

/// The source table's columns as seen under target column names.
///
/// Each live `(target, source)` pair exposes the source column's values under
/// the target name. Several targets may read the same source column. Pairs
/// whose source column is missing from the source header are stale and are
/// skipped rather than reported as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamedView {
    pairs: Vec<(String, String)>,
    stale: Vec<String>,
}

impl RenamedView {
    pub fn new(source: &Table, mapping: &FinalMapping) -> Self {
        let mut pairs = Vec::with_capacity(mapping.len());
        let mut stale = Vec::new();
        for (target_column, source_column) in mapping {
            if source.has_column(source_column) {
                pairs.push((target_column.clone(), source_column.clone()));
            } else {
                tracing::debug!(
                    target_column = target_column.as_str(),
                    source_column = source_column.as_str(),
                    "skipping stale mapping entry"
                );
                stale.push(target_column.clone());
            }
        }
        Self { pairs, stale }
    }

    /// Target column names exposed by the view, in lexicographic order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(target, _)| target.as_str())
    }

    /// Target columns whose mapped source column does not exist.
    pub fn stale_columns(&self) -> &[String] {
        &self.stale
    }

    /// Builds the renamed row holding only `columns`.
    ///
    /// Blank or missing source values become empty text.
    pub fn project(&self, row: &Row, columns: &BTreeSet<String>) -> Row {
        let mut out = Row::new();
        for (target, source) in &self.pairs {
            if !columns.contains(target) {
                continue;
            }
            let value = match row.get(source) {
                CellValue::Blank => CellValue::Text(String::new()),
                other => other.clone(),
            };
            out.insert(target.clone(), value);
        }
        out
    }
}

/// Columns present in both the renamed view and the target header.
///
/// Returned as a sorted set so every row is built in the same column order.
pub fn common_columns(view: &RenamedView, target: &Table) -> BTreeSet<String> {
    view.columns()
        .filter(|column| target.has_column(column))
        .map(str::to_string)
        .collect()
}
