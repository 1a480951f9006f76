//! Row union of an aligned source table into a target table.

use serde::{Deserialize, Serialize};
use tabmerge_map::FinalMapping;
use tabmerge_model::Table;

use crate::align::{RenamedView, common_columns};

/// Counts reported after a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    /// Source header width before mapping.
    pub source_columns: usize,
    /// Target header width.
    pub target_columns: usize,
    /// Columns that received source data.
    pub mapped_columns: usize,
    /// Rows contributed by the source table.
    pub appended_rows: usize,
}

/// Merged table plus the statistics of the merge.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub table: Table,
    pub stats: MergeStats,
}

/// Appends the rows of `source` to `target` using a finalized mapping.
///
/// The merged table keeps the target header. Target rows come first,
/// unchanged; every source row follows in source order, carrying only the
/// columns shared with the target after renaming. Target columns the source
/// does not supply are blank in appended rows. Mapping entries that point to
/// a column missing from `source` are skipped.
pub fn merge(source: &Table, target: &Table, mapping: &FinalMapping) -> MergeOutcome {
    let view = RenamedView::new(source, mapping);
    let common = common_columns(&view, target);

    let mut table = target.clone();
    for row in source.rows() {
        table.push_row(view.project(row, &common));
    }

    let stats = MergeStats {
        source_columns: source.width(),
        target_columns: target.width(),
        mapped_columns: common.len(),
        appended_rows: source.height(),
    };
    tracing::info!(
        source_columns = stats.source_columns,
        target_columns = stats.target_columns,
        mapped_columns = stats.mapped_columns,
        appended_rows = stats.appended_rows,
        stale_entries = view.stale_columns().len(),
        "merged source rows into target"
    );

    MergeOutcome { table, stats }
}
