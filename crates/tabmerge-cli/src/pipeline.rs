//! Suggest and append pipelines shared by the CLI commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use tabmerge_append::{MergeStats, merge};
use tabmerge_ingest::{load_headers, load_table, save_table};
use tabmerge_map::{Mapping, MappingResolver, MatchOptions};

use crate::overrides::{ColumnOverride, apply_overrides, load_mapping_file};

/// Everything needed to append one file to another.
#[derive(Debug, Clone)]
pub struct AppendRequest {
    pub source: PathBuf,
    pub target: PathBuf,
    /// Where to write the merged table; the target file when `None`.
    pub output: Option<PathBuf>,
    pub options: MatchOptions,
    /// JSON overrides applied before `accept_suggestions` and `overrides`.
    pub mapping_file: Option<PathBuf>,
    pub accept_suggestions: bool,
    pub overrides: Vec<ColumnOverride>,
    pub dry_run: bool,
}

impl AppendRequest {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            output: None,
            options: MatchOptions::default(),
            mapping_file: None,
            accept_suggestions: false,
            overrides: Vec::new(),
            dry_run: false,
        }
    }

    pub fn output_path(&self) -> &Path {
        self.output.as_deref().unwrap_or(&self.target)
    }
}

#[derive(Debug)]
pub struct AppendResult {
    /// Mapping as it stood when the merge ran.
    pub mapping: Mapping,
    pub stats: MergeStats,
    /// Path written, `None` on a dry run.
    pub written: Option<PathBuf>,
}

/// Builds the initial mapping between the headers of two files.
pub fn suggest(source: &Path, target: &Path, options: MatchOptions) -> Result<Mapping> {
    let source_header = load_headers(source).context("load source headers")?;
    let target_header = load_headers(target).context("load target headers")?;
    MappingResolver::new(options)
        .resolve(&source_header, &target_header)
        .context("build column mapping")
}

/// Maps, merges and writes the source file's rows after the target's.
pub fn append(request: &AppendRequest) -> Result<AppendResult> {
    let span = info_span!("append", source = %request.source.display());
    let _guard = span.enter();

    let source = load_table(&request.source).context("load source table")?;
    let target = load_table(&request.target).context("load target table")?;

    let mut mapping = MappingResolver::new(request.options)
        .resolve(source.columns(), target.columns())
        .context("build column mapping")?;

    if let Some(path) = &request.mapping_file {
        let overrides = load_mapping_file(path)?;
        apply_overrides(&mut mapping, &overrides)?;
    }
    if request.accept_suggestions {
        let accepted = mapping.accept_all_suggestions();
        info!(accepted, "accepted fuzzy suggestions");
    }
    apply_overrides(&mut mapping, &request.overrides)?;

    let outcome = merge(&source, &target, &mapping.clone().finalize());

    let written = if request.dry_run {
        info!("dry run, skipping write");
        None
    } else {
        let path = request.output_path();
        save_table(path, &outcome.table).context("save merged table")?;
        info!(path = %path.display(), rows = outcome.table.height(), "wrote merged table");
        Some(path.to_path_buf())
    };

    Ok(AppendResult {
        mapping,
        stats: outcome.stats,
        written,
    })
}
