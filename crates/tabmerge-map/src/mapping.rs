//! Target-to-source column mapping.
//!
//! A [`Mapping`] holds one [`MappingEntry`] per target column, in target
//! header order. It is built once by [`MappingResolver::resolve`] (or
//! [`build_initial_mapping`]), adjusted with manual overrides, then consumed
//! by [`Mapping::finalize`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tabmerge_model::first_duplicate;

use crate::error::{MappingError, Result};
use crate::score::{Candidate, top_k};

/// Default minimum score for a fuzzy candidate to be suggested.
pub const DEFAULT_THRESHOLD: u8 = 60;
/// Default number of candidates considered per target column.
pub const DEFAULT_LIMIT: usize = 5;

/// Final target column to source column assignments.
pub type FinalMapping = BTreeMap<String, String>;

/// Options controlling how suggestions are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Minimum score (0 to 100) for a candidate to be kept.
    pub threshold: u8,
    /// Maximum number of candidates ranked per target column.
    pub limit: usize,
    /// When false, only exact name matches are produced.
    pub fuzzy: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            limit: DEFAULT_LIMIT,
            fuzzy: true,
        }
    }
}

impl MatchOptions {
    /// Options that disable fuzzy matching entirely.
    #[must_use]
    pub fn exact_only() -> Self {
        Self {
            fuzzy: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn with_fuzzy(mut self, enable: bool) -> Self {
        self.fuzzy = enable;
        self
    }
}

/// Status of a target column's mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingStatus {
    /// Source has a column with the identical name.
    Exact,
    /// No exact match, but fuzzy candidates exist.
    Suggested,
    /// No exact match and no candidate above the threshold.
    Unmapped,
    /// A source column was chosen by the caller.
    ManuallySet,
}

impl MappingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Suggested => "suggested",
            Self::Unmapped => "unmapped",
            Self::ManuallySet => "manual",
        }
    }
}

impl fmt::Display for MappingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping state of one target column.
///
/// `chosen_source_column` is set exactly when the status is
/// [`MappingStatus::Exact`] or [`MappingStatus::ManuallySet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredEntry")]
pub struct MappingEntry {
    target_column: String,
    status: MappingStatus,
    chosen_source_column: Option<String>,
    candidates: Vec<Candidate>,
}

/// Unchecked form of [`MappingEntry`] read from serialized data.
#[derive(Deserialize)]
struct StoredEntry {
    target_column: String,
    status: MappingStatus,
    chosen_source_column: Option<String>,
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl TryFrom<StoredEntry> for MappingEntry {
    type Error = MappingError;

    fn try_from(stored: StoredEntry) -> Result<Self> {
        let consistent = match (stored.status, stored.chosen_source_column.as_deref()) {
            (MappingStatus::Exact, Some(source)) => source == stored.target_column,
            (MappingStatus::ManuallySet, Some(_)) => true,
            (MappingStatus::Suggested, None) => !stored.candidates.is_empty(),
            (MappingStatus::Unmapped, None) => true,
            _ => false,
        };
        if !consistent {
            return Err(MappingError::InconsistentEntry {
                column: stored.target_column,
            });
        }
        Ok(Self {
            target_column: stored.target_column,
            status: stored.status,
            chosen_source_column: stored.chosen_source_column,
            candidates: stored.candidates,
        })
    }
}

impl MappingEntry {
    pub fn target_column(&self) -> &str {
        &self.target_column
    }

    pub fn status(&self) -> MappingStatus {
        self.status
    }

    pub fn chosen_source_column(&self) -> Option<&str> {
        self.chosen_source_column.as_deref()
    }

    /// Ranked fuzzy candidates, best first. Empty for exact matches.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn top_candidate(&self) -> Option<&Candidate> {
        self.candidates.first()
    }
}

/// Builds mappings from a pair of headers.
#[derive(Debug, Clone, Default)]
pub struct MappingResolver {
    options: MatchOptions,
}

impl MappingResolver {
    pub fn new(options: MatchOptions) -> Self {
        Self { options }
    }

    /// Produces the initial mapping of every target column.
    ///
    /// A target column whose name appears verbatim in `source_header` is
    /// `Exact`. Otherwise the best `limit` source columns are ranked and those
    /// scoring at least `threshold` are kept: the entry is `Suggested` when any
    /// remain, `Unmapped` when none do. Suggestions are never applied
    /// automatically.
    ///
    /// Fails with [`MappingError::DuplicateColumn`] if either header repeats a
    /// name.
    pub fn resolve<S, T>(&self, source_header: &[S], target_header: &[T]) -> Result<Mapping>
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        if let Some(column) =
            first_duplicate(target_header).or_else(|| first_duplicate(source_header))
        {
            return Err(MappingError::DuplicateColumn {
                column: column.to_string(),
            });
        }

        let source_columns: Vec<String> = source_header
            .iter()
            .map(|c| c.as_ref().to_string())
            .collect();

        let entries = target_header
            .iter()
            .map(|target| self.resolve_column(target.as_ref(), &source_columns))
            .collect();

        Ok(Mapping {
            source_columns,
            entries,
        })
    }

    fn resolve_column(&self, target: &str, source_columns: &[String]) -> MappingEntry {
        if source_columns.iter().any(|c| c == target) {
            tracing::debug!(target_column = target, "exact column match");
            return MappingEntry {
                target_column: target.to_string(),
                status: MappingStatus::Exact,
                chosen_source_column: Some(target.to_string()),
                candidates: Vec::new(),
            };
        }

        let candidates: Vec<Candidate> = if self.options.fuzzy {
            top_k(target, source_columns, self.options.limit)
                .into_iter()
                .filter(|c| c.score >= self.options.threshold)
                .collect()
        } else {
            Vec::new()
        };

        let status = if candidates.is_empty() {
            MappingStatus::Unmapped
        } else {
            MappingStatus::Suggested
        };
        tracing::debug!(
            target_column = target,
            status = status.as_str(),
            candidates = candidates.len(),
            "no exact column match"
        );

        MappingEntry {
            target_column: target.to_string(),
            status,
            chosen_source_column: None,
            candidates,
        }
    }
}

/// Builds the initial mapping with [`MatchOptions::default`].
pub fn build_initial_mapping<S, T>(source_header: &[S], target_header: &[T]) -> Result<Mapping>
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    MappingResolver::default().resolve(source_header, target_header)
}

/// Mapping of every target column, plus the source header it was built from.
///
/// Deserialization checks the same invariants the resolver guarantees: unique
/// column names on both sides and chosen columns drawn from the source header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredMapping")]
pub struct Mapping {
    source_columns: Vec<String>,
    entries: Vec<MappingEntry>,
}

#[derive(Deserialize)]
struct StoredMapping {
    source_columns: Vec<String>,
    entries: Vec<MappingEntry>,
}

impl TryFrom<StoredMapping> for Mapping {
    type Error = MappingError;

    fn try_from(stored: StoredMapping) -> Result<Self> {
        let targets: Vec<&str> = stored
            .entries
            .iter()
            .map(|e| e.target_column.as_str())
            .collect();
        if let Some(column) =
            first_duplicate(&targets).or_else(|| first_duplicate(&stored.source_columns))
        {
            return Err(MappingError::DuplicateColumn {
                column: column.to_string(),
            });
        }
        for entry in &stored.entries {
            if let Some(source) = entry.chosen_source_column.as_deref()
                && !stored.source_columns.iter().any(|c| c == source)
            {
                return Err(MappingError::UnresolvedReference {
                    column: source.to_string(),
                });
            }
        }
        Ok(Self {
            source_columns: stored.source_columns,
            entries: stored.entries,
        })
    }
}

impl Mapping {
    /// Entries in target header order.
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn entry(&self, target_column: &str) -> Option<&MappingEntry> {
        self.entries
            .iter()
            .find(|e| e.target_column == target_column)
    }

    pub fn source_columns(&self) -> &[String] {
        &self.source_columns
    }

    pub fn target_columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.target_column.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sets or clears the source column of `target_column`.
    ///
    /// `Some(column)` marks the entry `ManuallySet`; `None` is the
    /// "no selection" choice and reverts the entry to `Unmapped`. Candidates
    /// are kept either way. On error the mapping is left untouched.
    pub fn set_manual_mapping(
        &mut self,
        target_column: &str,
        source_column: Option<&str>,
    ) -> Result<()> {
        let idx = self.index_of(target_column)?;
        if let Some(column) = source_column
            && !self.source_columns.iter().any(|c| c == column)
        {
            return Err(MappingError::UnresolvedReference {
                column: column.to_string(),
            });
        }

        let entry = &mut self.entries[idx];
        match source_column {
            Some(column) => {
                entry.status = MappingStatus::ManuallySet;
                entry.chosen_source_column = Some(column.to_string());
            }
            None => {
                entry.status = MappingStatus::Unmapped;
                entry.chosen_source_column = None;
            }
        }
        tracing::debug!(
            target_column,
            source_column = source_column.unwrap_or("-"),
            "manual mapping applied"
        );
        Ok(())
    }

    /// Chooses the best candidate of `target_column` as its source column.
    ///
    /// Returns `false` when the entry has no candidates.
    pub fn accept_suggestion(&mut self, target_column: &str) -> Result<bool> {
        let idx = self.index_of(target_column)?;
        let Some(best) = self.entries[idx].top_candidate().map(|c| c.name.clone()) else {
            return Ok(false);
        };
        self.set_manual_mapping(target_column, Some(&best))?;
        Ok(true)
    }

    /// Accepts the best candidate of every `Suggested` entry.
    ///
    /// Returns the number of entries changed.
    pub fn accept_all_suggestions(&mut self) -> usize {
        let mut accepted = 0;
        for entry in &mut self.entries {
            if entry.status != MappingStatus::Suggested {
                continue;
            }
            if let Some(best) = entry.candidates.first() {
                entry.chosen_source_column = Some(best.name.clone());
                entry.status = MappingStatus::ManuallySet;
                accepted += 1;
            }
        }
        accepted
    }

    /// Counts of entries per status.
    pub fn summary(&self) -> MappingSummary {
        let count = |status: MappingStatus| {
            self.entries
                .iter()
                .filter(|e| e.status == status)
                .count()
        };
        MappingSummary {
            total: self.entries.len(),
            exact: count(MappingStatus::Exact),
            suggested: count(MappingStatus::Suggested),
            unmapped: count(MappingStatus::Unmapped),
            manual: count(MappingStatus::ManuallySet),
        }
    }

    /// Consumes the mapping, keeping only entries with a chosen source column.
    ///
    /// Suggested entries that were never resolved and unmapped entries are
    /// dropped: those target columns receive no data from the source.
    pub fn finalize(self) -> FinalMapping {
        self.entries
            .into_iter()
            .filter_map(|e| e.chosen_source_column.map(|s| (e.target_column, s)))
            .collect()
    }

    fn index_of(&self, target_column: &str) -> Result<usize> {
        self.entries
            .iter()
            .position(|e| e.target_column == target_column)
            .ok_or_else(|| MappingError::UnknownTarget {
                column: target_column.to_string(),
            })
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            let source = entry.chosen_source_column().unwrap_or("(none)");
            write!(f, "{} <- {} [{}", entry.target_column, source, entry.status)?;
            if entry.status == MappingStatus::Suggested {
                let ranked = entry
                    .candidates
                    .iter()
                    .map(|c| format!("{} {}", c.name, c.score))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, ": {ranked}")?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

/// Summary of mapping counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingSummary {
    /// Number of target columns.
    pub total: usize,
    pub exact: usize,
    pub suggested: usize,
    pub unmapped: usize,
    /// Entries resolved by the caller.
    pub manual: usize,
}

impl MappingSummary {
    /// Target columns that will receive source data after finalization.
    pub fn resolved(&self) -> usize {
        self.exact + self.manual
    }
}
