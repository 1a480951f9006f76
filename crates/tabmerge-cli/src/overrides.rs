//! Manual mapping overrides from the command line and mapping files.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use tabmerge_map::Mapping;

/// One manual choice: `source` of `None` clears the target's mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnOverride {
    pub target: String,
    pub source: Option<String>,
}

impl ColumnOverride {
    pub fn set(target: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            source: Some(source.into()),
        }
    }

    pub fn clear(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            source: None,
        }
    }
}

impl fmt::Display for ColumnOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}={}", self.target, source),
            None => write!(f, "{}=", self.target),
        }
    }
}

/// Parses a `TARGET=SOURCE` flag value.
///
/// The value is split at the first `=`. An empty `SOURCE` clears the target.
pub fn parse_override(raw: &str) -> std::result::Result<ColumnOverride, String> {
    let Some((target, source)) = raw.split_once('=') else {
        return Err(format!("expected TARGET=SOURCE, got '{raw}'"));
    };
    let target = target.trim();
    if target.is_empty() {
        return Err(format!("missing target column in '{raw}'"));
    }
    let source = source.trim();
    if source.is_empty() {
        Ok(ColumnOverride::clear(target))
    } else {
        Ok(ColumnOverride::set(target, source))
    }
}

/// Loads overrides from a JSON object of target column to source column.
///
/// A `null` source clears the target. Entries are returned in target name
/// order.
pub fn load_mapping_file(path: &Path) -> Result<Vec<ColumnOverride>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read mapping file {}", path.display()))?;
    let raw: BTreeMap<String, Option<String>> = serde_json::from_str(&content)
        .with_context(|| format!("parse mapping file {}", path.display()))?;
    Ok(raw
        .into_iter()
        .map(|(target, source)| ColumnOverride { target, source })
        .collect())
}

/// Applies overrides in order. Stops at the first rejected override.
pub fn apply_overrides(mapping: &mut Mapping, overrides: &[ColumnOverride]) -> Result<()> {
    for entry in overrides {
        mapping
            .set_manual_mapping(&entry.target, entry.source.as_deref())
            .with_context(|| format!("apply mapping override {entry}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_set_and_clear() {
        assert_eq!(
            parse_override("E-mail=Email").unwrap(),
            ColumnOverride::set("E-mail", "Email")
        );
        assert_eq!(
            parse_override(" Phone = ").unwrap(),
            ColumnOverride::clear("Phone")
        );
        assert_eq!(
            parse_override("a=b=c").unwrap(),
            ColumnOverride::set("a", "b=c")
        );
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(parse_override("Email").is_err());
        assert!(parse_override("=Email").is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for raw in ["E-mail=Email", "Phone="] {
            assert_eq!(parse_override(raw).unwrap().to_string(), raw);
        }
    }
}
