//! Fuzzy similarity scoring between column names.
//!
//! Uses Jaro-Winkler similarity on normalized names. Two normal forms are
//! compared, one with separators collapsed to single spaces and one with
//! them removed, so `E-mail`, `e_mail` and `Email` all score as identical.

use rapidfuzz::distance::jaro_winkler;
use serde::{Deserialize, Serialize};

/// Highest possible score; returned for names equal after normalization.
pub const MAX_SCORE: u8 = 100;

/// A source column ranked against a target column name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Source column name.
    pub name: String,
    /// Similarity score (0 to 100).
    pub score: u8,
}

/// Scores the similarity of two column names on a 0 to 100 scale.
///
/// Case, surrounding whitespace and the separators `_ - . / \` are ignored.
/// The result is symmetric and depends only on the two inputs.
pub fn score(a: &str, b: &str) -> u8 {
    let left = normalize(a);
    let right = normalize(b);
    if left.is_empty() || right.is_empty() {
        return if left.is_empty() && right.is_empty() {
            MAX_SCORE
        } else {
            0
        };
    }
    if left == right {
        return MAX_SCORE;
    }

    let spaced = jaro_winkler::similarity(left.chars(), right.chars());
    let compact = jaro_winkler::similarity(compact(&left).chars(), compact(&right).chars());
    to_percent(spaced.max(compact))
}

/// Returns the `k` best-scoring candidates for `query`, highest first.
///
/// Ties keep the order in which candidates appear in `candidates`.
pub fn top_k<S: AsRef<str>>(query: &str, candidates: &[S], k: usize) -> Vec<Candidate> {
    if k == 0 {
        return Vec::new();
    }
    let mut scored: Vec<Candidate> = candidates
        .iter()
        .map(|name| Candidate {
            name: name.as_ref().to_string(),
            score: score(query, name.as_ref()),
        })
        .collect();
    // Stable sort: equal scores stay in input order.
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(k);
    scored
}

/// Normalizes a column name by lowercasing and replacing separators with spaces.
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['_', '-', '.', '/', '\\'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn compact(normalized: &str) -> String {
    normalized.chars().filter(|c| !c.is_whitespace()).collect()
}

fn to_percent(similarity: f64) -> u8 {
    let scaled = (similarity * f64::from(MAX_SCORE)).round();
    scaled.clamp(0.0, f64::from(MAX_SCORE)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_after_normalization_scores_max() {
        assert_eq!(score("Email", "email"), 100);
        assert_eq!(score("  First Name ", "first_name"), 100);
        assert_eq!(score("E-mail", "Email"), 100);
    }

    #[test]
    fn unrelated_names_score_low() {
        let s = score("Phone", "Name");
        assert!(s < 60, "expected low score, got {s}");
    }

    #[test]
    fn similar_names_score_high() {
        let s = score("Phone Number", "Phone No");
        assert!(s >= 80, "expected high score, got {s}");
    }

    #[test]
    fn score_is_symmetric() {
        for (a, b) in [("Zip", "Postcode"), ("Cust_ID", "CustomerId"), ("Date", "DOB")] {
            assert_eq!(score(a, b), score(b, a), "{a} vs {b}");
        }
    }

    #[test]
    fn empty_names() {
        assert_eq!(score("", "  "), 100);
        assert_eq!(score("", "Name"), 0);
        assert_eq!(score("--", "Name"), 0);
    }

    #[test]
    fn top_k_orders_by_score_then_input_order() {
        let candidates = ["Mail", "Email", "E_mail", "Phone"];
        let top = top_k("E-mail", &candidates, 5);
        assert_eq!(top.len(), 4);
        assert_eq!(top[0].name, "Email");
        assert_eq!(top[1].name, "E_mail");
        assert_eq!(top[0].score, 100);
        assert_eq!(top[1].score, 100);
        assert!(top.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn top_k_truncates() {
        let candidates = ["a", "b", "c"];
        assert_eq!(top_k("a", &candidates, 2).len(), 2);
        assert!(top_k("a", &candidates, 0).is_empty());
        assert!(top_k::<&str>("a", &[], 3).is_empty());
    }

    #[test]
    fn normalize_collapses_separators() {
        assert_eq!(normalize("  Customer__ID.no "), "customer id no");
        assert_eq!(normalize("A/B\\C"), "a b c");
    }
}
