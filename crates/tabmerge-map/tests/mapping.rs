//! Integration tests for mapping construction and overrides.

use std::collections::BTreeSet;

use proptest::prelude::*;
use tabmerge_map::{Mapping, MappingError, MappingStatus, build_initial_mapping, top_k};

fn header(prefix: &str, names: &BTreeSet<String>) -> Vec<String> {
    names.iter().map(|n| format!("{prefix}{n}")).collect()
}

proptest! {
    #[test]
    fn disjoint_headers_have_no_exact_entries(
        source in prop::collection::btree_set("[a-z]{1,8}", 0..8),
        target in prop::collection::btree_set("[a-z]{1,8}", 0..8),
    ) {
        // Prefixes keep the two headers disjoint.
        let source = header("s", &source);
        let target = header("t", &target);
        let mapping = build_initial_mapping(&source, &target).unwrap();
        prop_assert_eq!(mapping.len(), target.len());
        prop_assert_eq!(mapping.summary().exact, 0);
    }

    #[test]
    fn shared_names_are_exact(
        shared in prop::collection::btree_set("[A-Za-z]{1,8}", 1..6),
        extra in prop::collection::btree_set("[0-9]{1,4}", 0..4),
    ) {
        let mut source: Vec<String> = extra.iter().cloned().collect();
        source.extend(shared.iter().cloned());
        let target: Vec<String> = shared.iter().cloned().collect();

        let mapping = build_initial_mapping(&source, &target).unwrap();
        for name in &shared {
            let entry = mapping.entry(name).unwrap();
            prop_assert_eq!(entry.status(), MappingStatus::Exact);
            prop_assert_eq!(entry.chosen_source_column(), Some(name.as_str()));
        }
    }

    #[test]
    fn top_k_is_deterministic(
        query in "[A-Za-z _-]{0,10}",
        candidates in prop::collection::vec("[A-Za-z _-]{0,10}", 0..10),
        k in 0usize..12,
    ) {
        let first = top_k(&query, &candidates, k);
        let second = top_k(&query, &candidates, k);
        prop_assert!(first.len() <= k);
        prop_assert!(first.windows(2).all(|w| w[0].score >= w[1].score));
        prop_assert!(first.iter().all(|c| c.score <= 100));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn finalize_never_contains_unmapped(
        source in prop::collection::btree_set("[a-c]{1,3}", 0..6),
        target in prop::collection::btree_set("[a-c]{1,3}", 0..6),
    ) {
        let source: Vec<String> = source.into_iter().collect();
        let target: Vec<String> = target.into_iter().collect();
        let mapping = build_initial_mapping(&source, &target).unwrap();
        let unresolved: Vec<String> = mapping
            .entries()
            .iter()
            .filter(|e| matches!(e.status(), MappingStatus::Unmapped | MappingStatus::Suggested))
            .map(|e| e.target_column().to_string())
            .collect();

        let final_mapping = mapping.finalize();
        for column in unresolved {
            prop_assert!(!final_mapping.contains_key(&column));
        }
    }

    #[test]
    fn manual_mapping_is_idempotent(
        source in prop::collection::btree_set("[a-z]{1,6}", 1..6),
        target in prop::collection::btree_set("[A-Z]{1,6}", 1..6),
        pick in any::<prop::sample::Index>(),
        clear in any::<bool>(),
    ) {
        let source: Vec<String> = source.into_iter().collect();
        let target: Vec<String> = target.into_iter().collect();
        let column = pick.get(&source).clone();
        let choice = if clear { None } else { Some(column.as_str()) };

        let mut once = build_initial_mapping(&source, &target).unwrap();
        once.set_manual_mapping(&target[0], choice).unwrap();
        let mut twice = once.clone();
        twice.set_manual_mapping(&target[0], choice).unwrap();
        prop_assert_eq!(once, twice);
    }
}

#[test]
fn exact_scenario() {
    let mapping = build_initial_mapping(&["Name", "Email", "Phone"], &["Name", "Email"]).unwrap();
    let columns: Vec<&str> = mapping.target_columns().collect();
    assert_eq!(columns, vec!["Name", "Email"]);
    for entry in mapping.entries() {
        assert_eq!(entry.status(), MappingStatus::Exact);
        assert_eq!(entry.chosen_source_column(), Some(entry.target_column()));
    }
}

#[test]
fn rendered_mapping_snapshot() {
    let mut mapping =
        build_initial_mapping(&["Id", "Email", "Zip"], &["Id", "E-mail", "Fax"]).unwrap();
    insta::assert_snapshot!(mapping.to_string(), @r"
    Id <- Id [exact]
    E-mail <- (none) [suggested: Email 100]
    Fax <- (none) [unmapped]
    ");

    mapping.set_manual_mapping("E-mail", Some("Email")).unwrap();
    insta::assert_snapshot!(mapping.to_string(), @r"
    Id <- Id [exact]
    E-mail <- Email [manual]
    Fax <- (none) [unmapped]
    ");
}

#[test]
fn mapping_serializes_statuses_in_snake_case() {
    let mapping = build_initial_mapping(&["Email"], &["E-mail"]).unwrap();
    let json = serde_json::to_value(&mapping).unwrap();
    assert_eq!(json["entries"][0]["status"], "suggested");
    assert_eq!(json["entries"][0]["candidates"][0]["name"], "Email");
    assert_eq!(json["source_columns"][0], "Email");
}

#[test]
fn mapping_round_trips_through_json() {
    let mut mapping =
        build_initial_mapping(&["Id", "Email", "Zip"], &["Id", "E-mail", "Fax"]).unwrap();
    mapping.set_manual_mapping("Fax", Some("Zip")).unwrap();

    let json = serde_json::to_string(&mapping).unwrap();
    let restored: Mapping = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, mapping);
}

#[test]
fn stored_mapping_with_inconsistent_entry_is_rejected() {
    let json = r#"{
        "source_columns": ["Email"],
        "entries": [
            {"target_column": "X", "status": "suggested", "chosen_source_column": "Email",
             "candidates": [{"name": "Email", "score": 70}]}
        ]
    }"#;
    let err = serde_json::from_str::<Mapping>(json).unwrap_err();
    assert!(err.to_string().contains("inconsistent mapping entry"), "{err}");
}

#[test]
fn stored_mapping_with_duplicate_target_is_rejected() {
    let json = r#"{
        "source_columns": ["Email"],
        "entries": [
            {"target_column": "X", "status": "unmapped", "chosen_source_column": null},
            {"target_column": "X", "status": "manually_set", "chosen_source_column": "Email"}
        ]
    }"#;
    let err = serde_json::from_str::<Mapping>(json).unwrap_err();
    assert!(err.to_string().contains("duplicate column name: X"), "{err}");
}

#[test]
fn stored_mapping_with_unknown_source_is_rejected() {
    let json = r#"{
        "source_columns": ["Email"],
        "entries": [
            {"target_column": "X", "status": "manually_set", "chosen_source_column": "Ghost"}
        ]
    }"#;
    let err = serde_json::from_str::<Mapping>(json).unwrap_err();
    assert!(err.to_string().contains("source column not found: Ghost"), "{err}");
}

#[test]
fn failed_override_is_all_or_nothing() {
    let mut mapping = build_initial_mapping(&["Name", "Email"], &["Name", "E-mail"]).unwrap();
    mapping.set_manual_mapping("E-mail", Some("Email")).unwrap();
    let before = mapping.clone();

    let err = mapping.set_manual_mapping("E-mail", Some("Nope")).unwrap_err();
    assert!(matches!(err, MappingError::UnresolvedReference { .. }));
    assert_eq!(mapping, before);
}
