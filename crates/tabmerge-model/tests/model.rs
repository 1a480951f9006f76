//! Tests for tabmerge-model types.

use tabmerge_model::{CellValue, Row, Table};

#[test]
fn table_serializes() {
    let table = Table::with_rows(
        vec!["Name".to_string(), "Score".to_string()],
        vec![Row::from_pairs([
            ("Name", CellValue::text("Ada")),
            ("Score", CellValue::Number(9.5)),
        ])],
    )
    .expect("unique columns");

    let json = serde_json::to_string(&table).expect("serialize table");
    let round: Table = serde_json::from_str(&json).expect("deserialize table");
    assert_eq!(round, table);
}

#[test]
fn cell_value_uses_tagged_representation() {
    let json = serde_json::to_value(CellValue::text("a")).expect("serialize cell");
    assert_eq!(json, serde_json::json!({"kind": "Text", "value": "a"}));

    let blank = serde_json::to_value(CellValue::Blank).expect("serialize blank");
    assert_eq!(blank, serde_json::json!({"kind": "Blank"}));
}

#[test]
fn rows_keep_insertion_order_of_table() {
    let mut table = Table::new(vec!["Id".to_string()]).expect("unique columns");
    for id in ["3", "1", "2"] {
        table.push_row(Row::from_pairs([("Id", CellValue::text(id))]));
    }
    let ids: Vec<String> = table.rows().iter().map(|r| r.get("Id").to_string()).collect();
    assert_eq!(ids, vec!["3", "1", "2"]);
}

#[test]
fn deserializing_duplicate_header_fails() {
    let err = serde_json::from_str::<Table>(r#"{"columns":["Name","Name"],"rows":[]}"#)
        .expect_err("duplicate header must be rejected");
    assert!(err.to_string().contains("duplicate column name: Name"), "{err}");
}
