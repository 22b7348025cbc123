// tests/row.rs
use rowgraph::row::{column, compare_key_tuple, compare_values, Row};
use serde_json::json;
use std::cmp::Ordering;

#[test]
fn missing_column_reports_name() {
    let row = Row::new();
    let err = column(&row, "missing").unwrap_err();
    assert!(err.to_string().contains("missing"));
}

#[test]
fn number_comparison_is_total() {
    assert_eq!(compare_values(&json!(1), &json!(2)), Ordering::Less);
    assert_eq!(compare_values(&json!(2.5), &json!(2.5)), Ordering::Equal);
    assert_eq!(compare_values(&json!(3), &json!(2.5)), Ordering::Greater);
}

#[test]
fn key_tuple_lexicographic() {
    let a = vec![json!("a"), json!(1)];
    let b = vec![json!("a"), json!(2)];
    assert_eq!(compare_key_tuple(&a, &b), Ordering::Less);
}
