// tests/sort.rs
use anyhow::Result;
use rowgraph::row::Row;
use rowgraph::sequence::from_rows;
use rowgraph::sort::ExternalSort;
use serde_json::json;

fn row_with(n: i64) -> Row {
    let mut r = Row::new();
    r.insert("k".into(), json!(n));
    r
}

#[test]
fn sorts_without_spilling() {
    let rows = vec![row_with(3), row_with(1), row_with(2)];
    let sorted: Vec<Row> = ExternalSort::default()
        .sort(from_rows(rows), &["k".to_string()], false)
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();
    let ks: Vec<i64> = sorted.iter().map(|r| r["k"].as_i64().unwrap()).collect();
    assert_eq!(ks, vec![1, 2, 3]);
}

#[test]
fn sorts_with_spilling_and_is_a_permutation() {
    let rows: Vec<Row> = (0..50).rev().map(row_with).collect();
    let sorted: Vec<Row> = ExternalSort::with_buffer_rows(5)
        .sort(from_rows(rows), &["k".to_string()], false)
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();
    let ks: Vec<i64> = sorted.iter().map(|r| r["k"].as_i64().unwrap()).collect();
    let expected: Vec<i64> = (0..50).collect();
    assert_eq!(ks, expected);
    assert!(ks.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn reverse_sorts_descending() {
    let rows: Vec<Row> = (0..20).map(row_with).collect();
    let sorted: Vec<Row> = ExternalSort::with_buffer_rows(4)
        .sort(from_rows(rows), &["k".to_string()], true)
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();
    let ks: Vec<i64> = sorted.iter().map(|r| r["k"].as_i64().unwrap()).collect();
    assert!(ks.windows(2).all(|w| w[0] >= w[1]));
}
