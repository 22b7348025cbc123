// tests/reducers.rs
use rowgraph::reducers::{Count, TermFrequency, TopN};
use rowgraph::row::{Row, Value};
use rowgraph::traits::Reducer;
use serde_json::json;

fn row_with(pairs: &[(&str, Value)]) -> Row {
    let mut r = Row::new();
    for (k, v) in pairs {
        r.insert((*k).to_string(), v.clone());
    }
    r
}

#[test]
fn count_counts_group_rows() {
    let rows = vec![row_with(&[("w", json!("a"))]), row_with(&[("w", json!("a"))])];
    let out = Count::new("count").reduce(&["w".to_string()], &rows).unwrap();
    assert_eq!(out[0]["count"], json!(2));
    assert_eq!(out[0]["w"], json!("a"));
}

#[test]
fn top_n_keeps_largest_values_in_arrival_order() {
    let rows: Vec<Row> = [5, 1, 4, 2, 3].iter().map(|n| row_with(&[("result", json!(n))])).collect();
    let out = TopN::new("result", 2).reduce(&[], &rows).unwrap();
    let values: Vec<i64> = out.iter().map(|r| r["result"].as_i64().unwrap()).collect();
    assert_eq!(values.len(), 2);
    assert!(values.contains(&5));
    assert!(values.contains(&4));
}

#[test]
fn term_frequency_sums_to_one() {
    let rows = vec![
        row_with(&[("doc", json!(1)), ("word", json!("a"))]),
        row_with(&[("doc", json!(1)), ("word", json!("a"))]),
        row_with(&[("doc", json!(1)), ("word", json!("b"))]),
    ];
    let out = TermFrequency::new("word", "tf").reduce(&["doc".to_string()], &rows).unwrap();
    let total: f64 = out.iter().map(|r| r["tf"].as_f64().unwrap()).sum();
    assert!((total - 1.0).abs() < 1e-9);
}
