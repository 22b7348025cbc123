// tests/sequence.rs
use rowgraph::row::Row;
use rowgraph::sequence::{from_rows, group_by};
use serde_json::json;

fn row(w: &str, n: i64) -> Row {
    let mut r = Row::new();
    r.insert("w".into(), json!(w));
    r.insert("n".into(), json!(n));
    r
}

#[test]
fn groups_consecutive_equal_keys() {
    let rows = vec![row("a", 1), row("a", 3), row("b", 2)];
    let groups: Vec<_> = group_by(from_rows(rows), &["w".to_string()])
        .map(|g| g.unwrap())
        .collect();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].rows.len(), 2);
    assert_eq!(groups[1].rows.len(), 1);
}

#[test]
fn empty_input_yields_no_groups() {
    let groups: Vec<_> = group_by(from_rows(vec![]), &["w".to_string()]).collect();
    assert!(groups.is_empty());
}
