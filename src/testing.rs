//! Test helpers for building inputs and asserting over row sequences.
//!
//! Mirrors the shape of ironbeam's `testing` module (assertions + debug
//! inspectors) scaled down to this crate's one data type, [`Row`].

use crate::row::Row;
use crate::sequence::{from_rows, RowIter};
use anyhow::Result;
use std::collections::HashMap;

/// Build a boxed row sequence from a literal `Vec<Row>`, for feeding a
/// [`crate::graph::NamedInputs`] factory or a stage function directly.
pub fn rows_from(rows: Vec<Row>) -> RowIter {
    from_rows(rows)
}

/// Drain a [`RowIter`], propagating the first error encountered.
pub fn collect_rows(rows: RowIter) -> Result<Vec<Row>> {
    rows.collect()
}

/// Assert that two row sequences contain the same rows, in the same order.
///
/// # Panics
///
/// Panics with both sequences printed if they differ in length or content.
pub fn assert_rows_eq(actual: &[Row], expected: &[Row]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "row count mismatch:\n  expected: {expected:?}\n  actual:   {actual:?}"
    );
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert_eq!(a, e, "row mismatch at index {i}:\n  expected: {e:?}\n  actual:   {a:?}");
    }
}

/// Assert that two row sequences contain the same multiset of rows,
/// ignoring order.
///
/// `Row` has no `Hash` impl (JSON values don't generally admit one), so
/// this compares canonical JSON-serialized forms instead of building a set.
///
/// # Panics
///
/// Panics with both sequences printed if the multisets differ.
pub fn assert_rows_unordered_eq(actual: &[Row], expected: &[Row]) {
    let mut actual_keys: Vec<String> = actual.iter().map(canonical).collect();
    let mut expected_keys: Vec<String> = expected.iter().map(canonical).collect();
    actual_keys.sort();
    expected_keys.sort();

    if actual_keys != expected_keys {
        panic!(
            "row multiset mismatch:\n  expected: {expected:?}\n  actual:   {actual:?}"
        );
    }
}

fn canonical(row: &Row) -> String {
    let mut entries: Vec<(&String, String)> = row.iter().map(|(k, v)| (k, v.to_string())).collect();
    entries.sort();
    format!("{entries:?}")
}

/// Print up to the first 10 rows of a sequence to stderr, labeled, and
/// return them unconsumed for further inspection. For use in tests only --
/// this crate carries no logging crate, matching the teacher, which has
/// none either.
pub fn debug_rows(label: &str, rows: &[Row]) {
    eprintln!("[debug: {label}] {} row(s)", rows.len());
    for (i, row) in rows.iter().take(10).enumerate() {
        eprintln!("[debug: {label}] [{i}]: {row:?}");
    }
    if rows.len() > 10 {
        eprintln!("[debug: {label}] ... ({} more)", rows.len() - 10);
    }
}

/// Print the row count of a sequence to stderr, labeled.
pub fn debug_count(label: &str, rows: &[Row]) {
    eprintln!("[debug: {label}] count: {}", rows.len());
}

/// Build a [`crate::graph::NamedInputs`] map from literal row vectors, for
/// tests that don't need a real file or streaming source.
pub fn named_inputs(entries: Vec<(&str, Vec<Row>)>) -> crate::stage::NamedInputs {
    let mut inputs: crate::stage::NamedInputs = HashMap::new();
    for (name, rows) in entries {
        let rows = std::sync::Arc::new(rows);
        inputs.insert(name.to_string(), std::sync::Arc::new(move || from_rows((*rows).clone())));
    }
    inputs
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(n: i64) -> Row {
        let mut r = Row::new();
        r.insert("n".into(), json!(n));
        r
    }

    #[test]
    fn unordered_eq_ignores_order() {
        assert_rows_unordered_eq(&[row(1), row(2)], &[row(2), row(1)]);
    }

    #[test]
    #[should_panic]
    fn unordered_eq_panics_on_multiset_mismatch() {
        assert_rows_unordered_eq(&[row(1), row(1)], &[row(1), row(2)]);
    }
}
