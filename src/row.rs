//! The universal data unit and the comparator it needs for sorting/grouping.
//!
//! A [`Row`] is a mapping from column name to [`Value`]. No schema is declared;
//! operators read only the columns they need and write by name. Missing keys on
//! read are a programming error -- [`column`] surfaces that as a contextual
//! [`anyhow::Error`] rather than a panic, the way ironbeam's `io.rs` wraps file
//! and parse failures with `anyhow::Context`.

use anyhow::{anyhow, Result};
use std::cmp::Ordering;

/// A mapping from column name to dynamically-typed value.
///
/// Backed by `serde_json::Map` with the `preserve_order` feature, so columns
/// keep insertion order -- this is what lets [`crate::mappers::Project`] emit
/// columns in exactly the order it was asked for.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// A scalar, string, boolean, null, or homogeneous list-of-number column value.
pub type Value = serde_json::Value;

/// Look up a required column, or fail with a message naming the row and column.
///
/// Every mapper/reducer/joiner in this crate reads columns through this
/// function (or [`column_owned`]) so "missing column" errors look the same
/// everywhere, per spec's row-shape error category.
pub fn column<'a>(row: &'a Row, name: &str) -> Result<&'a Value> {
    row.get(name)
        .ok_or_else(|| anyhow!("missing required column {name:?} in row {row:?}"))
}

/// Same as [`column`], but clones the value out.
pub fn column_owned(row: &Row, name: &str) -> Result<Value> {
    column(row, name).map(Clone::clone)
}

/// Read a column as a string.
pub fn column_str<'a>(row: &'a Row, name: &str) -> Result<&'a str> {
    column(row, name)?
        .as_str()
        .ok_or_else(|| anyhow!("column {name:?} is not a string in row {row:?}"))
}

/// Read a column as an `f64`, accepting any JSON number.
pub fn column_f64(row: &Row, name: &str) -> Result<f64> {
    column(row, name)?
        .as_f64()
        .ok_or_else(|| anyhow!("column {name:?} is not numeric in row {row:?}"))
}

/// Build the group-key value (ordered tuple of column values) for a row.
pub fn key_tuple(row: &Row, keys: &[String]) -> Result<Vec<Value>> {
    keys.iter().map(|k| column_owned(row, k)).collect()
}

/// Total order over a single [`Value`].
///
/// JSON's value space isn't `Ord` by default (floats aren't totally ordered,
/// and the variants have no inherent ranking), so this defines one: `Null` <
/// `Bool` < `Number` < `String` < `Array` < `Object`, and within a variant the
/// natural comparison, with floats compared via `f64::total_cmp` -- the same
/// trick as ironbeam's `utils::OrdF64`, inlined here instead of wrapping every
/// number in a newtype.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    use serde_json::Value as V;
    fn rank(v: &Value) -> u8 {
        match v {
            V::Null => 0,
            V::Bool(_) => 1,
            V::Number(_) => 2,
            V::String(_) => 3,
            V::Array(_) => 4,
            V::Object(_) => 5,
        }
    }
    match (a, b) {
        (V::Null, V::Null) => Ordering::Equal,
        (V::Bool(x), V::Bool(y)) => x.cmp(y),
        (V::Number(x), V::Number(y)) => x.as_f64().unwrap_or(f64::NAN).total_cmp(&y.as_f64().unwrap_or(f64::NAN)),
        (V::String(x), V::String(y)) => x.cmp(y),
        (V::Array(x), V::Array(y)) => {
            for (xi, yi) in x.iter().zip(y.iter()) {
                match compare_values(xi, yi) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
            x.len().cmp(&y.len())
        }
        (V::Object(x), V::Object(y)) => {
            for (xk, xv) in x.iter() {
                match y.get(xk) {
                    Some(yv) => match compare_values(xv, yv) {
                        Ordering::Equal => continue,
                        other => return other,
                    },
                    None => return Ordering::Greater,
                }
            }
            x.len().cmp(&y.len())
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Total order over a key tuple: lexicographic over [`compare_values`].
pub fn compare_key_tuple(a: &[Value], b: &[Value]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match compare_values(x, y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

