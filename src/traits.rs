//! The three row-level operator traits, and the sentinel they share.
//!
//! Every stage in a [`crate::graph::Graph`] that isn't a structural one
//! (read/sort) is implemented in terms of one of these three traits. They're
//! the dynamically-typed-row analogue of ironbeam's `Transform<In, Out>`,
//! just narrowed to the one row shape this crate knows about.

use crate::row::Row;
use anyhow::Result;

/// A row produced by one side of a [`Joiner`], or the fact that no row on
/// that side matched the join key.
///
/// The original source represents "no matching row" with `None` mixed into
/// the same merged-dict the joiner also produces rows for, which makes the
/// no-match case indistinguishable from a present-but-empty row. `MaybeRow`
/// keeps the two cases nominally apart.
#[derive(Debug, Clone)]
pub enum MaybeRow {
    Present(Row),
    Absent,
}

impl MaybeRow {
    pub fn as_row(&self) -> Option<&Row> {
        match self {
            MaybeRow::Present(row) => Some(row),
            MaybeRow::Absent => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, MaybeRow::Present(_))
    }
}

/// Transforms a single input row into zero or more output rows.
///
/// Implementors must not assume anything about rows seen before or after the
/// one they're given -- that's what separates a `Mapper` from a [`Reducer`].
pub trait Mapper {
    fn map(&self, row: &Row) -> Result<Vec<Row>>;
}

/// Transforms one group of rows sharing a common key into zero or more
/// output rows.
///
/// `group_key` is the tuple of *column names* the rows were grouped on (the
/// `Reduce` stage's key list), not their values -- a reducer recovers the
/// shared values from any row in `rows` by looking them up under these
/// names, the same way `original_source/compgraph/operations.py`'s
/// reducers index `row[t]` for `t in group_key`. `rows` is every row in the
/// group, in input order; implementations may assume it is non-empty.
pub trait Reducer {
    fn reduce(&self, group_key: &[String], rows: &[Row]) -> Result<Vec<Row>>;
}

/// Transforms one pair of same-key groups, one from each side of a `Join`,
/// into zero or more output rows.
///
/// `join_key` is the tuple of column names the two sides were matched on.
/// The sort-merge driver passes a real matched group as a run of
/// `MaybeRow::Present`, and a one-sided miss as the single-element slice
/// `[MaybeRow::Absent]` -- never an empty slice, and never a mix of
/// `Present`/`Absent` within one side. Implementations decide from there
/// whether an absent side means "skip this key" (inner, one-sided outer) or
/// "pad with nulls" (the other side of an outer join).
pub trait Joiner {
    fn join(&self, join_key: &[String], left: &[MaybeRow], right: &[MaybeRow]) -> Result<Vec<Row>>;
}
