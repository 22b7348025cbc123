//! Lazy row sequences and the group-by-consecutive-equal-keys utility.
//!
//! [`RowIter`] is the glue between stages: a finite, forward-only, single-pass
//! stream of rows. Unlike ironbeam's `Partition` (a boxed `Any` carrying a
//! fully materialized `Vec<T>`), a `RowIter` is pulled one row at a time --
//! this crate has no parallel runner to hand partitions to, so there is
//! nothing to gain from materializing early.

use crate::row::{compare_key_tuple, key_tuple, Row, Value};
use anyhow::Result;

/// A finite, forward-only, single-pass stream of rows.
///
/// Consumers may not assume a size and must not retain rows after yielding
/// them downstream. This is the only currency stages trade in.
pub type RowIter = Box<dyn Iterator<Item = Result<Row>>>;

/// Wrap any row iterator (infallible or not) as a boxed [`RowIter`].
pub fn boxed<I>(iter: I) -> RowIter
where
    I: Iterator<Item = Result<Row>> + 'static,
{
    Box::new(iter)
}

/// Wrap a plain `Vec<Row>` as a [`RowIter`] of `Ok` rows.
pub fn from_rows(rows: Vec<Row>) -> RowIter {
    boxed(rows.into_iter().map(Ok))
}

/// One maximal run of consecutive rows sharing the same group-key value.
pub struct Group {
    pub key: Vec<Value>,
    pub rows: Vec<Row>,
}

/// Partition a [`RowIter`] into maximal runs of consecutive rows that share
/// the same value tuple over `keys`.
///
/// This assumes the input is already sorted on `keys` (spec's contract for
/// `Reduce`/`Join` inputs); it does not re-sort. In debug builds it asserts
/// that each newly-seen key is not less than the previous group's key, which
/// is the "implementations may add a debug-mode check" allowance for the
/// otherwise-undetected ordering-violation error category.
///
/// Each group is materialized into a `Vec<Row>` bounded by that group's own
/// size (not the whole input), and is fully drained before the next group is
/// produced -- the iterator returned here only ever looks one row ahead.
pub struct GroupBy {
    inner: std::iter::Peekable<RowIter>,
    keys: Vec<String>,
    #[cfg(debug_assertions)]
    last_key: Option<Vec<Value>>,
}

pub fn group_by(rows: RowIter, keys: &[String]) -> GroupBy {
    GroupBy {
        inner: rows.peekable(),
        keys: keys.to_vec(),
        #[cfg(debug_assertions)]
        last_key: None,
    }
}

impl Iterator for GroupBy {
    type Item = Result<Group>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = match self.inner.next()? {
            Ok(row) => row,
            Err(e) => return Some(Err(e)),
        };
        let key = match key_tuple(&first, &self.keys) {
            Ok(k) => k,
            Err(e) => return Some(Err(e)),
        };

        #[cfg(debug_assertions)]
        {
            if let Some(prev) = &self.last_key {
                debug_assert!(
                    compare_key_tuple(prev, &key) != std::cmp::Ordering::Greater,
                    "group_by saw an out-of-order key: input to Reduce/Join must be pre-sorted on {:?}",
                    self.keys
                );
            }
        }

        let mut rows = vec![first];
        loop {
            let matches = match self.inner.peek() {
                Some(Ok(row)) => match key_tuple(row, &self.keys) {
                    Ok(k) => compare_key_tuple(&k, &key) == std::cmp::Ordering::Equal,
                    Err(_) => false,
                },
                _ => false,
            };
            if !matches {
                break;
            }
            match self.inner.next() {
                Some(Ok(row)) => rows.push(row),
                Some(Err(e)) => return Some(Err(e)),
                None => break,
            }
        }

        #[cfg(debug_assertions)]
        {
            self.last_key = Some(key.clone());
        }

        Some(Ok(Group { key, rows }))
    }
}

