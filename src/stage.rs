//! The stage alphabet and the sort-merge join driver.
//!
//! Grounded on spec.md §4.4/§4.5 and `original_source/compgraph/operations.py`'s
//! `Read`/`Map`/`Reduce`/`Join` operation wrappers, generalized to operate on
//! [`crate::sequence::RowIter`] instead of Python generators.

use crate::row::{compare_key_tuple, Row};
use crate::sequence::{group_by, Group, GroupBy, RowIter};
use crate::sort::ExternalSort;
use crate::traits::{Joiner, Mapper, MaybeRow, Reducer};
use anyhow::{bail, Context, Result};
use std::collections::VecDeque;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

/// A single node in a [`crate::graph::Graph`]'s operator list.
#[derive(Clone)]
pub enum Stage {
    ReadFromNamed(String),
    ReadFromFile {
        path: PathBuf,
        parser: Arc<dyn Fn(&str) -> Result<Row>>,
    },
    Map(Arc<dyn Mapper>),
    Reduce(Arc<dyn Reducer>, Vec<String>),
    Sort(Vec<String>, bool),
    Join(Arc<dyn Joiner>, Vec<String>),
}

impl Stage {
    pub fn is_source(&self) -> bool {
        matches!(self, Stage::ReadFromNamed(_) | Stage::ReadFromFile { .. })
    }

    pub fn is_join(&self) -> bool {
        matches!(self, Stage::Join(..))
    }
}

/// The caller-supplied map from named input to a fresh row sequence
/// factory. A factory is called once per `run`, so the same `Graph` (and
/// the same `NamedInputs`) can be executed repeatedly.
pub type NamedInputs = std::collections::HashMap<String, Arc<dyn Fn() -> RowIter>>;

pub fn run_source(stage: &Stage, inputs: &NamedInputs) -> Result<RowIter> {
    match stage {
        Stage::ReadFromNamed(name) => {
            let factory = inputs
                .get(name)
                .with_context(|| format!("unknown named input {name:?}"))?;
            Ok(factory())
        }
        Stage::ReadFromFile { path, parser } => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening input file {}", path.display()))?;
            let parser = parser.clone();
            let path_display = path.display().to_string();
            Ok(Box::new(BufReader::new(file).lines().map(move |line| -> Result<Row> {
                let line = line.with_context(|| format!("reading line from {path_display}"))?;
                parser(&line)
            })))
        }
        _ => bail!("run_source called on a non-source stage"),
    }
}

pub fn run_map(input: RowIter, mapper: Arc<dyn Mapper>) -> RowIter {
    Box::new(input.flat_map(move |row| -> Vec<Result<Row>> {
        match row {
            Ok(row) => match mapper.map(&row) {
                Ok(rows) => rows.into_iter().map(Ok).collect(),
                Err(e) => vec![Err(e)],
            },
            Err(e) => vec![Err(e)],
        }
    }))
}

pub fn run_reduce(input: RowIter, reducer: Arc<dyn Reducer>, keys: Vec<String>) -> RowIter {
    let grouped = group_by(input, &keys);
    Box::new(grouped.flat_map(move |group| -> Vec<Result<Row>> {
        match group {
            Ok(group) => match reducer.reduce(&keys, &group.rows) {
                Ok(rows) => rows.into_iter().map(Ok).collect(),
                Err(e) => vec![Err(e)],
            },
            Err(e) => vec![Err(e)],
        }
    }))
}

pub fn run_sort(input: RowIter, keys: Vec<String>, reverse: bool) -> Result<RowIter> {
    ExternalSort::default().sort(input, &keys, reverse)
}

pub fn run_join(
    left: RowIter,
    right: RowIter,
    joiner: Arc<dyn Joiner>,
    keys: Vec<String>,
) -> RowIter {
    Box::new(JoinIter {
        left: group_by(left, &keys),
        right: group_by(right, &keys),
        joiner,
        keys,
        left_cur: None,
        right_cur: None,
        started: false,
        pending: VecDeque::new(),
        done: false,
    })
}

fn to_present(rows: &[Row]) -> Vec<MaybeRow> {
    rows.iter().cloned().map(MaybeRow::Present).collect()
}

fn absent_side() -> Vec<MaybeRow> {
    vec![MaybeRow::Absent]
}

/// Lazily drives a sort-merge join between two independently-grouped row
/// sequences, per spec's §4.4 two-cursor algorithm.
struct JoinIter {
    left: GroupBy,
    right: GroupBy,
    joiner: Arc<dyn Joiner>,
    keys: Vec<String>,
    left_cur: Option<Group>,
    right_cur: Option<Group>,
    started: bool,
    pending: VecDeque<Row>,
    done: bool,
}

impl JoinIter {
    fn advance_left(&mut self) -> Result<()> {
        self.left_cur = self.left.next().transpose()?;
        Ok(())
    }

    fn advance_right(&mut self) -> Result<()> {
        self.right_cur = self.right.next().transpose()?;
        Ok(())
    }

    fn step(&mut self) -> Result<bool> {
        if !self.started {
            self.advance_left()?;
            self.advance_right()?;
            self.started = true;
        }

        match (&self.left_cur, &self.right_cur) {
            (None, None) => {
                self.done = true;
                Ok(false)
            }
            (Some(l), None) => {
                let out = self.joiner.join(&self.keys, &to_present(&l.rows), &absent_side())?;
                self.pending.extend(out);
                self.advance_left()?;
                Ok(true)
            }
            (None, Some(r)) => {
                let out = self.joiner.join(&self.keys, &absent_side(), &to_present(&r.rows))?;
                self.pending.extend(out);
                self.advance_right()?;
                Ok(true)
            }
            (Some(l), Some(r)) => {
                match compare_key_tuple(&l.key, &r.key) {
                    std::cmp::Ordering::Equal => {
                        let out = self.joiner.join(&self.keys, &to_present(&l.rows), &to_present(&r.rows))?;
                        self.pending.extend(out);
                        self.advance_left()?;
                        self.advance_right()?;
                    }
                    std::cmp::Ordering::Less => {
                        let out = self.joiner.join(&self.keys, &to_present(&l.rows), &absent_side())?;
                        self.pending.extend(out);
                        self.advance_left()?;
                    }
                    std::cmp::Ordering::Greater => {
                        let out = self.joiner.join(&self.keys, &absent_side(), &to_present(&r.rows))?;
                        self.pending.extend(out);
                        self.advance_right()?;
                    }
                }
                Ok(true)
            }
        }
    }
}

impl Iterator for JoinIter {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(row) = self.pending.pop_front() {
                return Some(Ok(row));
            }
            if self.done {
                return None;
            }
            match self.step() {
                Ok(_) => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
