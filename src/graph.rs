//! The `Graph` value type: an immutable, chainable pipeline description.
//!
//! Grounded on spec.md §3/§4.5. The original source (and ironbeam's
//! `Pipeline`) build a DAG behind a shared mutable handle so a planner can
//! later rewrite it; this spec has no planner, so `Graph` instead stores its
//! stage list and join sub-graphs as `Arc<[_]>` and grows by returning a new
//! value each time -- the cheapest way to get "downstream doesn't alias
//! upstream's stage list" for free.

use crate::row::Row;
use crate::sequence::RowIter;
use crate::stage::{self, NamedInputs, Stage};
use crate::traits::{Joiner, Mapper, Reducer};
use anyhow::{bail, Result};
use std::path::Path;
use std::sync::Arc;

/// An ordered pipeline of [`Stage`]s plus the right-hand sub-graphs feeding
/// its `Join` stages, in the same order as those `Join` stages appear.
///
/// Cloning a `Graph` is cheap (it only bumps `Arc` refcounts) and yields a
/// value that shares no mutable state with the original -- there is none.
#[derive(Clone)]
pub struct Graph {
    stages: Arc<[Stage]>,
    join_sources: Arc<[Graph]>,
}

impl Graph {
    /// Bind this graph's source to a named input the caller supplies at
    /// `run` time.
    pub fn from_named_input(name: impl Into<String>) -> Self {
        Self {
            stages: Arc::from(vec![Stage::ReadFromNamed(name.into())]),
            join_sources: Arc::from(Vec::new()),
        }
    }

    /// Bind this graph's source to a file, parsed line-by-line with `parser`.
    pub fn from_file(path: impl AsRef<Path>, parser: impl Fn(&str) -> Result<Row> + 'static) -> Self {
        Self {
            stages: Arc::from(vec![Stage::ReadFromFile {
                path: path.as_ref().to_path_buf(),
                parser: Arc::new(parser),
            }]),
            join_sources: Arc::from(Vec::new()),
        }
    }

    fn extended(&self, stage: Stage) -> Self {
        let mut stages = Vec::with_capacity(self.stages.len() + 1);
        stages.extend(self.stages.iter().cloned());
        stages.push(stage);
        Self {
            stages: Arc::from(stages),
            join_sources: Arc::clone(&self.join_sources),
        }
    }

    /// Append a `Map` stage.
    pub fn map(&self, mapper: impl Mapper + 'static) -> Self {
        self.extended(Stage::Map(Arc::new(mapper)))
    }

    /// Append a `Reduce` stage, grouping on `keys`.
    pub fn reduce(&self, reducer: impl Reducer + 'static, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extended(Stage::Reduce(Arc::new(reducer), keys.into_iter().map(Into::into).collect()))
    }

    /// Append a `Sort` stage over `keys`; `reverse` flips the total order.
    pub fn sort(&self, keys: impl IntoIterator<Item = impl Into<String>>, reverse: bool) -> Self {
        self.extended(Stage::Sort(keys.into_iter().map(Into::into).collect(), reverse))
    }

    /// Append a `Join` stage against `other`'s output, matched on `keys`.
    ///
    /// `other` is captured by value (itself just an `Arc` bundle), so this
    /// graph and `other` never share a mutable stage list.
    pub fn join(
        &self,
        joiner: impl Joiner + 'static,
        other: Graph,
        keys: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        let mut join_sources = Vec::with_capacity(self.join_sources.len() + 1);
        join_sources.extend(self.join_sources.iter().cloned());
        join_sources.push(other);

        let mut stages = Vec::with_capacity(self.stages.len() + 1);
        stages.extend(self.stages.iter().cloned());
        stages.push(Stage::Join(Arc::new(joiner), keys));

        Self {
            stages: Arc::from(stages),
            join_sources: Arc::from(join_sources),
        }
    }

    fn validate(&self) -> Result<()> {
        let Some(first) = self.stages.first() else {
            bail!("graph has no source stage");
        };
        if !first.is_source() {
            bail!("graph's first stage must be a source (ReadFromNamed/ReadFromFile)");
        }
        for stage in self.stages.iter().skip(1) {
            if stage.is_source() {
                bail!("source stages may only appear at index 0");
            }
        }
        let join_count = self.stages.iter().filter(|s| s.is_join()).count();
        if join_count != self.join_sources.len() {
            bail!(
                "graph has {join_count} Join stage(s) but {} join source(s)",
                self.join_sources.len()
            );
        }
        Ok(())
    }

    /// Execute this graph against `inputs`, returning the final row
    /// sequence. Does not mutate `self`; may be called more than once.
    pub fn run(&self, inputs: &NamedInputs) -> Result<RowIter> {
        self.validate()?;

        let mut current = stage::run_source(&self.stages[0], inputs)?;
        let mut join_index = 0;

        for s in self.stages.iter().skip(1) {
            current = match s {
                Stage::ReadFromNamed(_) | Stage::ReadFromFile { .. } => {
                    bail!("source stage found past index 0")
                }
                Stage::Map(mapper) => stage::run_map(current, Arc::clone(mapper)),
                Stage::Reduce(reducer, keys) => stage::run_reduce(current, Arc::clone(reducer), keys.clone()),
                Stage::Sort(keys, reverse) => stage::run_sort(current, keys.clone(), *reverse)?,
                Stage::Join(joiner, keys) => {
                    let right = self.join_sources[join_index].run(inputs)?;
                    join_index += 1;
                    stage::run_join(current, right, Arc::clone(joiner), keys.clone())
                }
            };
        }

        Ok(current)
    }
}
