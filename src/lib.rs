//! # rowgraph
//!
//! A library for building and executing **computational graphs** over lazy
//! streams of dynamically-typed rows. A [`Graph`] is a declarative pipeline —
//! map, reduce, sort, and join stages over one or more inputs — built by
//! chaining calls on a source, then executed on concrete inputs with `run`.
//!
//! ## Key properties
//!
//! - **Batch, out-of-core, single-threaded.** Rows flow through the graph as
//!   lazy, pull-based sequences; only [`Sort`](stage::Stage::Sort) ever
//!   materializes more than one group at a time, and it spills to disk when
//!   its in-memory buffer fills.
//! - **Dynamically-typed rows.** A [`Row`] is a mapping from column name to
//!   value; no schema is declared, and operators read only the columns they
//!   need.
//! - **Three operator capabilities.** [`Mapper`] (row → 0..N rows),
//!   [`Reducer`] (one group's rows → 0..N rows), and [`Joiner`] (one matched
//!   key's two-sided groups → 0..N rows) are the whole row-level algebra;
//!   every non-structural stage is one of these three.
//!
//! ## Quick start
//!
//! ```
//! use rowgraph::graph::Graph;
//! use rowgraph::mappers::{FilterPunctuation, LowerCase, Split};
//! use rowgraph::reducers::Count;
//! use rowgraph::row::Row;
//! use rowgraph::testing::{collect_rows, named_inputs};
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut doc = Row::new();
//! doc.insert("text".into(), json!("hello, hello world"));
//!
//! let graph = Graph::from_named_input("docs")
//!     .map(FilterPunctuation::new("text"))
//!     .map(LowerCase::new("text"))
//!     .map(Split::new("text"))
//!     .sort(["text"], false)
//!     .reduce(Count::new("count"), ["text"]);
//!
//! let inputs = named_inputs(vec![("docs", vec![doc])]);
//! let rows = collect_rows(graph.run(&inputs)?)?;
//! assert_eq!(rows.len(), 2); // "hello" and "world"
//! # Ok(())
//! # }
//! ```
//!
//! ## Module map
//!
//! - [`row`] — the [`Row`]/[`Value`](row::Value) data model and comparators.
//! - [`sequence`] — [`RowIter`](sequence::RowIter) and the group-by-key utility.
//! - [`traits`] — [`Mapper`], [`Reducer`], [`Joiner`], and [`MaybeRow`](traits::MaybeRow).
//! - [`mappers`] / [`reducers`] / [`joiners`] — the standard operator library.
//! - [`sort`] — the disk-spilling external sort.
//! - [`stage`] — the stage alphabet and the sort-merge join driver.
//! - [`graph`] — the [`Graph`] builder and executor.
//! - [`testing`] — assertions and fixtures for exercising graphs in tests.

pub mod graph;
pub mod joiners;
pub mod mappers;
pub mod reducers;
pub mod row;
pub mod sequence;
pub mod sort;
pub mod stage;
pub mod testing;
pub mod traits;

pub use graph::Graph;
pub use row::{Row, Value};
pub use sequence::RowIter;
pub use traits::{Joiner, Mapper, MaybeRow, Reducer};
