//! Word count, end to end: the graph from spec.md's Scenario A.
//!
//! Grounded on `original_source/compgraph/algorithms.py`'s `word_count_graph`.

use anyhow::Result;
use rowgraph::graph::Graph;
use rowgraph::mappers::{FilterPunctuation, LowerCase, Split};
use rowgraph::reducers::Count;
use rowgraph::row::Row;
use rowgraph::testing::{collect_rows, debug_rows, named_inputs};
use serde_json::json;

fn doc(text: &str) -> Row {
    let mut row = Row::new();
    row.insert("text".into(), json!(text));
    row
}

fn word_count_graph(input: &str, text_column: &str, count_column: &str) -> Graph {
    Graph::from_named_input(input)
        .map(FilterPunctuation::new(text_column))
        .map(LowerCase::new(text_column))
        .map(Split::new(text_column))
        .sort([text_column], false)
        .reduce(Count::new(count_column), [text_column])
        .sort([count_column, text_column], false)
}

fn main() -> Result<()> {
    let graph = word_count_graph("docs", "text", "count");
    let inputs = named_inputs(vec![(
        "docs",
        vec![doc("hello, world"), doc("Hello hello")],
    )]);

    let rows = collect_rows(graph.run(&inputs)?)?;
    debug_rows("word_count", &rows);
    for row in &rows {
        println!("{row}", row = serde_json::to_string(row)?);
    }
    Ok(())
}
