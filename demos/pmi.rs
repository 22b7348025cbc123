//! Pointwise mutual information: for every document, its top 10 words
//! ranked by how much more often they appear in that document than across
//! the whole corpus.
//!
//! Grounded on `original_source/compgraph/algorithms.py`'s `pmi_graph`.

use anyhow::{anyhow, Result};
use rowgraph::graph::Graph;
use rowgraph::joiners::InnerJoiner;
use rowgraph::mappers::{Filter, FilterPunctuation, Function, LowerCase, Product, Project, Split};
use rowgraph::reducers::{Count, TermFrequency, TopN};
use rowgraph::row::{Row, Value};
use rowgraph::testing::{collect_rows, debug_rows, named_inputs};
use serde_json::json;

fn doc(doc_id: i64, text: &str) -> Row {
    let mut row = Row::new();
    row.insert("doc_id".into(), json!(doc_id));
    row.insert("text".into(), json!(text));
    row
}

fn reciprocal(v: &Value) -> Result<Value> {
    let n = v.as_f64().ok_or_else(|| anyhow!("reciprocal expects a number"))?;
    Ok(Value::from(1.0 / n))
}

fn ln(v: &Value) -> Result<Value> {
    let n = v.as_f64().ok_or_else(|| anyhow!("ln expects a number"))?;
    Ok(Value::from(n.ln()))
}

fn pmi_graph(input: &str, doc_column: &str, text_column: &str, result_column: &str) -> Graph {
    let source = Graph::from_named_input(input);

    let split_word = source
        .map(FilterPunctuation::new(text_column))
        .map(LowerCase::new(text_column))
        .map(Split::new(text_column));

    let text_col_for_filter = text_column.to_string();
    let filtered = split_word
        .sort([doc_column, text_column], false)
        .reduce(Count::new("word_count"), [doc_column, text_column])
        .map(Filter::new(move |row: &Row| {
            row.get(&text_col_for_filter)
                .and_then(|v| v.as_str())
                .map(|s| s.chars().count() > 4)
                .unwrap_or(false)
        }))
        .map(Filter::new(|row: &Row| row.get("word_count").and_then(|v| v.as_i64()).unwrap_or(0) >= 2));

    let tf_in_doc = filtered.reduce(TermFrequency::with_count_column(text_column, "tf_in_doc", "word_count"), [doc_column]);

    let tf_in_all_docs = filtered.reduce(
        TermFrequency::with_count_column(text_column, "tf_in_all_docs", "word_count"),
        Vec::<String>::new(),
    );

    tf_in_doc
        .join(InnerJoiner::default(), tf_in_all_docs, [text_column])
        .map(Function::new("tf_in_all_docs", reciprocal))
        .map(Product::new(vec!["tf_in_doc".into(), "tf_in_all_docs".into()], result_column))
        .map(Function::new(result_column, ln))
        .map(Project::new(vec![result_column.into(), doc_column.into(), text_column.into()]))
        .sort([text_column], false)
        .sort([result_column], true)
        .sort([doc_column], false)
        .reduce(TopN::new(result_column, 10), [doc_column])
}

fn main() -> Result<()> {
    let graph = pmi_graph("docs", "doc_id", "text", "pmi");
    let inputs = named_inputs(vec![(
        "docs",
        vec![
            doc(1, "the elephant and the giraffe walked together"),
            doc(2, "the giraffe ate leaves near the elephant"),
            doc(3, "completely unrelated topics about weather"),
        ],
    )]);

    let rows = collect_rows(graph.run(&inputs)?)?;
    debug_rows("pmi", &rows);
    for row in &rows {
        println!("{row}", row = serde_json::to_string(row)?);
    }
    Ok(())
}
