//! TF-IDF inverted index: for every word/document pair, its TF-IDF score,
//! keeping only the top 3 documents per word.
//!
//! Grounded on `original_source/compgraph/algorithms.py`'s
//! `inverted_index_graph`.

use anyhow::{anyhow, Result};
use rowgraph::graph::Graph;
use rowgraph::joiners::InnerJoiner;
use rowgraph::mappers::{FilterPunctuation, Function, LowerCase, Product, Project, Split};
use rowgraph::reducers::{Count, FirstReducer, TermFrequency, TopN};
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

fn inverted_index_graph(input: &str, doc_column: &str, text_column: &str, result_column: &str) -> Graph {
    let source = Graph::from_named_input(input);

    let split_word = source
        .map(FilterPunctuation::new(text_column))
        .map(LowerCase::new(text_column))
        .map(Split::new(text_column));

    let count_docs = source.reduce(Count::new("count_docs"), Vec::<String>::new());

    let count_idf = split_word
        .sort([text_column, doc_column], false)
        .reduce(FirstReducer, [text_column, doc_column])
        .sort([text_column], false)
        .reduce(Count::new("words_count"), [text_column])
        .join(InnerJoiner::default(), count_docs, Vec::<String>::new())
        .map(Function::new("words_count", reciprocal))
        .map(Product::new(vec!["words_count".into(), "count_docs".into()], "idf"))
        .map(Function::new("idf", ln));

    let tf = split_word
        .sort([doc_column], false)
        .reduce(TermFrequency::new(text_column, "tf"), [doc_column])
        .sort([text_column], false);

    tf.join(InnerJoiner::default(), count_idf, [text_column])
        .map(Product::new(vec!["idf".into(), "tf".into()], result_column))
        .map(Project::new(vec![doc_column.into(), text_column.into(), result_column.into()]))
        .reduce(TopN::new(result_column, 3), [text_column])
}

fn main() -> Result<()> {
    let graph = inverted_index_graph("docs", "doc_id", "text", "tf_idf");
    let inputs = named_inputs(vec![(
        "docs",
        vec![
            doc(1, "hello small world"),
            doc(2, "hello big world, hello"),
            doc(3, "goodbye cruel small world"),
        ],
    )]);

    let rows = collect_rows(graph.run(&inputs)?)?;
    debug_rows("inverted_index", &rows);
    for row in &rows {
        println!("{row}", row = serde_json::to_string(row)?);
    }
    Ok(())
}
