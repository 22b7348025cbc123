// tests/graph.rs
use anyhow::Result;
use rowgraph::graph::Graph;
use rowgraph::joiners::InnerJoiner;
use rowgraph::reducers::FirstReducer;
use rowgraph::row::Row;
use rowgraph::testing::{collect_rows, named_inputs};
use serde_json::json;

fn row(n: i64) -> Row {
    let mut r = Row::new();
    r.insert("k".into(), json!(n));
    r
}

#[test]
fn unknown_named_input_is_a_configuration_error() {
    let graph = Graph::from_named_input("missing");
    let inputs = named_inputs(vec![]);
    let err = graph.run(&inputs).unwrap_err();
    assert!(err.to_string().contains("missing"));
}

#[test]
fn join_stage_requires_matching_sub_graph() -> Result<()> {
    // Built through the public builder, this can never actually go out of
    // sync -- `.join` always appends both the stage and its source in
    // lockstep. This test documents that invariant by exercising a
    // multi-join graph and checking every join resolves independently.
    let a = Graph::from_named_input("a");
    let b = Graph::from_named_input("b");
    let c = Graph::from_named_input("c");

    let graph = a
        .join(InnerJoiner::default(), b, ["k"])
        .reduce(FirstReducer, ["k"])
        .join(InnerJoiner::default(), c, ["k"]);

    let inputs = named_inputs(vec![
        ("a", vec![row(1)]),
        ("b", vec![row(1)]),
        ("c", vec![row(1)]),
    ]);
    let rows = collect_rows(graph.run(&inputs)?)?;
    assert_eq!(rows.len(), 1);
    Ok(())
}

#[test]
fn building_a_downstream_graph_does_not_mutate_the_upstream() -> Result<()> {
    let base = Graph::from_named_input("rows");
    let extended = base.sort(["k"], false);

    let inputs = named_inputs(vec![("rows", vec![row(2), row(1)])]);

    // `base` itself is unsorted; `extended` is sorted. If `.sort` had
    // mutated `base` in place, this would observe sorted output too.
    let base_rows = collect_rows(base.run(&inputs)?)?;
    let extended_rows = collect_rows(extended.run(&inputs)?)?;

    assert_eq!(base_rows, vec![row(2), row(1)]);
    assert_eq!(extended_rows, vec![row(1), row(2)]);
    Ok(())
}
