// tests/scenarios.rs
use anyhow::Result;
use rowgraph::graph::Graph;
use rowgraph::joiners::{InnerJoiner, OuterJoiner};
use rowgraph::mappers::{Date, FilterPunctuation, LowerCase, Split};
use rowgraph::reducers::{AverageSpeed, Count, TopN};
use rowgraph::row::Row;
use rowgraph::testing::{collect_rows, named_inputs};
use serde_json::json;

fn row(pairs: &[(&str, serde_json::Value)]) -> Row {
    let mut r = Row::new();
    for (k, v) in pairs {
        r.insert((*k).to_string(), v.clone());
    }
    r
}

// Scenario A -- word count.
#[test]
fn word_count_scenario() -> Result<()> {
    let graph = Graph::from_named_input("docs")
        .map(FilterPunctuation::new("text"))
        .map(LowerCase::new("text"))
        .map(Split::new("text"))
        .sort(["text"], false)
        .reduce(Count::new("count"), ["text"])
        .sort(["count", "text"], false);

    let inputs = named_inputs(vec![(
        "docs",
        vec![
            row(&[("doc_id", json!(1)), ("text", json!("hello, world"))]),
            row(&[("doc_id", json!(2)), ("text", json!("Hello hello"))]),
        ],
    )]);

    let rows = collect_rows(graph.run(&inputs)?)?;
    assert_eq!(
        rows,
        vec![
            row(&[("text", json!("world")), ("count", json!(1))]),
            row(&[("text", json!("hello")), ("count", json!(3))]),
        ]
    );
    Ok(())
}

// Scenario B -- reduce over pre-grouped input.
#[test]
fn reduce_grouping_scenario() -> Result<()> {
    let graph = Graph::from_named_input("rows").reduce(Count::new("count"), ["w"]);
    let inputs = named_inputs(vec![(
        "rows",
        vec![
            row(&[("w", json!("a")), ("n", json!(1))]),
            row(&[("w", json!("a")), ("n", json!(3))]),
            row(&[("w", json!("b")), ("n", json!(2))]),
        ],
    )]);

    let rows = collect_rows(graph.run(&inputs)?)?;
    assert_eq!(
        rows,
        vec![
            row(&[("w", json!("a")), ("count", json!(2))]),
            row(&[("w", json!("b")), ("count", json!(1))]),
        ]
    );
    Ok(())
}

// Scenario C -- inner join cross-product.
#[test]
fn inner_join_cross_product_scenario() -> Result<()> {
    let graph = Graph::from_named_input("left").join(InnerJoiner::default(), Graph::from_named_input("right"), ["w"]);
    let inputs = named_inputs(vec![
        (
            "left",
            vec![
                row(&[("w", json!("a")), ("n", json!(1))]),
                row(&[("w", json!("a")), ("n", json!(3))]),
                row(&[("w", json!("b")), ("n", json!(2))]),
            ],
        ),
        (
            "right",
            vec![
                row(&[("w", json!("a")), ("p", json!(0.11))]),
                row(&[("w", json!("a")), ("p", json!(2.0))]),
                row(&[("w", json!("b")), ("p", json!(3.0))]),
            ],
        ),
    ]);

    let rows = collect_rows(graph.run(&inputs)?)?;
    assert_eq!(rows.len(), 6);
    assert_eq!(rows.iter().filter(|r| r["w"] == json!("a")).count(), 4);
    assert_eq!(rows.iter().filter(|r| r["w"] == json!("b")).count(), 1);
    Ok(())
}

// Scenario D -- external sort beyond the in-memory buffer is a permutation
// and non-decreasing.
#[test]
fn external_sort_beyond_memory_scenario() -> Result<()> {
    let mut rows: Vec<Row> = Vec::with_capacity(5000);
    let mut seed: u64 = 88172645463325252;
    for _ in 0..5000 {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        rows.push(row(&[("k", json!((seed % 1000) as i64))]));
    }
    let mut expected = rows.clone();
    expected.sort_by_key(|r| r["k"].as_i64().unwrap());

    let out = rowgraph::sort::ExternalSort::with_buffer_rows(200).sort(
        rowgraph::testing::rows_from(rows),
        &["k".to_string()],
        false,
    )?;
    let out_rows = collect_rows(out)?;

    assert_eq!(out_rows.len(), expected.len());
    for w in out_rows.windows(2) {
        assert!(w[0]["k"].as_i64().unwrap() <= w[1]["k"].as_i64().unwrap());
    }
    Ok(())
}

// Scenario E -- TopN.
#[test]
fn top_n_scenario() -> Result<()> {
    let graph = Graph::from_named_input("rows").reduce(TopN::new("result", 2), Vec::<String>::new());
    let inputs = named_inputs(vec![(
        "rows",
        [5, 1, 4, 2, 3].iter().map(|n| row(&[("result", json!(n))])).collect(),
    )]);

    let rows = collect_rows(graph.run(&inputs)?)?;
    let values: Vec<i64> = rows.iter().map(|r| r["result"].as_i64().unwrap()).collect();
    assert_eq!(values.len(), 2);
    assert!(values.contains(&5));
    assert!(values.contains(&4));
    Ok(())
}

// Scenario F -- date and speed.
#[test]
fn average_speed_scenario() -> Result<()> {
    let graph = Graph::from_named_input("trips")
        .map(Date::new("enter_time", "weekday", "hour"))
        .reduce(
            AverageSpeed::new("haversine", "enter_time", "leave_time", "speed"),
            ["weekday", "hour"],
        );

    let inputs = named_inputs(vec![(
        "trips",
        vec![row(&[
            ("enter_time", json!("20171027T082557.571000")),
            ("leave_time", json!("20171027T082600.201000")),
            ("haversine", json!(0.04546)),
        ])],
    )]);

    let rows = collect_rows(graph.run(&inputs)?)?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["weekday"], json!("Fri"));
    assert_eq!(rows[0]["hour"], json!(8));
    let speed = rows[0]["speed"].as_f64().unwrap();
    assert!((speed - 62.23).abs() / 62.23 < 0.001, "speed was {speed}");
    Ok(())
}

// Property 6/7 -- outer join row count and collision-rule suffixing.
#[test]
fn outer_join_properties() -> Result<()> {
    let graph = Graph::from_named_input("left").join(OuterJoiner::default(), Graph::from_named_input("right"), ["w"]);
    let inputs = named_inputs(vec![
        ("left", vec![row(&[("w", json!("a")), ("shared", json!(1))])]),
        (
            "right",
            vec![
                row(&[("w", json!("a")), ("shared", json!(2))]),
                row(&[("w", json!("b")), ("shared", json!(9))]),
            ],
        ),
    ]);

    let rows = collect_rows(graph.run(&inputs)?)?;
    assert_eq!(rows.len(), 2); // max(|A|,|B|) = 2, disjoint-key row for "b"
    let matched = rows.iter().find(|r| r["w"] == json!("a")).unwrap();
    assert_eq!(matched["shared_1"], json!(1));
    assert_eq!(matched["shared_2"], json!(2));
    Ok(())
}

// Property 10 -- re-running the same graph twice yields identical output.
#[test]
fn graph_is_reusable() -> Result<()> {
    let graph = Graph::from_named_input("rows").sort(["k"], false);
    let inputs = named_inputs(vec![(
        "rows",
        vec![row(&[("k", json!(3))]), row(&[("k", json!(1))]), row(&[("k", json!(2))])],
    )]);

    let first = collect_rows(graph.run(&inputs)?)?;
    let second = collect_rows(graph.run(&inputs)?)?;
    assert_eq!(first, second);
    Ok(())
}
