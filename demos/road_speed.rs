//! Average road speed by weekday and hour, from two input streams: trip
//! timestamps keyed by road edge, and edge geometry.
//!
//! Grounded on `original_source/compgraph/algorithms.py`'s
//! `yandex_maps_graph`; this is spec.md's Scenario F end to end.

use anyhow::Result;
use rowgraph::graph::Graph;
use rowgraph::joiners::InnerJoiner;
use rowgraph::mappers::{Date, HaversineDistance};
use rowgraph::reducers::AverageSpeed;
use rowgraph::row::Row;
use rowgraph::testing::{collect_rows, debug_rows, named_inputs};
use serde_json::json;

fn trip(edge_id: i64, enter_time: &str, leave_time: &str) -> Row {
    let mut row = Row::new();
    row.insert("edge_id".into(), json!(edge_id));
    row.insert("enter_time".into(), json!(enter_time));
    row.insert("leave_time".into(), json!(leave_time));
    row
}

fn edge(edge_id: i64, start: [f64; 2], end: [f64; 2]) -> Row {
    let mut row = Row::new();
    row.insert("edge_id".into(), json!(edge_id));
    row.insert("start".into(), json!(start));
    row.insert("end".into(), json!(end));
    row
}

fn road_speed_graph(
    time_input: &str,
    length_input: &str,
    enter_time_column: &str,
    leave_time_column: &str,
    edge_id_column: &str,
    weekday_column: &str,
    hour_column: &str,
    speed_column: &str,
) -> Graph {
    let date = Graph::from_named_input(time_input).map(Date::new(enter_time_column, weekday_column, hour_column));
    let dist = Graph::from_named_input(length_input).map(HaversineDistance::new("start", "end", "haversine"));

    date.join(InnerJoiner::default(), dist, [edge_id_column])
        .sort([weekday_column, hour_column], false)
        .reduce(
            AverageSpeed::new("haversine", enter_time_column, leave_time_column, speed_column),
            [weekday_column, hour_column],
        )
        .sort([weekday_column, hour_column], false)
}

fn main() -> Result<()> {
    let graph = road_speed_graph(
        "trips", "edges", "enter_time", "leave_time", "edge_id", "weekday", "hour", "speed",
    );

    let inputs = named_inputs(vec![
        (
            "trips",
            vec![trip(1, "20171027T082557.571000", "20171027T082600.201000")],
        ),
        (
            "edges",
            vec![edge(1, [37.84870228730142, 55.73853974696249], [37.8490418381989, 55.73832445777953])],
        ),
    ]);

    let rows = collect_rows(graph.run(&inputs)?)?;
    debug_rows("road_speed", &rows);
    for row in &rows {
        println!("{row}", row = serde_json::to_string(row)?);
    }
    Ok(())
}
