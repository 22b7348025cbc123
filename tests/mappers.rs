// tests/mappers.rs
use rowgraph::mappers::{Date, FilterPunctuation, HaversineDistance, Project, Split};
use rowgraph::row::{Row, Value};
use rowgraph::traits::Mapper;
use serde_json::json;

fn row_with(pairs: &[(&str, Value)]) -> Row {
    let mut r = Row::new();
    for (k, v) in pairs {
        r.insert((*k).to_string(), v.clone());
    }
    r
}

#[test]
fn split_default_tokenizes_on_words() {
    let row = row_with(&[("text", json!("hello, world"))]);
    let out = Split::new("text").map(&row).unwrap();
    let tokens: Vec<&str> = out.iter().map(|r| r["text"].as_str().unwrap()).collect();
    assert_eq!(tokens, vec!["hello", "world"]);
}

#[test]
fn filter_punctuation_strips_ascii_punctuation() {
    let row = row_with(&[("text", json!("hello, world!"))]);
    let out = FilterPunctuation::new("text").map(&row).unwrap();
    assert_eq!(out[0]["text"], json!("hello world"));
}

#[test]
fn project_reorders_and_drops_columns() {
    let row = row_with(&[("a", json!(1)), ("b", json!(2)), ("c", json!(3))]);
    let out = Project::new(vec!["c".into(), "a".into()]).map(&row).unwrap();
    let keys: Vec<&String> = out[0].keys().collect();
    assert_eq!(keys, vec!["c", "a"]);
}

#[test]
fn haversine_distance_matches_known_value() {
    let row = row_with(&[("start", json!([37.61, 55.74])), ("end", json!([37.61, 55.74]))]);
    let out = HaversineDistance::new("start", "end", "dist").map(&row).unwrap();
    assert!(out[0]["dist"].as_f64().unwrap() < 1e-9);
}

#[test]
fn date_splits_weekday_and_hour() {
    let row = row_with(&[("t", json!("20171027T082557.571000"))]);
    let out = Date::new("t", "weekday", "hour").map(&row).unwrap();
    assert_eq!(out[0]["weekday"], json!("Fri"));
    assert_eq!(out[0]["hour"], json!(8));
}
