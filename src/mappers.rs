//! Standard [`Mapper`] implementations.
//!
//! Grounded on `original_source/compgraph/operations.py`'s mapper classes;
//! reshaped to take `&Row` and return `Vec<Row>` per [`Mapper`]'s contract
//! rather than mutate-in-place-and-yield like the Python originals.

use crate::row::{column, column_f64, column_owned, column_str, Row, Value};
use crate::traits::Mapper;
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::OnceLock;

/// Identity mapper.
pub struct DummyMapper;

impl Mapper for DummyMapper {
    fn map(&self, row: &Row) -> Result<Vec<Row>> {
        Ok(vec![row.clone()])
    }
}

/// Deletes ASCII punctuation characters from `column`.
pub struct FilterPunctuation {
    pub column: String,
}

impl FilterPunctuation {
    pub fn new(column: impl Into<String>) -> Self {
        Self { column: column.into() }
    }
}

impl Mapper for FilterPunctuation {
    fn map(&self, row: &Row) -> Result<Vec<Row>> {
        let mut out = row.clone();
        let text = column_str(row, &self.column)?;
        let filtered: String = text.chars().filter(|c| !c.is_ascii_punctuation()).collect();
        out.insert(self.column.clone(), Value::String(filtered));
        Ok(vec![out])
    }
}

/// Lower-cases `column`.
pub struct LowerCase {
    pub column: String,
}

impl LowerCase {
    pub fn new(column: impl Into<String>) -> Self {
        Self { column: column.into() }
    }
}

impl Mapper for LowerCase {
    fn map(&self, row: &Row) -> Result<Vec<Row>> {
        let mut out = row.clone();
        let text = column_str(row, &self.column)?;
        out.insert(self.column.clone(), Value::String(text.to_lowercase()));
        Ok(vec![out])
    }
}

fn default_token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Za-z']+").expect("static token regex is valid"))
}

/// Tokenizes `column`, emitting one row per token with `column` replaced.
///
/// When `separator` is absent, tokens are maximal runs matching `[A-Za-z']+`;
/// when present, the column is split on that literal string instead.
pub struct Split {
    pub column: String,
    pub separator: Option<String>,
}

impl Split {
    pub fn new(column: impl Into<String>) -> Self {
        Self { column: column.into(), separator: None }
    }

    pub fn with_separator(column: impl Into<String>, separator: impl Into<String>) -> Self {
        Self { column: column.into(), separator: Some(separator.into()) }
    }
}

impl Mapper for Split {
    fn map(&self, row: &Row) -> Result<Vec<Row>> {
        let text = column_str(row, &self.column)?.to_string();
        let tokens: Vec<String> = match &self.separator {
            Some(sep) => text.split(sep.as_str()).map(str::to_string).collect(),
            None => default_token_regex()
                .find_iter(&text)
                .map(|m| m.as_str().to_string())
                .collect(),
        };
        let mut out = Vec::with_capacity(tokens.len());
        for token in tokens {
            let mut new_row = row.clone();
            new_row.insert(self.column.clone(), Value::String(token));
            out.push(new_row);
        }
        Ok(out)
    }
}

/// Writes the numeric product of `columns` to `result`.
pub struct Product {
    pub columns: Vec<String>,
    pub result: String,
}

impl Product {
    pub fn new(columns: Vec<String>, result: impl Into<String>) -> Self {
        Self { columns, result: result.into() }
    }
}

impl Mapper for Product {
    fn map(&self, row: &Row) -> Result<Vec<Row>> {
        let mut out = row.clone();
        let mut product = 1.0;
        for col in &self.columns {
            product *= column_f64(row, col)?;
        }
        out.insert(self.result.clone(), Value::from(product));
        Ok(vec![out])
    }
}

/// Emits the row iff `predicate(row)` is true.
pub struct Filter {
    predicate: Box<dyn Fn(&Row) -> bool>,
}

impl Filter {
    pub fn new(predicate: impl Fn(&Row) -> bool + 'static) -> Self {
        Self { predicate: Box::new(predicate) }
    }
}

impl Mapper for Filter {
    fn map(&self, row: &Row) -> Result<Vec<Row>> {
        if (self.predicate)(row) {
            Ok(vec![row.clone()])
        } else {
            Ok(vec![])
        }
    }
}

/// Emits a new row containing exactly the named columns, in the given order.
pub struct Project {
    pub columns: Vec<String>,
}

impl Project {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }
}

impl Mapper for Project {
    fn map(&self, row: &Row) -> Result<Vec<Row>> {
        let mut out = Row::new();
        for col in &self.columns {
            out.insert(col.clone(), column_owned(row, col)?);
        }
        Ok(vec![out])
    }
}

/// Replaces `column` with `f(column_value)`.
pub struct Function {
    column: String,
    f: Box<dyn Fn(&Value) -> Result<Value>>,
}

impl Function {
    pub fn new(column: impl Into<String>, f: impl Fn(&Value) -> Result<Value> + 'static) -> Self {
        Self { column: column.into(), f: Box::new(f) }
    }
}

impl Mapper for Function {
    fn map(&self, row: &Row) -> Result<Vec<Row>> {
        let mut out = row.clone();
        let value = column(row, &self.column)?;
        let new_value = (self.f)(value)?;
        out.insert(self.column.clone(), new_value);
        Ok(vec![out])
    }
}

const EARTH_RADIUS_KM: f64 = 6373.0;

/// Writes the great-circle (haversine) distance in km between two
/// `[lon, lat]` coordinate columns to `result`.
///
/// Supplemented from `original_source/compgraph/operations.py`'s
/// `HaversineDistance`; spec.md §1 scopes the formula itself out of the
/// core, but keeps the operator contract in scope (it's just a `Mapper`).
pub struct HaversineDistance {
    pub start_column: String,
    pub end_column: String,
    pub result_column: String,
}

impl HaversineDistance {
    pub fn new(start_column: impl Into<String>, end_column: impl Into<String>, result_column: impl Into<String>) -> Self {
        Self {
            start_column: start_column.into(),
            end_column: end_column.into(),
            result_column: result_column.into(),
        }
    }

    fn coords(row: &Row, col: &str) -> Result<(f64, f64)> {
        let value = column(row, col)?;
        let arr = value
            .as_array()
            .ok_or_else(|| anyhow!("column {col:?} is not a coordinate pair in row {row:?}"))?;
        if arr.len() != 2 {
            return Err(anyhow!("column {col:?} must be a [lon, lat] pair, got {arr:?}"));
        }
        let lon = arr[0].as_f64().ok_or_else(|| anyhow!("longitude in {col:?} is not numeric"))?;
        let lat = arr[1].as_f64().ok_or_else(|| anyhow!("latitude in {col:?} is not numeric"))?;
        Ok((lon, lat))
    }
}

impl Mapper for HaversineDistance {
    fn map(&self, row: &Row) -> Result<Vec<Row>> {
        let (lon1, lat1) = Self::coords(row, &self.start_column)?;
        let (lon2, lat2) = Self::coords(row, &self.end_column)?;
        let (lon1, lat1, lon2, lat2) = (lon1.to_radians(), lat1.to_radians(), lon2.to_radians(), lat2.to_radians());
        let central_angle =
            (lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon2 - lon1).cos()).acos();
        let mut out = row.clone();
        out.insert(self.result_column.clone(), Value::from(EARTH_RADIUS_KM * central_angle));
        Ok(vec![out])
    }
}

const DATE_FORMAT_WITH_MICROS: &str = "%Y%m%dT%H%M%S%.f";
const DATE_FORMAT: &str = "%Y%m%dT%H%M%S";

fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, DATE_FORMAT_WITH_MICROS)
        .or_else(|_| NaiveDateTime::parse_from_str(text, DATE_FORMAT))
        .with_context(|| format!("timestamp {text:?} does not match either known format"))
}

const WEEKDAY_ABBREVIATIONS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Splits a timestamp column into a three-letter weekday and an hour-of-day.
///
/// Supplemented from `original_source/compgraph/operations.py`'s `Date`.
pub struct Date {
    pub enter_time_column: String,
    pub weekday_result_column: String,
    pub hour_result_column: String,
}

impl Date {
    pub fn new(
        enter_time_column: impl Into<String>,
        weekday_result_column: impl Into<String>,
        hour_result_column: impl Into<String>,
    ) -> Self {
        Self {
            enter_time_column: enter_time_column.into(),
            weekday_result_column: weekday_result_column.into(),
            hour_result_column: hour_result_column.into(),
        }
    }
}

impl Mapper for Date {
    fn map(&self, row: &Row) -> Result<Vec<Row>> {
        use chrono::Datelike;
        let text = column_str(row, &self.enter_time_column)?;
        let date = parse_timestamp(text)?;
        let mut out = row.clone();
        let weekday = WEEKDAY_ABBREVIATIONS[date.weekday().num_days_from_monday() as usize];
        out.insert(self.weekday_result_column.clone(), Value::from(weekday));
        out.insert(self.hour_result_column.clone(), Value::from(date.hour()));
        Ok(vec![out])
    }
}

pub(crate) fn parse_row_timestamp(text: &str) -> Result<NaiveDateTime> {
    parse_timestamp(text)
}

