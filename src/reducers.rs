//! Standard [`Reducer`] implementations.
//!
//! Grounded on `original_source/compgraph/operations.py`'s reducer classes,
//! reshaped to the `(group_key_names, &[Row]) -> Vec<Row>` contract of
//! [`Reducer`].

use crate::row::{column_f64, column_owned, column_str, Row, Value};
use crate::traits::Reducer;
use anyhow::{bail, Context, Result};

fn keyed_row(group_key: &[String], source: &Row) -> Result<Row> {
    let mut row = Row::new();
    for name in group_key {
        row.insert(name.clone(), column_owned(source, name)?);
    }
    Ok(row)
}

/// Yields only the first row of the group.
pub struct FirstReducer;

impl Reducer for FirstReducer {
    fn reduce(&self, _group_key: &[String], rows: &[Row]) -> Result<Vec<Row>> {
        match rows.first() {
            Some(row) => Ok(vec![row.clone()]),
            None => bail!("Reducer invoked on an empty group"),
        }
    }
}

/// Emits the group keys plus `column = group_size`.
pub struct Count {
    pub column: String,
}

impl Count {
    pub fn new(column: impl Into<String>) -> Self {
        Self { column: column.into() }
    }
}

impl Reducer for Count {
    fn reduce(&self, group_key: &[String], rows: &[Row]) -> Result<Vec<Row>> {
        if rows.is_empty() {
            bail!("Reducer invoked on an empty group");
        }
        let mut out = keyed_row(group_key, &rows[0])?;
        out.insert(self.column.clone(), Value::from(rows.len() as u64));
        Ok(vec![out])
    }
}

/// Emits the group keys plus `column = sum over the group`.
pub struct Sum {
    pub column: String,
}

impl Sum {
    pub fn new(column: impl Into<String>) -> Self {
        Self { column: column.into() }
    }
}

impl Reducer for Sum {
    fn reduce(&self, group_key: &[String], rows: &[Row]) -> Result<Vec<Row>> {
        if rows.is_empty() {
            bail!("Reducer invoked on an empty group");
        }
        let mut total = 0.0;
        for row in rows {
            total += column_f64(row, &self.column)?;
        }
        let mut out = keyed_row(group_key, &rows[0])?;
        out.insert(self.column.clone(), Value::from(total));
        Ok(vec![out])
    }
}

/// For each distinct value in `words_column` within the group, emits
/// `{keys…, words_column = w, result_column = occurrences(w) / total}`.
///
/// When `count_column` is set, "occurrences" and "total" are sums of
/// `count_column` rather than row counts.
pub struct TermFrequency {
    pub words_column: String,
    pub result_column: String,
    pub count_column: Option<String>,
}

impl TermFrequency {
    pub fn new(words_column: impl Into<String>, result_column: impl Into<String>) -> Self {
        Self {
            words_column: words_column.into(),
            result_column: result_column.into(),
            count_column: None,
        }
    }

    pub fn with_count_column(
        words_column: impl Into<String>,
        result_column: impl Into<String>,
        count_column: impl Into<String>,
    ) -> Self {
        Self {
            words_column: words_column.into(),
            result_column: result_column.into(),
            count_column: Some(count_column.into()),
        }
    }
}

impl Reducer for TermFrequency {
    fn reduce(&self, group_key: &[String], rows: &[Row]) -> Result<Vec<Row>> {
        if rows.is_empty() {
            bail!("Reducer invoked on an empty group");
        }
        let mut order: Vec<String> = Vec::new();
        let mut totals: std::collections::HashMap<String, f64> = std::collections::HashMap::new();
        let mut total = 0.0;

        for row in rows {
            let word = column_str(row, &self.words_column)?.to_string();
            let weight = match &self.count_column {
                Some(col) => column_f64(row, col)?,
                None => 1.0,
            };
            if !totals.contains_key(&word) {
                order.push(word.clone());
            }
            *totals.entry(word).or_insert(0.0) += weight;
            total += weight;
        }

        let mut out = Vec::with_capacity(order.len());
        for word in order {
            let mut row = keyed_row(group_key, &rows[0])?;
            row.insert(self.words_column.clone(), Value::from(word.clone()));
            row.insert(self.result_column.clone(), Value::from(totals[&word] / total));
            out.push(row);
        }
        Ok(out)
    }
}

/// Keeps the `n` rows of the group with the largest `column` values,
/// preserving arrival order among kept rows.
pub struct TopN {
    pub column: String,
    pub n: usize,
}

impl TopN {
    pub fn new(column: impl Into<String>, n: usize) -> Self {
        Self { column: column.into(), n }
    }
}

impl Reducer for TopN {
    fn reduce(&self, _group_key: &[String], rows: &[Row]) -> Result<Vec<Row>> {
        if rows.is_empty() {
            bail!("Reducer invoked on an empty group");
        }
        let mut scored = Vec::with_capacity(rows.len());
        for (idx, row) in rows.iter().enumerate() {
            scored.push((idx, column_f64(row, &self.column)?));
        }
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        let mut kept_indices: Vec<usize> = scored.into_iter().take(self.n).map(|(idx, _)| idx).collect();
        kept_indices.sort_unstable();
        Ok(kept_indices.into_iter().map(|idx| rows[idx].clone()).collect())
    }
}

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Computes average speed (distance / elapsed time) for a group of
/// enter/leave timestamped trips.
///
/// Supplemented from `original_source/compgraph/operations.py`'s
/// `AverageSpeed`; distance is expected in km and time in hours, matching
/// the `HaversineDistance` mapper's units.
pub struct AverageSpeed {
    pub distance_column: String,
    pub enter_time_column: String,
    pub leave_time_column: String,
    pub speed_result_column: String,
}

impl AverageSpeed {
    pub fn new(
        distance_column: impl Into<String>,
        enter_time_column: impl Into<String>,
        leave_time_column: impl Into<String>,
        speed_result_column: impl Into<String>,
    ) -> Self {
        Self {
            distance_column: distance_column.into(),
            enter_time_column: enter_time_column.into(),
            leave_time_column: leave_time_column.into(),
            speed_result_column: speed_result_column.into(),
        }
    }
}

impl Reducer for AverageSpeed {
    fn reduce(&self, group_key: &[String], rows: &[Row]) -> Result<Vec<Row>> {
        if rows.is_empty() {
            bail!("Reducer invoked on an empty group");
        }
        let mut total_distance = 0.0;
        let mut total_hours = 0.0;
        for row in rows {
            total_distance += column_f64(row, &self.distance_column)?;
            let enter = crate::mappers::parse_row_timestamp(column_str(row, &self.enter_time_column)?)?;
            let leave = crate::mappers::parse_row_timestamp(column_str(row, &self.leave_time_column)?)?;
            let micros = (leave - enter)
                .num_microseconds()
                .context("elapsed time between enter and leave overflows i64 microseconds")?;
            total_hours += micros as f64 / (SECONDS_PER_HOUR * 1_000_000.0);
        }
        if total_hours == 0.0 {
            bail!("AverageSpeed: zero total elapsed time in group");
        }
        let mut out = keyed_row(group_key, &rows[0])?;
        out.insert(self.speed_result_column.clone(), Value::from(total_distance / total_hours));
        Ok(vec![out])
    }
}

