//! External (disk-spilling) sort stage.
//!
//! Grounded on the algorithm description of spec.md §4.3: buffered k-way
//! merge, single-run-in-memory skips spilling entirely, temp files cleaned
//! up on every exit path. Each spilled line carries its precomputed key
//! tuple alongside the row, so the k-way merge never needs to recompute
//! `key_tuple` (or even know the key column names) once a run has spilled.

use crate::row::{compare_key_tuple, key_tuple, Row, Value};
use crate::sequence::{from_rows, RowIter};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::io::{BufRead, BufReader, BufWriter, Write};
use tempfile::NamedTempFile;

/// Default size of the in-memory sort buffer, in rows, before a run spills.
const DEFAULT_BUFFER_ROWS: usize = 100_000;

/// Sorts a lazy row sequence by `keys` using a fixed-size in-memory buffer,
/// spilling sorted runs to temporary files when the buffer fills.
pub struct ExternalSort {
    buffer_rows: usize,
}

impl Default for ExternalSort {
    fn default() -> Self {
        Self { buffer_rows: DEFAULT_BUFFER_ROWS }
    }
}

impl ExternalSort {
    /// Construct a sorter with a non-default buffer size, primarily so
    /// tests can force spilling without materializing huge inputs.
    pub fn with_buffer_rows(buffer_rows: usize) -> Self {
        assert!(buffer_rows > 0, "sort buffer must hold at least one row");
        Self { buffer_rows }
    }

    pub fn sort(&self, input: RowIter, keys: &[String], reverse: bool) -> Result<RowIter> {
        let mut runs: Vec<SpilledRun> = Vec::new();
        let mut buffer: Vec<KeyedRow> = Vec::with_capacity(self.buffer_rows);

        for row in input {
            let row = row?;
            let key = key_tuple(&row, keys)?;
            buffer.push(KeyedRow { key, row });
            if buffer.len() >= self.buffer_rows {
                let chunk = std::mem::replace(&mut buffer, Vec::with_capacity(self.buffer_rows));
                runs.push(SpilledRun::spill(chunk, reverse)?);
            }
        }

        if runs.is_empty() {
            sort_buffer(&mut buffer, reverse);
            return Ok(from_rows(buffer.into_iter().map(|kr| kr.row).collect()));
        }

        if !buffer.is_empty() {
            runs.push(SpilledRun::spill(buffer, reverse)?);
        }

        Ok(Box::new(MergeIter::new(runs, reverse)?))
    }
}

#[derive(Serialize, Deserialize)]
struct KeyedRow {
    key: Vec<Value>,
    row: Row,
}

fn sort_buffer(buffer: &mut [KeyedRow], reverse: bool) {
    buffer.sort_by(|a, b| {
        let ord = compare_key_tuple(&a.key, &b.key);
        if reverse {
            ord.reverse()
        } else {
            ord
        }
    });
}

/// One sorted run, spilled to a temp file as newline-delimited JSON.
///
/// The file is deleted when `NamedTempFile` drops -- on success, on an
/// abandoned iterator, or when an error unwinds through `MergeIter`.
struct SpilledRun {
    file: NamedTempFile,
}

impl SpilledRun {
    fn spill(mut chunk: Vec<KeyedRow>, reverse: bool) -> Result<Self> {
        sort_buffer(&mut chunk, reverse);
        let file = NamedTempFile::new().context("creating external-sort spill file")?;
        {
            let mut writer = BufWriter::new(file.as_file());
            for keyed in &chunk {
                serde_json::to_writer(&mut writer, keyed).context("writing spilled row")?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }
        Ok(Self { file })
    }

    fn reader(&self) -> Result<impl Iterator<Item = Result<KeyedRow>>> {
        let file = std::fs::File::open(self.file.path()).context("reopening spill file for merge")?;
        Ok(BufReader::new(file).lines().map(|line| -> Result<KeyedRow> {
            let line = line.context("reading spilled row")?;
            serde_json::from_str(&line).context("parsing spilled row")
        }))
    }
}

struct HeapEntry {
    key: Vec<Value>,
    row: Row,
    run: usize,
    reverse: bool,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        compare_key_tuple(&self.key, &other.key) == Ordering::Equal
    }
}
impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; invert the natural order so the entry
        // popped first is the one that should come first in the final
        // (possibly reversed) sort order.
        let ord = compare_key_tuple(&self.key, &other.key);
        if self.reverse {
            ord
        } else {
            ord.reverse()
        }
    }
}

/// K-way merge of spilled runs, keyed on the precomputed sort key via a
/// min-heap (a max-heap over the inverted comparator).
struct MergeIter {
    runs: Vec<Box<dyn Iterator<Item = Result<KeyedRow>>>>,
    heap: BinaryHeap<HeapEntry>,
    reverse: bool,
    _spills: Vec<SpilledRun>,
}

impl MergeIter {
    fn new(spills: Vec<SpilledRun>, reverse: bool) -> Result<Self> {
        let mut runs: Vec<Box<dyn Iterator<Item = Result<KeyedRow>>>> = Vec::with_capacity(spills.len());
        for spill in &spills {
            runs.push(Box::new(spill.reader()?));
        }
        let mut heap = BinaryHeap::with_capacity(runs.len());
        for (idx, run) in runs.iter_mut().enumerate() {
            if let Some(next) = run.next() {
                let keyed = next?;
                heap.push(HeapEntry { key: keyed.key, row: keyed.row, run: idx, reverse });
            }
        }
        Ok(Self { runs, heap, reverse, _spills: spills })
    }
}

impl Iterator for MergeIter {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.heap.pop()?;
        if let Some(next) = self.runs[entry.run].next() {
            match next {
                Ok(keyed) => {
                    self.heap.push(HeapEntry { key: keyed.key, row: keyed.row, run: entry.run, reverse: self.reverse });
                }
                Err(e) => return Some(Err(e)),
            }
        }
        Some(Ok(entry.row))
    }
}

