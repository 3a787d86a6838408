//! The structured append-only event log.
//!
//! One line per record, flushed after every write (so a killed run still
//! leaves a readable prefix), filterable on load by `(start, end, category
//! set)`.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::category::EventCategory;
use crate::error::{OutputError, OutputResult};
use crate::record::LogRecord;

/// Writes [`LogRecord`]s to any [`Write`] sink, flushing after each one.
///
/// An optional write-time category filter: categories outside the filter
/// are silently dropped rather than written, so a caller that only cares
/// about `ROUTER`/`STORE` never pays for `MOVE` lines it would just
/// discard on load.
pub struct EventLogWriter<W: Write> {
    sink: W,
    filter: Option<Vec<EventCategory>>,
}

impl EventLogWriter<BufWriter<File>> {
    /// Open (or truncate) a log file at `path`.
    pub fn create(path: impl AsRef<Path>) -> OutputResult<Self> {
        let file = OpenOptions::new().create(true).write(true).truncate(true).open(path)?;
        Ok(EventLogWriter { sink: BufWriter::new(file), filter: None })
    }

    /// Open a log file at `path`, appending to any existing content.
    pub fn append(path: impl AsRef<Path>) -> OutputResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(EventLogWriter { sink: BufWriter::new(file), filter: None })
    }
}

impl<W: Write> EventLogWriter<W> {
    /// Wrap an arbitrary sink (a `Vec<u8>` in tests, a socket, ...).
    pub fn new(sink: W) -> Self {
        EventLogWriter { sink, filter: None }
    }

    /// Restrict future writes to the given categories.
    pub fn with_filter(mut self, categories: impl IntoIterator<Item = EventCategory>) -> Self {
        self.filter = Some(categories.into_iter().collect());
        self
    }

    /// Append one record and flush immediately. A no-op if a write-time
    /// filter is set and `category` isn't in it.
    pub fn log(&mut self, ts: f64, category: EventCategory, payload: serde_json::Value) -> OutputResult<()> {
        if let Some(filter) = &self.filter {
            if !filter.contains(&category) {
                return Ok(());
            }
        }
        let record = LogRecord::new(ts, category, payload);
        writeln!(self.sink, "{}", record.to_line())?;
        self.sink.flush()?;
        Ok(())
    }

    pub fn flush(&mut self) -> OutputResult<()> {
        self.sink.flush()?;
        Ok(())
    }
}

/// Parse one wire-format line into a [`LogRecord`].
///
/// The payload is everything after the second whitespace-separated token,
/// parsed as JSON — it may itself contain spaces, so this does not simply
/// `split_whitespace`.
fn parse_line(line_no: usize, line: &str) -> OutputResult<LogRecord> {
    let line = line.trim_end();
    let mut parts = line.splitn(3, ' ');
    let ts_str = parts.next().ok_or_else(|| malformed(line_no, "missing timestamp"))?;
    let cat_str = parts.next().ok_or_else(|| malformed(line_no, "missing category"))?;
    let payload_str = parts.next().ok_or_else(|| malformed(line_no, "missing payload"))?;

    let ts: f64 = ts_str.parse().map_err(|_| malformed(line_no, "bad timestamp"))?;
    let category: EventCategory = cat_str.parse().map_err(|e| malformed(line_no, &e.to_string()))?;
    let payload: serde_json::Value = serde_json::from_str(payload_str)?;

    Ok(LogRecord::new(ts, category, payload))
}

fn malformed(line: usize, reason: &str) -> OutputError {
    OutputError::MalformedLine { line, reason: reason.to_string() }
}

/// A filter applied when loading an event log back from disk.
#[derive(Clone, Debug, Default)]
pub struct LogFilter {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub categories: Option<Vec<EventCategory>>,
}

impl LogFilter {
    pub fn new() -> Self {
        LogFilter::default()
    }

    pub fn with_range(mut self, start: f64, end: f64) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = EventCategory>) -> Self {
        self.categories = Some(categories.into_iter().collect());
        self
    }

    fn accepts(&self, record: &LogRecord) -> bool {
        if let Some(start) = self.start {
            if record.ts < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if record.ts > end {
                return false;
            }
        }
        if let Some(categories) = &self.categories {
            if !categories.contains(&record.category) {
                return false;
            }
        }
        true
    }
}

/// Load every record from `path`, applying `filter` as it scans.
pub fn load(path: impl AsRef<Path>, filter: &LogFilter) -> OutputResult<Vec<LogRecord>> {
    let file = File::open(path)?;
    load_from(BufReader::new(file), filter)
}

/// Load every record from an arbitrary reader, applying `filter` as it scans.
pub fn load_from(reader: impl BufRead, filter: &LogFilter) -> OutputResult<Vec<LogRecord>> {
    let mut out = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = parse_line(i + 1, &line)?;
        if filter.accepts(&record) {
            out.push(record);
        }
    }
    Ok(out)
}
