//! Streaming aggregation of rung and query_type statistics.
//!
//! This module provides a single forward pass over line-delimited JSON,
//! counting categorical field values without buffering the input.

use crate::error::StatsError;
use crate::models::{AggregateReport, CategoryKey};
use serde_json::{Map, Value};
use std::io::BufRead;
use tracing::{debug, warn};

/// Field holding the causal ladder tier.
pub const RUNG_FIELD: &str = "rung";

/// Field holding the causal query kind.
pub const QUERY_TYPE_FIELD: &str = "query_type";

/// What happened to a single input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Blank after trimming; not counted.
    Skipped,
    /// Counted toward the total but not a JSON object.
    Failed,
    /// Parsed and folded into the field counters.
    Recorded,
}

/// Incremental accumulator for the aggregate report.
#[derive(Debug, Default)]
pub struct Aggregator {
    report: AggregateReport,
}

impl Aggregator {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one input line into the counters.
    pub fn ingest(&mut self, line: &str) -> LineOutcome {
        let line = line.trim();
        if line.is_empty() {
            return LineOutcome::Skipped;
        }

        self.report.total += 1;
        let ordinal = self.report.total;

        match parse_object(line) {
            Ok(object) => {
                self.record(object);
                LineOutcome::Recorded
            }
            Err(reason) => {
                warn!("Line {}: JSON parse failed, skipping ({})", ordinal, reason);
                self.report.parse_failures += 1;
                self.report.failed_lines.push(ordinal);
                LineOutcome::Failed
            }
        }
    }

    /// Count the fields of one parsed record.
    fn record(&mut self, mut object: Map<String, Value>) {
        let report = &mut self.report;

        let rung = object.remove(RUNG_FIELD).map(CategoryKey::from);
        match &rung {
            Some(rung) => *report.rung_counts.entry(rung.clone()).or_default() += 1,
            None => report.missing_rung += 1,
        }

        let query_type = object.remove(QUERY_TYPE_FIELD).map(CategoryKey::from);
        match &query_type {
            Some(qt) => *report.query_type_counts.entry(qt.clone()).or_default() += 1,
            None => report.missing_query_type += 1,
        }

        if let (Some(rung), Some(qt)) = (rung, query_type) {
            *report
                .rung_to_query_counts
                .entry(rung)
                .or_default()
                .entry(qt)
                .or_default() += 1;
        }
    }

    /// Consume the aggregator and return the finished report.
    pub fn finish(self) -> AggregateReport {
        debug!(
            "Aggregated {} lines ({} unparseable, {} distinct rungs, {} distinct query types)",
            self.report.total,
            self.report.parse_failures,
            self.report.rung_counts.len(),
            self.report.query_type_counts.len()
        );
        self.report
    }
}

/// Parse a trimmed line, requiring a top-level JSON object.
fn parse_object(line: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(other) => Err(format!("expected a JSON object, found {}", json_type_name(&other))),
        Err(e) => Err(e.to_string()),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Aggregate every line of an already-opened reader.
///
/// Malformed lines are counted and skipped. Only failures of the reader
/// itself (I/O errors, invalid UTF-8) abort the pass.
pub fn aggregate<R: BufRead>(reader: R) -> Result<AggregateReport, StatsError> {
    let mut aggregator = Aggregator::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| StatsError::Read {
            line: index + 1,
            source,
        })?;
        aggregator.ingest(&line);
    }

    Ok(aggregator.finish())
}

/// Aggregate an in-memory sequence of lines.
#[allow(dead_code)] // In-memory entry point; the binary streams from a file
pub fn aggregate_lines<I, S>(lines: I) -> AggregateReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut aggregator = Aggregator::new();
    for line in lines {
        aggregator.ingest(line.as_ref());
    }
    aggregator.finish()
}
