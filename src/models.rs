//! Data models for the dataset statistics.
//!
//! This module contains the category key used to group field values and
//! the aggregate report produced by a single pass over the dataset.

use crate::error::StatsError;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A categorical field value, kept in the form JSON parsing produced it.
///
/// No coercion is applied: `1` and `1.0` are different keys, and composite
/// values (arrays, objects) are grouped by structural equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryKey(Value);

impl CategoryKey {
    /// Wraps a parsed JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Returns the underlying JSON value.
    #[allow(dead_code)] // Accessor for callers inspecting raw values
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Canonical JSON text. Object keys are sorted and negative zero is
    /// written as zero, so values that compare equal produce identical text.
    fn canonical(&self) -> String {
        canonical_text(&self.0)
    }

    fn type_rank(&self) -> u8 {
        match self.0 {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }
}

impl From<Value> for CategoryKey {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl Hash for CategoryKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl Ord for CategoryKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.0, &other.0) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Number(a), Value::Number(b)) => compare_numbers(a, b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            _ => self
                .type_rank()
                .cmp(&other.type_rank())
                .then_with(|| self.canonical().cmp(&other.canonical())),
        }
    }
}

impl PartialOrd for CategoryKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn canonical_text(value: &Value) -> String {
    match value {
        Value::Number(n) => number_text(n),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(canonical_text).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(map) => {
            let fields: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}:{}", Value::from(k.as_str()), canonical_text(v)))
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        other => other.to_string(),
    }
}

/// `-0.0 == 0.0` under JSON value equality, so both share one spelling.
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(x) if x == 0.0 && n.is_f64() => "0.0".to_string(),
        _ => n.to_string(),
    }
}

/// Numeric ordering, falling back to the textual form so that numerically
/// equal but distinct values (`1` vs `1.0`) never compare as equal.
fn compare_numbers(a: &serde_json::Number, b: &serde_json::Number) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x.cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x.cmp(&y);
    }

    let numeric = match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    };
    numeric.then_with(|| number_text(a).cmp(&number_text(b)))
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => write!(f, "{}", s),
            other => write!(f, "{}", other),
        }
    }
}

/// Counts per category value.
pub type Counts = HashMap<CategoryKey, usize>;

/// Accumulated statistics from one pass over the dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateReport {
    /// Non-empty lines processed, including unparseable ones.
    pub total: usize,
    /// Lines that were not a valid JSON object.
    pub parse_failures: usize,
    /// 1-based ordinals (among non-empty lines) of the failed lines.
    pub failed_lines: Vec<usize>,
    /// Occurrences of each `rung` value.
    pub rung_counts: Counts,
    /// Occurrences of each `query_type` value.
    pub query_type_counts: Counts,
    /// Joint counts for records carrying both fields.
    pub rung_to_query_counts: HashMap<CategoryKey, Counts>,
    /// Records without a `rung` key.
    pub missing_rung: usize,
    /// Records without a `query_type` key.
    pub missing_query_type: usize,
}

impl AggregateReport {
    /// Number of lines that parsed as JSON objects.
    pub fn parsed_records(&self) -> usize {
        self.total.saturating_sub(self.parse_failures)
    }

    /// Rung counts ordered by rung value.
    pub fn rungs_sorted(&self) -> Vec<(&CategoryKey, usize)> {
        sorted_counts(&self.rung_counts)
    }

    /// Query type counts ordered by query type.
    pub fn query_types_sorted(&self) -> Vec<(&CategoryKey, usize)> {
        sorted_counts(&self.query_type_counts)
    }

    /// Joint distribution ordered by rung, then by query type.
    ///
    /// Rungs without any joint entry are omitted.
    pub fn joint_sorted(&self) -> Vec<(&CategoryKey, Vec<(&CategoryKey, usize)>)> {
        let mut rungs: Vec<_> = self
            .rung_to_query_counts
            .iter()
            .filter(|(_, inner)| !inner.is_empty())
            .map(|(rung, inner)| (rung, sorted_counts(inner)))
            .collect();
        rungs.sort_by(|a, b| a.0.cmp(b.0));
        rungs
    }

    /// Verify the counting invariants that every report must satisfy.
    pub fn check_invariants(&self) -> Result<(), StatsError> {
        if self.failed_lines.len() != self.parse_failures {
            return Err(StatsError::Inconsistent {
                invariant: "failed line ordinals",
                detail: format!(
                    "{} ordinals recorded for {} failures",
                    self.failed_lines.len(),
                    self.parse_failures
                ),
            });
        }

        let parsed = self.parsed_records();

        let rung_sum: usize = self.rung_counts.values().sum();
        if rung_sum + self.missing_rung != parsed {
            return Err(StatsError::Inconsistent {
                invariant: "rung coverage",
                detail: format!(
                    "{} counted + {} missing != {} parsed",
                    rung_sum, self.missing_rung, parsed
                ),
            });
        }

        let query_sum: usize = self.query_type_counts.values().sum();
        if query_sum + self.missing_query_type != parsed {
            return Err(StatsError::Inconsistent {
                invariant: "query_type coverage",
                detail: format!(
                    "{} counted + {} missing != {} parsed",
                    query_sum, self.missing_query_type, parsed
                ),
            });
        }

        for (rung, inner) in &self.rung_to_query_counts {
            let joint: usize = inner.values().sum();
            let marginal = self.rung_counts.get(rung).copied().unwrap_or(0);
            if joint > marginal {
                return Err(StatsError::Inconsistent {
                    invariant: "joint bounded by rung",
                    detail: format!("rung {}: {} joint > {} total", rung, joint, marginal),
                });
            }
        }

        Ok(())
    }
}

fn sorted_counts(counts: &Counts) -> Vec<(&CategoryKey, usize)> {
    let mut entries: Vec<_> = counts.iter().map(|(k, v)| (k, *v)).collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}
