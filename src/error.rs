//! Error types for dataset access and report consistency.
//!
//! Per-line parse failures are not errors at this level; they are counted
//! by the aggregator and logged. Everything here is fatal for a run.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while locating, reading or summarizing a dataset.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatsError {
    /// The dataset file does not exist at the expected location.
    #[error("Dataset file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// The dataset file exists but could not be opened.
    #[error("Failed to open dataset file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading a physical line from the input failed.
    #[error("Failed to read input at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    /// An aggregate report violated one of its counting invariants.
    #[error("Inconsistent report ({invariant}): {detail}")]
    Inconsistent {
        invariant: &'static str,
        detail: String,
    },
}

impl StatsError {
    /// Returns true for errors caused by the environment rather than the data.
    pub fn is_environment(&self) -> bool {
        matches!(
            self,
            StatsError::InputNotFound { .. } | StatsError::Open { .. }
        )
    }
}
