//! Analysis modules.
//!
//! Currently a single streaming aggregator over the dataset lines.

pub mod aggregator;

pub use aggregator::*;
