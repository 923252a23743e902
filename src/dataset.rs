//! Dataset location and opening.
//!
//! The dataset lives at a fixed path relative to the project root. This
//! module resolves that path, checks it exists before any aggregation
//! starts, and hands the aggregator an already-opened reader.

use crate::error::StatsError;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the dataset.
pub const DATASET_FILE_NAME: &str = "data_full_v1.5_default.jsonl";

/// Directory of the dataset relative to the project root.
pub const DATASET_DIR: [&str; 3] = ["src", "dataset", "cladder"];

/// Resolves and opens the dataset under a project root.
#[derive(Debug, Clone)]
pub struct DatasetLocator {
    root: PathBuf,
}

impl DatasetLocator {
    /// Create a locator rooted at the given project directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The project root this locator resolves against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of the dataset file.
    pub fn path(&self) -> PathBuf {
        dataset_path(&self.root)
    }

    /// Open the dataset for buffered reading.
    ///
    /// Fails with [`StatsError::InputNotFound`] when the file is absent.
    pub fn open(&self) -> Result<BufReader<File>, StatsError> {
        let path = self.path();

        if !path.is_file() {
            return Err(StatsError::InputNotFound { path });
        }

        debug!("Opening dataset: {}", path.display());
        let file = File::open(&path).map_err(|source| StatsError::Open { path, source })?;

        Ok(BufReader::new(file))
    }
}

/// Join the fixed dataset location onto a root directory.
pub fn dataset_path(root: &Path) -> PathBuf {
    let mut path = root.to_path_buf();
    path.extend(DATASET_DIR);
    path.push(DATASET_FILE_NAME);
    path
}

/// Find the nearest ancestor of `start` (inclusive) that contains the dataset.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dataset_path(dir).is_file())
        .map(Path::to_path_buf)
}
