//! Saved dashboard payload on disk.

use crate::adapters::payload::{decode_performance, decode_rebound};
use crate::domain::error::PicksError;
use crate::domain::row::{DatasetKind, PerformanceSnapshot, ReboundRow};
use crate::ports::data_port::DataPort;
use std::fs;
use std::path::PathBuf;

pub struct JsonFileAdapter {
    path: PathBuf,
}

impl JsonFileAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Re-read on every call so an edited file shows up on refresh.
    fn read(&self, dataset: DatasetKind) -> Result<String, PicksError> {
        tracing::debug!(%dataset, path = %self.path.display(), "reading saved payload");
        fs::read_to_string(&self.path).map_err(|e| PicksError::Transport {
            dataset,
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })
    }
}

impl DataPort for JsonFileAdapter {
    fn fetch_performance(&self) -> Result<PerformanceSnapshot, PicksError> {
        decode_performance(&self.read(DatasetKind::Performance)?)
    }

    fn fetch_rebound(&self) -> Result<Vec<ReboundRow>, PicksError> {
        decode_rebound(&self.read(DatasetKind::Rebound)?)
    }
}
