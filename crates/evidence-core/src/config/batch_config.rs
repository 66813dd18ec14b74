//! Batch configuration.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Configuration for the batch coordinator.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct BatchConfig {
    /// Compute sub-requests on the rayon pool. Default: true.
    pub parallel: Option<bool>,
}

impl BatchConfig {
    pub fn effective_parallel(&self) -> bool {
        self.parallel.unwrap_or(constants::DEFAULT_PARALLEL_BATCH)
    }
}
