//! Serializable failure description for batch outcomes and the transport boundary.

use serde::{Deserialize, Serialize};

use super::error_code::EvidenceErrorCode;
use super::{AnalysisError, ConfigError};

/// Structured failure: a stable code plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("[{code}] {message}")]
pub struct AnalysisFailure {
    pub code: String,
    pub message: String,
}

impl AnalysisFailure {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl From<AnalysisError> for AnalysisFailure {
    fn from(e: AnalysisError) -> Self {
        Self::new(e.error_code(), e.to_string())
    }
}

impl From<&AnalysisError> for AnalysisFailure {
    fn from(e: &AnalysisError) -> Self {
        Self::new(e.error_code(), e.to_string())
    }
}

impl From<ConfigError> for AnalysisFailure {
    fn from(e: ConfigError) -> Self {
        Self::new(e.error_code(), e.to_string())
    }
}
