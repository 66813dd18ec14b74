//! Analysis errors raised by the method selector and statistical procedures.

use super::error_code::{self, EvidenceErrorCode};

/// Recoverable failures of a single analysis. Never fatal: the engine
/// returns them to the caller, or embeds them in a batch outcome.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("Insufficient data: {reason}")]
    InsufficientData { reason: String },

    #[error("Ambiguous input: {reason}")]
    AmbiguousInput { reason: String },

    #[error("Degenerate input: {reason}")]
    DegenerateInput { reason: String },

    #[error("Unsupported method {method}: {reason}")]
    UnsupportedMethod { method: String, reason: String },

    #[error("Unknown session: {session_id}")]
    UnknownSession { session_id: String },

    #[error("Invalid parameter {field}: {message}")]
    InvalidParameter { field: String, message: String },
}

impl AnalysisError {
    pub fn insufficient(reason: impl Into<String>) -> Self {
        Self::InsufficientData {
            reason: reason.into(),
        }
    }

    pub fn ambiguous(reason: impl Into<String>) -> Self {
        Self::AmbiguousInput {
            reason: reason.into(),
        }
    }

    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateInput {
            reason: reason.into(),
        }
    }

    pub fn unsupported(method: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedMethod {
            method: method.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_parameter(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl EvidenceErrorCode for AnalysisError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientData { .. } => error_code::INSUFFICIENT_DATA,
            Self::AmbiguousInput { .. } => error_code::AMBIGUOUS_INPUT,
            Self::DegenerateInput { .. } => error_code::DEGENERATE_INPUT,
            Self::UnsupportedMethod { .. } => error_code::UNSUPPORTED_METHOD,
            Self::UnknownSession { .. } => error_code::UNKNOWN_SESSION,
            Self::InvalidParameter { .. } => error_code::INVALID_PARAMETER,
        }
    }
}
