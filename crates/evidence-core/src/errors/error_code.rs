//! EvidenceErrorCode trait for transport-boundary conversion.

/// Every error enum implements this to expose a stable code string
/// that callers on the other side of the transport can match on.
pub trait EvidenceErrorCode {
    /// Returns the error code string (e.g., "INSUFFICIENT_DATA").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const INSUFFICIENT_DATA: &str = "INSUFFICIENT_DATA";
pub const AMBIGUOUS_INPUT: &str = "AMBIGUOUS_INPUT";
pub const DEGENERATE_INPUT: &str = "DEGENERATE_INPUT";
pub const UNSUPPORTED_METHOD: &str = "UNSUPPORTED_METHOD";
pub const UNKNOWN_SESSION: &str = "UNKNOWN_SESSION";
pub const INVALID_PARAMETER: &str = "INVALID_PARAMETER";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
