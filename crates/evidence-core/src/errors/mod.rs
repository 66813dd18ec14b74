//! Error handling for the evidence engine.
//! One error enum per subsystem, `thiserror` only.

pub mod analysis_error;
pub mod config_error;
pub mod error_code;
pub mod failure;

pub use analysis_error::AnalysisError;
pub use config_error::ConfigError;
pub use error_code::EvidenceErrorCode;
pub use failure::AnalysisFailure;
