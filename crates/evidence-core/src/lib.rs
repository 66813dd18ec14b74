//! # evidence-core
//!
//! Shared foundation for the statistical evidence engine:
//! observation and request types, the `Evidence` record, error taxonomy,
//! layered configuration, tracing setup, and default constants.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::EvidenceConfig;
pub use errors::{AnalysisError, AnalysisFailure, ConfigError, EvidenceErrorCode};
pub use types::{
    AnalysisRequest, Evidence, EvidenceBuilder, MethodKind, ObservationSet, RawValue, Tail,
    Variable,
};
