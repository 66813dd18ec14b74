//! Configuration system for the evidence engine.
//! TOML-based, layered resolution: overrides > env > project > user > defaults.

pub mod analysis_config;
pub mod batch_config;
pub mod evidence_config;
pub mod report_config;

pub use analysis_config::AnalysisConfig;
pub use batch_config::BatchConfig;
pub use evidence_config::{ConfigOverrides, EvidenceConfig};
pub use report_config::ReportConfig;
