//! Top-level configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{AnalysisConfig, BatchConfig, ReportConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_overrides`)
/// 2. Environment variables (`EVIDENCE_*`)
/// 3. Project config (`evidence.toml` in the project root)
/// 4. User config (`~/.evidence/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct EvidenceConfig {
    pub analysis: AnalysisConfig,
    pub batch: BatchConfig,
    pub report: ReportConfig,
}

/// Explicit overrides supplied by the host (highest priority layer).
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub alpha: Option<f64>,
    pub confidence_level: Option<f64>,
    pub parallel_batch: Option<bool>,
}

impl EvidenceConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config. Only a parse failure is fatal here.
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        ::tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        let project_config_path = root.join("evidence.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &EvidenceConfig) -> Result<(), ConfigError> {
        if let Some(alpha) = config.analysis.alpha {
            if !(alpha > 0.0 && alpha < 1.0) {
                return Err(ConfigError::ValidationFailed {
                    field: "analysis.alpha".to_string(),
                    message: "must be strictly between 0.0 and 1.0".to_string(),
                });
            }
        }
        if let Some(level) = config.analysis.confidence_level {
            if !(level > 0.0 && level < 1.0) {
                return Err(ConfigError::ValidationFailed {
                    field: "analysis.confidence_level".to_string(),
                    message: "must be strictly between 0.0 and 1.0".to_string(),
                });
            }
        }
        if let Some(count) = config.analysis.min_expected_count {
            if !(count.is_finite() && count >= 0.0) {
                return Err(ConfigError::ValidationFailed {
                    field: "analysis.min_expected_count".to_string(),
                    message: "must be a non-negative number".to_string(),
                });
            }
        }
        if let Some(multiplier) = config.analysis.iqr_multiplier {
            if !(multiplier.is_finite() && multiplier > 0.0) {
                return Err(ConfigError::ValidationFailed {
                    field: "analysis.iqr_multiplier".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if let Some(places) = config.report.decimal_places {
            if !(1..=10).contains(&places) {
                return Err(ConfigError::ValidationFailed {
                    field: "report.decimal_places".to_string(),
                    message: format!("must be between 1 and 10, got {places}"),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.evidence/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".evidence").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut EvidenceConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: EvidenceConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it has a value.
    fn merge(base: &mut EvidenceConfig, other: &EvidenceConfig) {
        // Analysis
        if other.analysis.alpha.is_some() {
            base.analysis.alpha = other.analysis.alpha;
        }
        if other.analysis.confidence_level.is_some() {
            base.analysis.confidence_level = other.analysis.confidence_level;
        }
        if other.analysis.min_expected_count.is_some() {
            base.analysis.min_expected_count = other.analysis.min_expected_count;
        }
        if other.analysis.normality_min_sample.is_some() {
            base.analysis.normality_min_sample = other.analysis.normality_min_sample;
        }
        if other.analysis.iqr_multiplier.is_some() {
            base.analysis.iqr_multiplier = other.analysis.iqr_multiplier;
        }

        // Batch
        if other.batch.parallel.is_some() {
            base.batch.parallel = other.batch.parallel;
        }

        // Report
        if other.report.decimal_places.is_some() {
            base.report.decimal_places = other.report.decimal_places;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `EVIDENCE_ANALYSIS_ALPHA`, `EVIDENCE_BATCH_PARALLEL`, etc.
    fn apply_env_overrides(config: &mut EvidenceConfig) {
        if let Ok(val) = std::env::var("EVIDENCE_ANALYSIS_ALPHA") {
            if let Ok(v) = val.parse::<f64>() {
                config.analysis.alpha = Some(v);
            }
        }
        if let Ok(val) = std::env::var("EVIDENCE_ANALYSIS_CONFIDENCE_LEVEL") {
            if let Ok(v) = val.parse::<f64>() {
                config.analysis.confidence_level = Some(v);
            }
        }
        if let Ok(val) = std::env::var("EVIDENCE_ANALYSIS_MIN_EXPECTED_COUNT") {
            if let Ok(v) = val.parse::<f64>() {
                config.analysis.min_expected_count = Some(v);
            }
        }
        if let Ok(val) = std::env::var("EVIDENCE_BATCH_PARALLEL") {
            if let Ok(v) = val.parse::<bool>() {
                config.batch.parallel = Some(v);
            }
        }
        if let Ok(val) = std::env::var("EVIDENCE_REPORT_DECIMAL_PLACES") {
            if let Ok(v) = val.parse::<usize>() {
                config.report.decimal_places = Some(v);
            }
        }
    }

    /// Apply explicit overrides (highest priority).
    fn apply_overrides(config: &mut EvidenceConfig, overrides: &ConfigOverrides) {
        if let Some(v) = overrides.alpha {
            config.analysis.alpha = Some(v);
        }
        if let Some(v) = overrides.confidence_level {
            config.analysis.confidence_level = Some(v);
        }
        if let Some(v) = overrides.parallel_batch {
            config.batch.parallel = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
