//! Analysis configuration.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Defaults applied to every analyze call unless the request overrides them.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Significance threshold. Default: 0.05.
    pub alpha: Option<f64>,
    /// Confidence level for intervals. Default: 0.95.
    pub confidence_level: Option<f64>,
    /// Expected cell count below which chi-square results are low-reliability. Default: 5.
    pub min_expected_count: Option<f64>,
    /// Sample size at which the correlation normality check engages. Default: 8.
    pub normality_min_sample: Option<usize>,
    /// Tukey fence multiplier for descriptive outliers. Default: 1.5.
    pub iqr_multiplier: Option<f64>,
}

impl AnalysisConfig {
    pub fn effective_alpha(&self) -> f64 {
        self.alpha.unwrap_or(constants::DEFAULT_ALPHA)
    }

    pub fn effective_confidence_level(&self) -> f64 {
        self.confidence_level
            .unwrap_or(constants::DEFAULT_CONFIDENCE_LEVEL)
    }

    pub fn effective_min_expected_count(&self) -> f64 {
        self.min_expected_count
            .unwrap_or(constants::DEFAULT_MIN_EXPECTED_COUNT)
    }

    pub fn effective_normality_min_sample(&self) -> usize {
        self.normality_min_sample
            .unwrap_or(constants::DEFAULT_NORMALITY_MIN_SAMPLE)
    }

    pub fn effective_iqr_multiplier(&self) -> f64 {
        self.iqr_multiplier
            .unwrap_or(constants::DEFAULT_IQR_MULTIPLIER)
    }
}
