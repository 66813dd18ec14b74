//! Statistical procedures: one pure routine per method, each producing an `Evidence`.

pub mod anova;
pub mod chi_square;
pub mod comparison;
pub mod correlation;
pub mod descriptive;
pub mod distribution;
pub mod frequency;
pub mod summary;

use evidence_core::config::AnalysisConfig;
use evidence_core::types::{AnalysisRequest, ConfidenceInterval, Evidence, Tail};
use evidence_core::AnalysisError;

use crate::selector::{MethodChoice, NumericSeries};

/// Resolved parameters for one procedure run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureParams {
    pub alpha: f64,
    pub confidence_level: f64,
    pub tail: Tail,
    pub min_expected_count: f64,
    pub normality_min_sample: usize,
    pub iqr_multiplier: f64,
}

impl ProcedureParams {
    /// Per-request values over configured defaults.
    pub fn resolve(
        config: &AnalysisConfig,
        request: &AnalysisRequest,
    ) -> Result<Self, AnalysisError> {
        Ok(Self {
            alpha: request.resolved_alpha(config.effective_alpha())?,
            confidence_level: request
                .resolved_confidence_level(config.effective_confidence_level())?,
            tail: request.tail,
            min_expected_count: config.effective_min_expected_count(),
            normality_min_sample: config.effective_normality_min_sample(),
            iqr_multiplier: config.effective_iqr_multiplier(),
        })
    }
}

impl Default for ProcedureParams {
    fn default() -> Self {
        Self {
            alpha: evidence_core::constants::DEFAULT_ALPHA,
            confidence_level: evidence_core::constants::DEFAULT_CONFIDENCE_LEVEL,
            tail: Tail::TwoSided,
            min_expected_count: evidence_core::constants::DEFAULT_MIN_EXPECTED_COUNT,
            normality_min_sample: evidence_core::constants::DEFAULT_NORMALITY_MIN_SAMPLE,
            iqr_multiplier: evidence_core::constants::DEFAULT_IQR_MULTIPLIER,
        }
    }
}

/// Run the procedure a selector choice names.
pub fn run(choice: &MethodChoice, params: &ProcedureParams) -> Result<Evidence, AnalysisError> {
    match choice {
        MethodChoice::Descriptive { variables } => descriptive::analyze(variables, params),
        MethodChoice::Paired { first, second } => comparison::paired(first, second, params),
        MethodChoice::TwoSample { first, second } => {
            comparison::two_sample(first, second, params)
        }
        MethodChoice::MultiGroup { groups } => anova::one_way(groups, params),
        MethodChoice::Correlation { x, y } => correlation::analyze(x, y, params),
        MethodChoice::CategoricalIndependence {
            rows,
            columns,
            ignored,
        } => chi_square::independence(rows, columns, ignored, params),
        MethodChoice::Frequency { variables } => frequency::analyze(variables),
    }
}

/// A test variable whose values are all identical has no variance to test against.
pub(crate) fn require_variation(series: &NumericSeries) -> Result<(), AnalysisError> {
    match series.values.split_first() {
        Some((first, rest)) if rest.iter().all(|v| v == first) => {
            Err(AnalysisError::degenerate(format!(
                "all values of '{}' are identical ({first}); the test statistic is undefined",
                series.name
            )))
        }
        _ => Ok(()),
    }
}

/// Symmetric interval `estimate ± half_width`.
pub(crate) fn interval(
    estimate: f64,
    half_width: f64,
    level: f64,
    parameter: &str,
) -> Option<ConfidenceInterval> {
    if !(estimate.is_finite() && half_width.is_finite()) {
        return None;
    }
    Some(ConfidenceInterval {
        lower: estimate - half_width,
        upper: estimate + half_width,
        level,
        parameter: parameter.to_string(),
    })
}
