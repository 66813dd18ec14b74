//! Shared constants for the evidence engine.

/// Default significance threshold.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Default confidence level for intervals.
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Minimum expected cell count before a chi-square result is flagged as low-reliability.
pub const DEFAULT_MIN_EXPECTED_COUNT: f64 = 5.0;

/// Minimum sample size before the normality check can trigger a Spearman fallback.
pub const DEFAULT_NORMALITY_MIN_SAMPLE: usize = 8;

/// Tukey fence multiplier for IQR outlier flagging.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Run batch sub-requests on the rayon pool by default.
pub const DEFAULT_PARALLEL_BATCH: bool = true;

/// Decimal places used when rendering statistics in reports.
pub const DEFAULT_DECIMAL_PLACES: usize = 3;

/// Minimum observations per group for t-tests and ANOVA.
pub const MIN_GROUP_SIZE: usize = 2;

/// Minimum paired observations for correlation (df = n - 2 must be positive).
pub const MIN_CORRELATION_PAIRS: usize = 3;

/// Minimum observations before quartiles and Tukey fences are reported.
pub const MIN_QUARTILE_SAMPLE: usize = 4;

/// Group names that imply paired semantics when they appear together.
pub const PAIRED_GROUP_NAMES: (&str, &str) = ("before", "after");

/// Message rendered for a session with no recorded evidence.
pub const EMPTY_REPORT_MESSAGE: &str = "No evidence recorded for this session.";
