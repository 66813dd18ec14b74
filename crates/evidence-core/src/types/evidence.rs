//! The `Evidence` record: normalized output of one statistical computation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::method::{MethodKind, Tail};

/// Which test statistic a procedure produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticKind {
    T,
    F,
    ChiSquare,
    PearsonR,
    SpearmanRho,
}

impl StatisticKind {
    /// Symbol used in academic notation.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::T => "t",
            Self::F => "F",
            Self::ChiSquare => "χ²",
            Self::PearsonR => "r",
            Self::SpearmanRho => "ρ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestStatistic {
    pub kind: StatisticKind,
    pub value: f64,
}

/// Degrees of freedom: one value for t/χ²/r, a pair for F.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DegreesOfFreedom {
    Single(f64),
    Pair { numerator: f64, denominator: f64 },
}

impl fmt::Display for DegreesOfFreedom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(df) => f.write_str(&format_df(*df)),
            Self::Pair {
                numerator,
                denominator,
            } => write!(f, "{}, {}", format_df(*numerator), format_df(*denominator)),
        }
    }
}

/// Whole degrees of freedom print without decimals; Welch df keep two.
fn format_df(df: f64) -> String {
    if (df - df.round()).abs() < 1e-9 {
        format!("{}", df.round() as i64)
    } else {
        format!("{df:.2}")
    }
}

/// Named effect-size measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectSizeKind {
    /// Standardized mean difference with pooled SD.
    CohensD,
    /// Mean difference over SD of the differences (paired).
    CohensDz,
    EtaSquared,
    PearsonR,
    SpearmanRho,
    CramersV,
}

impl EffectSizeKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::CohensD => "Cohen's d",
            Self::CohensDz => "Cohen's d (paired)",
            Self::EtaSquared => "η²",
            Self::PearsonR => "r",
            Self::SpearmanRho => "ρ",
            Self::CramersV => "Cramér's V",
        }
    }

    /// Short symbol for inline academic notation.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::CohensD | Self::CohensDz => "d",
            Self::EtaSquared => "η²",
            Self::PearsonR => "r",
            Self::SpearmanRho => "ρ",
            Self::CramersV => "V",
        }
    }

    /// Lower bounds for small, medium, and large magnitudes.
    pub fn thresholds(&self) -> (f64, f64, f64) {
        match self {
            Self::CohensD | Self::CohensDz => (0.2, 0.5, 0.8),
            Self::EtaSquared => (0.01, 0.06, 0.14),
            Self::PearsonR | Self::SpearmanRho | Self::CramersV => (0.1, 0.3, 0.5),
        }
    }
}

/// Conventional magnitude categories, ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectMagnitude {
    Negligible,
    Small,
    Medium,
    Large,
}

impl EffectMagnitude {
    /// Classify an effect size by absolute value against the kind's thresholds.
    pub fn classify(kind: EffectSizeKind, value: f64) -> Self {
        let (small, medium, large) = kind.thresholds();
        let magnitude = value.abs();
        if magnitude >= large {
            Self::Large
        } else if magnitude >= medium {
            Self::Medium
        } else if magnitude >= small {
            Self::Small
        } else {
            Self::Negligible
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Negligible => "negligible",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Plain-language adjective used in business summaries.
    pub fn plain(&self) -> &'static str {
        match self {
            Self::Negligible => "negligible",
            Self::Small => "small",
            Self::Medium => "moderate",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for EffectMagnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectSize {
    pub kind: EffectSizeKind,
    pub value: f64,
    pub magnitude: EffectMagnitude,
}

impl EffectSize {
    pub fn new(kind: EffectSizeKind, value: f64) -> Self {
        Self {
            kind,
            value,
            magnitude: EffectMagnitude::classify(kind, value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    /// Confidence level in (0, 1), e.g. 0.95.
    pub level: f64,
    /// What the interval bounds, e.g. "mean difference".
    pub parameter: String,
}

/// Summary statistics for one numeric variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1); 0 for a single value.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub q1: Option<f64>,
    pub q3: Option<f64>,
    pub iqr: Option<f64>,
    pub skewness: Option<f64>,
    /// Coefficient of variation in percent; absent when the mean is zero.
    pub coefficient_of_variation: Option<f64>,
    /// Values outside the Tukey fences.
    pub outliers: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
    pub proportion: f64,
}

/// Frequency distribution of one categorical variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencySummary {
    pub name: String,
    pub total: usize,
    /// Sorted by descending count, then label.
    pub categories: Vec<CategoryCount>,
    pub mode: String,
    pub mode_count: usize,
    /// Shannon entropy in bits.
    pub entropy: f64,
    pub max_entropy: f64,
    pub entropy_ratio: f64,
}

/// Observed and expected counts for a chi-square test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContingencyTable {
    pub row_variable: String,
    pub column_variable: String,
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub observed: Vec<Vec<u64>>,
    pub expected: Vec<Vec<f64>>,
}

/// Immutable result of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub method: MethodKind,
    /// Specific test used, e.g. "Welch's t-test".
    pub test_name: String,
    /// Variables or groups involved, in input order.
    pub variables: Vec<String>,
    pub statistic: Option<TestStatistic>,
    pub degrees_of_freedom: Option<DegreesOfFreedom>,
    pub p_value: Option<f64>,
    pub tail: Tail,
    pub alpha: f64,
    /// `p_value < alpha`; always false without a p-value.
    pub significant: bool,
    pub effect_size: Option<EffectSize>,
    pub confidence_interval: Option<ConfidenceInterval>,
    /// First minus second, for paired and two-sample comparisons.
    pub mean_difference: Option<f64>,
    /// Set when a test assumption is violated but the result is still reported.
    pub low_reliability: bool,
    pub warnings: Vec<String>,
    pub summaries: Vec<VariableSummary>,
    pub frequencies: Vec<FrequencySummary>,
    pub contingency: Option<ContingencyTable>,
    pub interpretation: String,
    pub created_at: DateTime<Utc>,
}

impl Evidence {
    pub fn builder(method: MethodKind, test_name: impl Into<String>) -> EvidenceBuilder {
        EvidenceBuilder::new(method, test_name)
    }

    pub fn magnitude(&self) -> Option<EffectMagnitude> {
        self.effect_size.map(|e| e.magnitude)
    }
}

/// Assembles an `Evidence` record; `build` is the only way to produce one.
#[derive(Debug, Clone)]
pub struct EvidenceBuilder {
    method: MethodKind,
    test_name: String,
    variables: Vec<String>,
    statistic: Option<TestStatistic>,
    degrees_of_freedom: Option<DegreesOfFreedom>,
    p_value: Option<f64>,
    tail: Tail,
    alpha: f64,
    effect_size: Option<EffectSize>,
    confidence_interval: Option<ConfidenceInterval>,
    mean_difference: Option<f64>,
    low_reliability: bool,
    warnings: Vec<String>,
    summaries: Vec<VariableSummary>,
    frequencies: Vec<FrequencySummary>,
    contingency: Option<ContingencyTable>,
}

impl EvidenceBuilder {
    pub fn new(method: MethodKind, test_name: impl Into<String>) -> Self {
        Self {
            method,
            test_name: test_name.into(),
            variables: Vec::new(),
            statistic: None,
            degrees_of_freedom: None,
            p_value: None,
            tail: Tail::TwoSided,
            alpha: crate::constants::DEFAULT_ALPHA,
            effect_size: None,
            confidence_interval: None,
            mean_difference: None,
            low_reliability: false,
            warnings: Vec::new(),
            summaries: Vec::new(),
            frequencies: Vec::new(),
            contingency: None,
        }
    }

    pub fn variables<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn statistic(mut self, kind: StatisticKind, value: f64) -> Self {
        self.statistic = Some(TestStatistic { kind, value });
        self
    }

    pub fn degrees_of_freedom(mut self, df: DegreesOfFreedom) -> Self {
        self.degrees_of_freedom = Some(df);
        self
    }

    pub fn p_value(mut self, p: f64) -> Self {
        self.p_value = Some(p.clamp(0.0, 1.0));
        self
    }

    pub fn tail(mut self, tail: Tail) -> Self {
        self.tail = tail;
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn effect_size(mut self, kind: EffectSizeKind, value: f64) -> Self {
        self.effect_size = Some(EffectSize::new(kind, value));
        self
    }

    pub fn confidence_interval(mut self, ci: Option<ConfidenceInterval>) -> Self {
        self.confidence_interval = ci;
        self
    }

    pub fn mean_difference(mut self, diff: f64) -> Self {
        self.mean_difference = Some(diff);
        self
    }

    pub fn low_reliability(mut self, flag: bool) -> Self {
        self.low_reliability = self.low_reliability || flag;
        self
    }

    pub fn warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn summaries(mut self, summaries: Vec<VariableSummary>) -> Self {
        self.summaries = summaries;
        self
    }

    pub fn frequencies(mut self, frequencies: Vec<FrequencySummary>) -> Self {
        self.frequencies = frequencies;
        self
    }

    pub fn contingency(mut self, table: ContingencyTable) -> Self {
        self.contingency = Some(table);
        self
    }

    pub fn method(&self) -> MethodKind {
        self.method
    }

    pub fn current_p_value(&self) -> Option<f64> {
        self.p_value
    }

    pub fn current_alpha(&self) -> f64 {
        self.alpha
    }

    pub fn current_effect_size(&self) -> Option<EffectSize> {
        self.effect_size
    }

    /// Finalize with the interpretation narrative.
    pub fn build(self, interpretation: impl Into<String>) -> Evidence {
        let significant = self.p_value.map(|p| p < self.alpha).unwrap_or(false);
        Evidence {
            method: self.method,
            test_name: self.test_name,
            variables: self.variables,
            statistic: self.statistic,
            degrees_of_freedom: self.degrees_of_freedom,
            p_value: self.p_value,
            tail: self.tail,
            alpha: self.alpha,
            significant,
            effect_size: self.effect_size,
            confidence_interval: self.confidence_interval,
            mean_difference: self.mean_difference,
            low_reliability: self.low_reliability,
            warnings: self.warnings,
            summaries: self.summaries,
            frequencies: self.frequencies,
            contingency: self.contingency,
            interpretation: interpretation.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cohens_d_thresholds() {
        let k = EffectSizeKind::CohensD;
        assert_eq!(EffectMagnitude::classify(k, 0.1), EffectMagnitude::Negligible);
        assert_eq!(EffectMagnitude::classify(k, 0.2), EffectMagnitude::Small);
        assert_eq!(EffectMagnitude::classify(k, -0.5), EffectMagnitude::Medium);
        assert_eq!(EffectMagnitude::classify(k, 0.8), EffectMagnitude::Large);
        assert_eq!(EffectMagnitude::classify(k, -6.2), EffectMagnitude::Large);
    }

    #[test]
    fn test_eta_squared_thresholds() {
        let k = EffectSizeKind::EtaSquared;
        assert_eq!(EffectMagnitude::classify(k, 0.005), EffectMagnitude::Negligible);
        assert_eq!(EffectMagnitude::classify(k, 0.03), EffectMagnitude::Small);
        assert_eq!(EffectMagnitude::classify(k, 0.1), EffectMagnitude::Medium);
        assert_eq!(EffectMagnitude::classify(k, 0.5), EffectMagnitude::Large);
    }

    #[test]
    fn test_significance_derived_from_alpha() {
        let e = Evidence::builder(MethodKind::TwoSampleComparison, "Welch's t-test")
            .alpha(0.05)
            .p_value(0.049)
            .build("x");
        assert!(e.significant);

        let e = Evidence::builder(MethodKind::TwoSampleComparison, "Welch's t-test")
            .alpha(0.01)
            .p_value(0.049)
            .build("x");
        assert!(!e.significant);

        let e = Evidence::builder(MethodKind::Descriptive, "Descriptive statistics").build("x");
        assert!(!e.significant);
        assert!(e.p_value.is_none());
    }

    #[test]
    fn test_degrees_of_freedom_display() {
        assert_eq!(DegreesOfFreedom::Single(4.0).to_string(), "4");
        assert_eq!(DegreesOfFreedom::Single(3.2456).to_string(), "3.25");
        assert_eq!(
            DegreesOfFreedom::Pair {
                numerator: 2.0,
                denominator: 12.0
            }
            .to_string(),
            "2, 12"
        );
    }
}
