//! Correlation between two numeric variables.
//!
//! Pearson's r by default. Spearman's rho is used instead when either
//! variable is already a rank sequence, or when Jarque–Bera rejects
//! normality for either variable at the 5% level (only once the sample
//! reaches `normality_min_sample`).

use tracing::debug;

use evidence_core::constants::MIN_CORRELATION_PAIRS;
use evidence_core::types::{
    ConfidenceInterval, DegreesOfFreedom, EffectSizeKind, Evidence, MethodKind, StatisticKind,
    Tail,
};
use evidence_core::AnalysisError;

use super::distribution::{chi_square_sf, t_p_value, z_critical};
use super::summary::{central_moments, mean, outlier_warnings, summarize};
use super::ProcedureParams;
use crate::interpretation::{self, Narrative};
use crate::selector::NumericSeries;

/// Significance level of the normality screen.
const NORMALITY_ALPHA: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coefficient {
    Pearson,
    Spearman,
}

impl Coefficient {
    pub fn test_name(&self) -> &'static str {
        match self {
            Self::Pearson => "Pearson correlation",
            Self::Spearman => "Spearman rank correlation",
        }
    }

    fn statistic_kind(&self) -> StatisticKind {
        match self {
            Self::Pearson => StatisticKind::PearsonR,
            Self::Spearman => StatisticKind::SpearmanRho,
        }
    }

    fn effect_kind(&self) -> EffectSizeKind {
        match self {
            Self::Pearson => EffectSizeKind::PearsonR,
            Self::Spearman => EffectSizeKind::SpearmanRho,
        }
    }
}

/// Why Spearman replaced Pearson.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    RankedData { variable: String },
    NonNormal { variable: String, p_value: f64 },
}

impl FallbackReason {
    pub fn describe(&self) -> String {
        match self {
            Self::RankedData { variable } => {
                format!("Spearman's rho used: '{variable}' is a rank sequence")
            }
            Self::NonNormal { variable, p_value } => format!(
                "Spearman's rho used: '{variable}' departs from normality (Jarque-Bera p = {p_value:.3})"
            ),
        }
    }
}

/// Pearson product-moment correlation. Zero variance on either side is degenerate.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64, AnalysisError> {
    let (mx, my) = (mean(x), mean(y));
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return Err(AnalysisError::degenerate(
            "a variable has zero variance; the correlation is undefined",
        ));
    }
    Ok((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Ranks starting at 1, ties receiving the average of their positions.
pub fn ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // positions i..=j share the average 1-based rank
        let average = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = average;
        }
        i = j + 1;
    }
    ranks
}

/// True when the values are a permutation of 1..=n.
pub fn is_rank_sequence(values: &[f64]) -> bool {
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
        .iter()
        .enumerate()
        .all(|(i, v)| *v == (i + 1) as f64)
}

/// Jarque–Bera statistic and p-value, `None` without spread.
pub fn jarque_bera(values: &[f64]) -> Option<(f64, f64)> {
    let n = values.len() as f64;
    let (m2, m3, m4) = central_moments(values);
    if m2 <= 0.0 {
        return None;
    }
    let skew = m3 / m2.powf(1.5);
    let kurtosis = m4 / (m2 * m2);
    let jb = n / 6.0 * (skew * skew + (kurtosis - 3.0).powi(2) / 4.0);
    chi_square_sf(jb, 2.0).ok().map(|p| (jb, p))
}

fn fallback_reason(
    x: &NumericSeries,
    y: &NumericSeries,
    params: &ProcedureParams,
) -> Option<FallbackReason> {
    for series in [x, y] {
        if is_rank_sequence(&series.values) {
            return Some(FallbackReason::RankedData {
                variable: series.name.clone(),
            });
        }
    }
    if x.len() < params.normality_min_sample {
        return None;
    }
    for series in [x, y] {
        if let Some((_, p_value)) = jarque_bera(&series.values) {
            if p_value < NORMALITY_ALPHA {
                return Some(FallbackReason::NonNormal {
                    variable: series.name.clone(),
                    p_value,
                });
            }
        }
    }
    None
}

fn correlation_p_value(r: f64, n: f64, tail: Tail) -> Result<f64, AnalysisError> {
    let residual = 1.0 - r * r;
    if residual <= f64::EPSILON {
        // perfect association
        return Ok(match tail {
            Tail::TwoSided => 0.0,
            Tail::Greater => if r > 0.0 { 0.0 } else { 1.0 },
            Tail::Less => if r < 0.0 { 0.0 } else { 1.0 },
        });
    }
    let t = r * ((n - 2.0) / residual).sqrt();
    t_p_value(t, n - 2.0, tail)
}

/// Fisher z interval; needs more than three pairs.
fn fisher_interval(r: f64, n: usize, level: f64) -> Result<Option<ConfidenceInterval>, AnalysisError> {
    if n <= 3 {
        return Ok(None);
    }
    let z = r.clamp(-1.0, 1.0).atanh();
    let half_width = z_critical(level)? / ((n - 3) as f64).sqrt();
    Ok(Some(ConfidenceInterval {
        lower: (z - half_width).tanh(),
        upper: (z + half_width).tanh(),
        level,
        parameter: "correlation coefficient".to_string(),
    }))
}

pub fn analyze(
    x: &NumericSeries,
    y: &NumericSeries,
    params: &ProcedureParams,
) -> Result<Evidence, AnalysisError> {
    if x.len() != y.len() {
        return Err(AnalysisError::unsupported(
            MethodKind::Correlation.name(),
            format!(
                "variables must have equal length ({} vs {})",
                x.len(),
                y.len()
            ),
        ));
    }
    if x.len() < MIN_CORRELATION_PAIRS {
        return Err(AnalysisError::insufficient(format!(
            "correlation needs at least {} pairs, got {}",
            MIN_CORRELATION_PAIRS,
            x.len()
        )));
    }

    // Degenerate input is rejected before any fallback decision.
    let pearson_r = pearson(&x.values, &y.values)?;
    let fallback = fallback_reason(x, y, params);
    let (coefficient, r) = match fallback {
        Some(_) => (
            Coefficient::Spearman,
            pearson(&ranks(&x.values), &ranks(&y.values))?,
        ),
        None => (Coefficient::Pearson, pearson_r),
    };

    let n = x.len();
    let p_value = correlation_p_value(r, n as f64, params.tail)?;
    let ci = fisher_interval(r, n, params.confidence_level)?;
    debug!(
        coefficient = coefficient.test_name(),
        r,
        p_value,
        n,
        "correlation computed"
    );

    let summaries = vec![
        summarize(x, params.iqr_multiplier),
        summarize(y, params.iqr_multiplier),
    ];
    let mut builder = Evidence::builder(MethodKind::Correlation, coefficient.test_name())
        .variables([x.name.clone(), y.name.clone()])
        .statistic(coefficient.statistic_kind(), r)
        .degrees_of_freedom(DegreesOfFreedom::Single((n - 2) as f64))
        .p_value(p_value)
        .tail(params.tail)
        .alpha(params.alpha)
        .effect_size(coefficient.effect_kind(), r)
        .confidence_interval(ci);
    if let Some(reason) = &fallback {
        builder = builder.warning(reason.describe());
    }
    if n <= 3 {
        builder = builder.warning("confidence interval omitted: Fisher z needs more than three pairs");
    }
    for warning in outlier_warnings(&summaries) {
        builder = builder.warning(warning);
    }

    let effect = builder
        .current_effect_size()
        .ok_or_else(|| AnalysisError::degenerate("effect size unavailable"))?;
    let narrative = Narrative {
        method: MethodKind::Correlation,
        subject: interpretation::subject(&[x.name.as_str(), y.name.as_str()]),
        p_value: builder.current_p_value().unwrap_or(1.0),
        alpha: params.alpha,
        tail: params.tail,
        effect: &effect,
        mean_difference: None,
    }
    .render();
    let narrative = format!(
        "{narrative} {}² = {:.2} ({:.1}% shared variance).",
        effect.kind.symbol(),
        r * r,
        r * r * 100.0
    );
    Ok(builder.summaries(summaries).build(narrative))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(name: &str, values: &[f64]) -> NumericSeries {
        NumericSeries::new(name, values.to_vec())
    }

    #[test]
    fn test_ranks_average_ties() {
        assert_eq!(ranks(&[10.0, 20.0, 20.0, 5.0]), vec![2.0, 3.5, 3.5, 1.0]);
    }

    #[test]
    fn test_rank_sequence_detection() {
        assert!(is_rank_sequence(&[3.0, 1.0, 2.0]));
        assert!(!is_rank_sequence(&[1.0, 2.0, 4.0]));
        assert!(!is_rank_sequence(&[1.5, 2.0, 3.0]));
    }

    #[test]
    fn test_pearson_known_value() {
        let e = analyze(
            &series("x", &[1.0, 2.5, 3.1, 4.8, 5.2]),
            &series("y", &[2.1, 3.9, 6.2, 8.1, 9.7]),
            &ProcedureParams::default(),
        )
        .unwrap();
        assert_eq!(e.test_name, "Pearson correlation");
        let r = e.statistic.unwrap().value;
        assert!(r > 0.95 && r <= 1.0, "r = {r}");
        assert!(e.significant);
        assert_eq!(e.degrees_of_freedom, Some(DegreesOfFreedom::Single(3.0)));
        assert!((r - 0.983746).abs() < 1e-5, "r = {r}");
        // tanh(atanh(r) ± 1.959964 / sqrt(2))
        let ci = e.confidence_interval.unwrap();
        assert!((ci.lower - 0.768350).abs() < 1e-5, "lower = {}", ci.lower);
        assert!((ci.upper - 0.998976).abs() < 1e-5, "upper = {}", ci.upper);
        assert_eq!(ci.level, 0.95);
    }

    #[test]
    fn test_fisher_interval_known_bounds() {
        // r = .6, n = 28: atanh(.6) ± 1.959964 / 5
        let ci = fisher_interval(0.6, 28, 0.95).unwrap().unwrap();
        assert!((ci.lower - 0.292369).abs() < 1e-5, "lower = {}", ci.lower);
        assert!((ci.upper - 0.795097).abs() < 1e-5, "upper = {}", ci.upper);
        assert!(fisher_interval(0.6, 3, 0.95).unwrap().is_none());
    }

    #[test]
    fn test_ranked_data_uses_spearman() {
        let e = analyze(
            &series("judge_a", &[1.0, 2.0, 3.0, 4.0, 5.0]),
            &series("judge_b", &[2.0, 1.0, 4.0, 3.0, 5.0]),
            &ProcedureParams::default(),
        )
        .unwrap();
        assert_eq!(e.test_name, "Spearman rank correlation");
        assert_eq!(e.statistic.unwrap().kind, StatisticKind::SpearmanRho);
        assert!((e.statistic.unwrap().value - 0.8).abs() < 1e-12);
        assert!(e.warnings.iter().any(|w| w.contains("rank sequence")));
    }

    #[test]
    fn test_heavy_tail_falls_back() {
        let x: Vec<f64> = vec![1.0, 1.1, 0.9, 1.0, 1.2, 0.8, 1.0, 1.1, 0.9, 50.0];
        let y: Vec<f64> = vec![2.0, 2.3, 1.7, 2.1, 2.4, 1.5, 2.0, 2.2, 1.9, 3.0];
        let e = analyze(&series("x", &x), &series("y", &y), &ProcedureParams::default()).unwrap();
        assert_eq!(e.test_name, "Spearman rank correlation");
        assert!(e.warnings.iter().any(|w| w.contains("normality")));
    }

    #[test]
    fn test_perfect_correlation_p_zero() {
        let e = analyze(
            &series("x", &[1.5, 2.5, 3.5, 4.5]),
            &series("y", &[3.0, 5.0, 7.0, 9.0]),
            &ProcedureParams::default(),
        )
        .unwrap();
        assert_eq!(e.p_value, Some(0.0));
        assert!(e.significant);
    }

    #[test]
    fn test_constant_variable_degenerate() {
        let err = analyze(
            &series("x", &[1.0, 2.0, 3.0]),
            &series("y", &[4.0, 4.0, 4.0]),
            &ProcedureParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateInput { .. }));
    }

    #[test]
    fn test_two_pairs_insufficient() {
        let err = analyze(
            &series("x", &[1.0, 2.0]),
            &series("y", &[4.0, 5.0]),
            &ProcedureParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData { .. }));
    }
}
