//! Two-condition mean comparisons: paired t-test and Welch's t-test.

use tracing::debug;

use evidence_core::constants::MIN_GROUP_SIZE;
use evidence_core::types::{
    DegreesOfFreedom, EffectSizeKind, Evidence, MethodKind, StatisticKind, VariableSummary,
};
use evidence_core::AnalysisError;

use super::distribution::{t_critical, t_p_value};
use super::summary::{mean, outlier_warnings, summarize, variance};
use super::{interval, require_variation, ProcedureParams};
use crate::interpretation::{self, Narrative};
use crate::selector::NumericSeries;

fn require_group_size(series: &NumericSeries) -> Result<(), AnalysisError> {
    if series.len() < MIN_GROUP_SIZE {
        return Err(AnalysisError::insufficient(format!(
            "'{}' has {} value(s); at least {} are required",
            series.name,
            series.len(),
            MIN_GROUP_SIZE
        )));
    }
    Ok(())
}

/// Welch's t statistic, degrees of freedom, and standard error for `first - second`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WelchStatistic {
    pub t: f64,
    pub df: f64,
    pub standard_error: f64,
    pub mean_difference: f64,
}

pub fn welch(first: &[f64], second: &[f64]) -> Result<WelchStatistic, AnalysisError> {
    let (n1, n2) = (first.len() as f64, second.len() as f64);
    let (v1, v2) = (variance(first), variance(second));
    let (a, b) = (v1 / n1, v2 / n2);
    let se2 = a + b;
    if se2 <= 0.0 || !se2.is_finite() {
        return Err(AnalysisError::degenerate(
            "both groups have zero variance; the t statistic is undefined",
        ));
    }
    let mean_difference = mean(first) - mean(second);
    let standard_error = se2.sqrt();
    let df = se2 * se2 / (a * a / (n1 - 1.0) + b * b / (n2 - 1.0));
    Ok(WelchStatistic {
        t: mean_difference / standard_error,
        df,
        standard_error,
        mean_difference,
    })
}

/// Cohen's d with the pooled standard deviation.
pub fn cohens_d(first: &[f64], second: &[f64]) -> Option<f64> {
    let (n1, n2) = (first.len() as f64, second.len() as f64);
    if n1 + n2 <= 2.0 {
        return None;
    }
    let pooled = (((n1 - 1.0) * variance(first) + (n2 - 1.0) * variance(second))
        / (n1 + n2 - 2.0))
        .sqrt();
    if pooled <= 0.0 || !pooled.is_finite() {
        return None;
    }
    Some((mean(first) - mean(second)) / pooled)
}

fn pair_summaries(
    first: &NumericSeries,
    second: &NumericSeries,
    params: &ProcedureParams,
) -> Vec<VariableSummary> {
    vec![
        summarize(first, params.iqr_multiplier),
        summarize(second, params.iqr_multiplier),
    ]
}

/// Independent two-sample comparison with unequal variances.
pub fn two_sample(
    first: &NumericSeries,
    second: &NumericSeries,
    params: &ProcedureParams,
) -> Result<Evidence, AnalysisError> {
    require_group_size(first)?;
    require_group_size(second)?;
    require_variation(first)?;
    require_variation(second)?;

    let stat = welch(&first.values, &second.values)?;
    let p_value = t_p_value(stat.t, stat.df, params.tail)?;
    let d = cohens_d(&first.values, &second.values)
        .ok_or_else(|| AnalysisError::degenerate("pooled standard deviation is zero"))?;
    let half_width = t_critical(stat.df, params.confidence_level)? * stat.standard_error;
    debug!(t = stat.t, df = stat.df, p_value, d, "welch t-test computed");

    let summaries = pair_summaries(first, second, params);
    let builder = Evidence::builder(MethodKind::TwoSampleComparison, "Welch's t-test")
        .variables([first.name.clone(), second.name.clone()])
        .statistic(StatisticKind::T, stat.t)
        .degrees_of_freedom(DegreesOfFreedom::Single(stat.df))
        .p_value(p_value)
        .tail(params.tail)
        .alpha(params.alpha)
        .effect_size(EffectSizeKind::CohensD, d)
        .mean_difference(stat.mean_difference)
        .confidence_interval(interval(
            stat.mean_difference,
            half_width,
            params.confidence_level,
            "mean difference",
        ));
    finish(builder, summaries, &first.name, &second.name, stat.mean_difference, params)
}

/// Paired comparison on per-unit differences `first - second`.
pub fn paired(
    first: &NumericSeries,
    second: &NumericSeries,
    params: &ProcedureParams,
) -> Result<Evidence, AnalysisError> {
    if first.len() != second.len() {
        return Err(AnalysisError::unsupported(
            MethodKind::PairedComparison.name(),
            format!(
                "paired measurements must have equal length ({} vs {})",
                first.len(),
                second.len()
            ),
        ));
    }
    require_group_size(first)?;
    require_variation(first)?;
    require_variation(second)?;

    let differences: Vec<f64> = first
        .values
        .iter()
        .zip(&second.values)
        .map(|(a, b)| a - b)
        .collect();
    let n = differences.len() as f64;
    let mean_difference = mean(&differences);
    let sd = variance(&differences).sqrt();
    if sd <= 0.0 || !sd.is_finite() {
        return Err(AnalysisError::degenerate(
            "paired differences are constant; the t statistic is undefined",
        ));
    }
    let standard_error = sd / n.sqrt();
    let t = mean_difference / standard_error;
    let df = n - 1.0;
    let p_value = t_p_value(t, df, params.tail)?;
    let dz = mean_difference / sd;
    let half_width = t_critical(df, params.confidence_level)? * standard_error;
    debug!(t, df, p_value, dz, "paired t-test computed");

    let summaries = pair_summaries(first, second, params);
    let builder = Evidence::builder(MethodKind::PairedComparison, "Paired t-test")
        .variables([first.name.clone(), second.name.clone()])
        .statistic(StatisticKind::T, t)
        .degrees_of_freedom(DegreesOfFreedom::Single(df))
        .p_value(p_value)
        .tail(params.tail)
        .alpha(params.alpha)
        .effect_size(EffectSizeKind::CohensDz, dz)
        .mean_difference(mean_difference)
        .confidence_interval(interval(
            mean_difference,
            half_width,
            params.confidence_level,
            "mean difference",
        ));
    finish(builder, summaries, &first.name, &second.name, mean_difference, params)
}

fn finish(
    mut builder: evidence_core::EvidenceBuilder,
    summaries: Vec<VariableSummary>,
    first: &str,
    second: &str,
    mean_difference: f64,
    params: &ProcedureParams,
) -> Result<Evidence, AnalysisError> {
    for warning in outlier_warnings(&summaries) {
        builder = builder.warning(warning);
    }
    let method = builder.method();
    let p_value = builder.current_p_value().unwrap_or(1.0);
    let effect = builder
        .current_effect_size()
        .ok_or_else(|| AnalysisError::degenerate("effect size unavailable"))?;
    let narrative = Narrative {
        method,
        subject: interpretation::subject(&[first, second]),
        p_value,
        alpha: params.alpha,
        tail: params.tail,
        effect: &effect,
        mean_difference: Some(mean_difference),
    }
    .render();
    Ok(builder.summaries(summaries).build(narrative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use evidence_core::types::{EffectMagnitude, Tail};

    fn series(name: &str, values: &[f64]) -> NumericSeries {
        NumericSeries::new(name, values.to_vec())
    }

    #[test]
    fn test_welch_known_values() {
        let e = two_sample(
            &series("control", &[6.1, 5.8, 6.2]),
            &series("test", &[7.8, 8.2, 7.5]),
            &ProcedureParams::default(),
        )
        .unwrap();
        let t = e.statistic.unwrap().value;
        assert!((t - (-7.637)).abs() < 1e-2, "t = {t}");
        match e.degrees_of_freedom.unwrap() {
            DegreesOfFreedom::Single(df) => assert!((df - 3.25).abs() < 1e-2, "df = {df}"),
            other => panic!("unexpected df {other:?}"),
        }
        let p = e.p_value.unwrap();
        assert!(p < 0.01, "p = {p}");
        assert!(e.significant);
        let d = e.effect_size.unwrap();
        assert!((d.value - (-6.235)).abs() < 1e-2);
        assert_eq!(d.magnitude, EffectMagnitude::Large);
        assert!((e.mean_difference.unwrap() + 1.8).abs() < 1e-9);
        let ci = e.confidence_interval.unwrap();
        assert!(ci.lower < -1.8 && ci.upper > -1.8 && ci.upper < 0.0);
    }

    #[test]
    fn test_paired_known_values() {
        let e = paired(
            &series("before", &[10.0, 12.0, 14.0, 16.0]),
            &series("after", &[11.0, 14.0, 15.0, 18.0]),
            &ProcedureParams::default(),
        )
        .unwrap();
        // differences -1, -2, -1, -2: mean -1.5, sd 0.57735
        let t = e.statistic.unwrap().value;
        assert!((t - (-5.196)).abs() < 1e-3, "t = {t}");
        assert_eq!(e.degrees_of_freedom, Some(DegreesOfFreedom::Single(3.0)));
        let dz = e.effect_size.unwrap();
        assert_eq!(dz.kind, EffectSizeKind::CohensDz);
        assert!((dz.value - (-2.598)).abs() < 1e-3);
    }

    #[test]
    fn test_one_tailed_halves_p() {
        let a = series("a", &[5.0, 6.0, 7.0, 8.0]);
        let b = series("b", &[3.0, 4.0, 5.0, 5.5]);
        let two = two_sample(&a, &b, &ProcedureParams::default()).unwrap();
        let greater = two_sample(
            &a,
            &b,
            &ProcedureParams {
                tail: Tail::Greater,
                ..ProcedureParams::default()
            },
        )
        .unwrap();
        assert!((two.p_value.unwrap() - 2.0 * greater.p_value.unwrap()).abs() < 1e-12);
        assert_eq!(greater.tail, Tail::Greater);
    }

    #[test]
    fn test_zero_variance_is_degenerate() {
        let err = two_sample(
            &series("a", &[1.0, 1.0]),
            &series("b", &[2.0, 2.0]),
            &ProcedureParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateInput { .. }));

        let err = paired(
            &series("before", &[1.0, 2.0, 3.0]),
            &series("after", &[2.0, 3.0, 4.0]),
            &ProcedureParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateInput { .. }));
    }

    #[test]
    fn test_one_constant_group_is_degenerate() {
        let err = two_sample(
            &series("a", &[5.0, 5.0, 5.0]),
            &series("b", &[6.0, 7.0, 8.0]),
            &ProcedureParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateInput { .. }));
        assert!(err.to_string().contains("'a'"));

        let err = paired(
            &series("before", &[6.0, 7.0, 9.0]),
            &series("after", &[4.0, 4.0, 4.0]),
            &ProcedureParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateInput { .. }));
    }

    #[test]
    fn test_small_group_insufficient() {
        let err = two_sample(
            &series("a", &[1.0]),
            &series("b", &[2.0, 3.0]),
            &ProcedureParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData { .. }));
    }
}
