//! One-way analysis of variance across independent groups.
//!
//! With exactly two groups the F statistic is Welch's t squared on
//! (1, Welch df), so the decision matches the two-sample comparison.

use tracing::debug;

use evidence_core::constants::MIN_GROUP_SIZE;
use evidence_core::types::{
    DegreesOfFreedom, EffectSizeKind, Evidence, MethodKind, StatisticKind, Tail,
};
use evidence_core::AnalysisError;

use super::comparison::welch;
use super::distribution::f_sf;
use super::summary::{mean, outlier_warnings, sum_of_squares, summarize};
use super::{require_variation, ProcedureParams};
use crate::interpretation::{self, Narrative};
use crate::selector::NumericSeries;

/// Partition of the total sum of squares.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SumsOfSquares {
    pub between: f64,
    pub within: f64,
}

impl SumsOfSquares {
    pub fn total(&self) -> f64 {
        self.between + self.within
    }

    pub fn eta_squared(&self) -> f64 {
        let total = self.total();
        if total <= 0.0 {
            0.0
        } else {
            self.between / total
        }
    }
}

pub fn sums_of_squares(groups: &[NumericSeries]) -> SumsOfSquares {
    let all: Vec<f64> = groups.iter().flat_map(|g| g.values.iter().copied()).collect();
    let grand_mean = mean(&all);
    let between = groups
        .iter()
        .map(|g| g.len() as f64 * (mean(&g.values) - grand_mean).powi(2))
        .sum();
    let within = groups.iter().map(|g| sum_of_squares(&g.values)).sum();
    SumsOfSquares { between, within }
}

pub fn one_way(
    groups: &[NumericSeries],
    params: &ProcedureParams,
) -> Result<Evidence, AnalysisError> {
    if groups.len() < 2 {
        return Err(AnalysisError::insufficient(format!(
            "need at least two groups, got {}",
            groups.len()
        )));
    }
    if let Some(small) = groups.iter().find(|g| g.len() < MIN_GROUP_SIZE) {
        return Err(AnalysisError::insufficient(format!(
            "group '{}' has {} value(s); at least {} are required",
            small.name,
            small.len(),
            MIN_GROUP_SIZE
        )));
    }

    for group in groups {
        require_variation(group)?;
    }

    let ss = sums_of_squares(groups);
    if ss.within <= 0.0 || !ss.within.is_finite() {
        return Err(AnalysisError::degenerate(
            "all groups have zero within-group variance; F is undefined",
        ));
    }

    let k = groups.len() as f64;
    let n: f64 = groups.iter().map(|g| g.len() as f64).sum();

    let (test_name, f, df_between, df_within) = if groups.len() == 2 {
        let stat = welch(&groups[0].values, &groups[1].values)?;
        ("Welch's ANOVA (two groups)", stat.t * stat.t, 1.0, stat.df)
    } else {
        let df_between = k - 1.0;
        let df_within = n - k;
        let f = (ss.between / df_between) / (ss.within / df_within);
        ("One-way ANOVA", f, df_between, df_within)
    };
    let p_value = f_sf(f, df_between, df_within)?;
    let eta_squared = ss.eta_squared();
    debug!(f, df_between, df_within, p_value, eta_squared, "anova computed");

    let summaries: Vec<_> = groups
        .iter()
        .map(|g| summarize(g, params.iqr_multiplier))
        .collect();
    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();

    let mut builder = Evidence::builder(MethodKind::MultiGroupComparison, test_name)
        .variables(names.iter().copied())
        .statistic(StatisticKind::F, f)
        .degrees_of_freedom(DegreesOfFreedom::Pair {
            numerator: df_between,
            denominator: df_within,
        })
        .p_value(p_value)
        .alpha(params.alpha)
        .effect_size(EffectSizeKind::EtaSquared, eta_squared);
    if groups.len() == 2 {
        builder = builder.warning("only two groups: F equals the squared Welch t statistic");
    }
    if !params.tail.is_two_sided() {
        builder = builder.warning(format!(
            "'{}' alternative ignored: the F test is upper-tailed",
            params.tail
        ));
    }
    for warning in outlier_warnings(&summaries) {
        builder = builder.warning(warning);
    }

    let effect = builder
        .current_effect_size()
        .ok_or_else(|| AnalysisError::degenerate("effect size unavailable"))?;
    let narrative = Narrative {
        method: MethodKind::MultiGroupComparison,
        subject: interpretation::subject(&names),
        p_value: builder.current_p_value().unwrap_or(1.0),
        alpha: params.alpha,
        // F is upper-tailed; a one-tailed request does not apply.
        tail: Tail::TwoSided,
        effect: &effect,
        mean_difference: None,
    }
    .render();
    Ok(builder.summaries(summaries).build(narrative))
}
