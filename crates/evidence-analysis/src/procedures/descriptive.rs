//! Descriptive-only analysis.

use evidence_core::types::{Evidence, MethodKind};
use evidence_core::AnalysisError;

use super::summary::{outlier_warnings, summarize};
use super::ProcedureParams;
use crate::interpretation;
use crate::selector::NumericSeries;

pub fn analyze(
    variables: &[NumericSeries],
    params: &ProcedureParams,
) -> Result<Evidence, AnalysisError> {
    if variables.is_empty() {
        return Err(AnalysisError::insufficient("no numeric variables to summarize"));
    }
    let summaries: Vec<_> = variables
        .iter()
        .map(|v| summarize(v, params.iqr_multiplier))
        .collect();
    let narrative = interpretation::descriptive(&summaries);

    let mut builder = Evidence::builder(MethodKind::Descriptive, "Descriptive statistics")
        .variables(variables.iter().map(|v| v.name.clone()))
        .alpha(params.alpha);
    for warning in outlier_warnings(&summaries) {
        builder = builder.warning(warning);
    }
    Ok(builder.summaries(summaries).build(narrative))
}
