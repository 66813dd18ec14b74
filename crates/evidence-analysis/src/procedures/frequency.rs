//! Frequency distribution of categorical variables.

use std::collections::BTreeMap;

use evidence_core::types::{CategoryCount, Evidence, FrequencySummary, MethodKind};
use evidence_core::AnalysisError;

use crate::interpretation;
use crate::selector::CategoricalSeries;

/// Counts, proportions, mode, and Shannon entropy for one series.
pub fn summarize_categories(series: &CategoricalSeries) -> FrequencySummary {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in &series.labels {
        *counts.entry(label.as_str()).or_insert(0) += 1;
    }
    let total = series.len();

    let mut categories: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(label, count)| CategoryCount {
            label: label.to_string(),
            count,
            proportion: if total > 0 {
                count as f64 / total as f64
            } else {
                0.0
            },
        })
        .collect();
    // descending count, ties by label
    categories.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

    let entropy: f64 = categories
        .iter()
        .filter(|c| c.proportion > 0.0)
        .map(|c| -c.proportion * c.proportion.log2())
        .sum();
    let max_entropy = if categories.len() > 1 {
        (categories.len() as f64).log2()
    } else {
        0.0
    };
    let entropy_ratio = if max_entropy > 0.0 {
        entropy / max_entropy
    } else {
        0.0
    };
    let (mode, mode_count) = categories
        .first()
        .map(|c| (c.label.clone(), c.count))
        .unwrap_or_default();

    FrequencySummary {
        name: series.name.clone(),
        total,
        categories,
        mode,
        mode_count,
        entropy,
        max_entropy,
        entropy_ratio,
    }
}

pub fn analyze(variables: &[CategoricalSeries]) -> Result<Evidence, AnalysisError> {
    if variables.iter().all(|v| v.is_empty()) {
        return Err(AnalysisError::insufficient(
            "no categorical values to count",
        ));
    }
    let frequencies: Vec<FrequencySummary> =
        variables.iter().map(summarize_categories).collect();
    let narrative = interpretation::frequency(&frequencies);
    Ok(Evidence::builder(MethodKind::Frequency, "Frequency analysis")
        .variables(variables.iter().map(|v| v.name.clone()))
        .frequencies(frequencies)
        .build(narrative))
}
