//! Chi-square test of independence between two categorical variables.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use evidence_core::types::{
    ContingencyTable, DegreesOfFreedom, EffectSizeKind, Evidence, MethodKind, StatisticKind, Tail,
};
use evidence_core::AnalysisError;

use super::distribution::chi_square_sf;
use super::frequency::summarize_categories;
use super::ProcedureParams;
use crate::interpretation::{self, Narrative};
use crate::selector::CategoricalSeries;

/// Cross-tabulate two aligned categorical series. Categories are sorted by label.
pub fn contingency_table(rows: &CategoricalSeries, columns: &CategoricalSeries) -> ContingencyTable {
    let row_labels = sorted_labels(&rows.labels);
    let column_labels = sorted_labels(&columns.labels);
    let row_index: BTreeMap<&str, usize> = row_labels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect();
    let column_index: BTreeMap<&str, usize> = column_labels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect();

    let mut observed = vec![vec![0u64; column_labels.len()]; row_labels.len()];
    for (r, c) in rows.labels.iter().zip(&columns.labels) {
        if let (Some(&i), Some(&j)) = (row_index.get(r.as_str()), column_index.get(c.as_str())) {
            observed[i][j] += 1;
        }
    }

    let n: u64 = observed.iter().flatten().sum();
    let row_totals: Vec<u64> = observed.iter().map(|row| row.iter().sum()).collect();
    let column_totals: Vec<u64> = (0..column_labels.len())
        .map(|j| observed.iter().map(|row| row[j]).sum())
        .collect();
    let expected: Vec<Vec<f64>> = row_totals
        .iter()
        .map(|&rt| {
            column_totals
                .iter()
                .map(|&ct| {
                    if n == 0 {
                        0.0
                    } else {
                        rt as f64 * ct as f64 / n as f64
                    }
                })
                .collect()
        })
        .collect();

    ContingencyTable {
        row_variable: rows.name.clone(),
        column_variable: columns.name.clone(),
        row_labels,
        column_labels,
        observed,
        expected,
    }
}

fn sorted_labels(labels: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = labels.to_vec();
    unique.sort();
    unique.dedup();
    unique
}

/// Pearson's chi-square statistic over all cells with a positive expectation.
pub fn chi_square_statistic(table: &ContingencyTable) -> f64 {
    table
        .observed
        .iter()
        .zip(&table.expected)
        .flat_map(|(obs_row, exp_row)| obs_row.iter().zip(exp_row))
        .filter(|(_, e)| **e > 0.0)
        .map(|(&o, &e)| (o as f64 - e).powi(2) / e)
        .sum()
}

pub fn independence(
    rows: &CategoricalSeries,
    columns: &CategoricalSeries,
    ignored: &[String],
    params: &ProcedureParams,
) -> Result<Evidence, AnalysisError> {
    if rows.len() != columns.len() {
        return Err(AnalysisError::ambiguous(format!(
            "'{}' and '{}' have different lengths ({} vs {})",
            rows.name,
            columns.name,
            rows.len(),
            columns.len()
        )));
    }
    if rows.len() < 2 {
        return Err(AnalysisError::insufficient(
            "chi-square needs at least two observations",
        ));
    }

    let table = contingency_table(rows, columns);
    let (r, c) = (table.row_labels.len(), table.column_labels.len());
    if r < 2 || c < 2 {
        let single = if r < 2 { &rows.name } else { &columns.name };
        return Err(AnalysisError::degenerate(format!(
            "'{single}' has a single category; independence cannot be tested"
        )));
    }

    let n = rows.len() as f64;
    let chi_square = chi_square_statistic(&table);
    let df = ((r - 1) * (c - 1)) as f64;
    let p_value = chi_square_sf(chi_square, df)?;
    let min_dim = (r.min(c) - 1) as f64;
    let cramers_v = (chi_square / (n * min_dim)).sqrt().clamp(0.0, 1.0);
    debug!(chi_square, df, p_value, cramers_v, "chi-square computed");

    let mut low_cells = Vec::new();
    for (i, row) in table.expected.iter().enumerate() {
        for (j, &e) in row.iter().enumerate() {
            if e < params.min_expected_count {
                low_cells.push(format!(
                    "({}, {}) expected {:.2}",
                    table.row_labels[i], table.column_labels[j], e
                ));
            }
        }
    }
    let low_reliability = !low_cells.is_empty();

    let mut builder =
        Evidence::builder(MethodKind::CategoricalIndependence, "Chi-square test of independence")
            .variables([rows.name.clone(), columns.name.clone()])
            .statistic(StatisticKind::ChiSquare, chi_square)
            .degrees_of_freedom(DegreesOfFreedom::Single(df))
            .p_value(p_value)
            .alpha(params.alpha)
            .effect_size(EffectSizeKind::CramersV, cramers_v)
            .low_reliability(low_reliability);
    if low_reliability {
        warn!(
            cells = low_cells.len(),
            min_expected = params.min_expected_count,
            "chi-square expected counts below minimum"
        );
        builder = builder.warning(format!(
            "{} of {} cells have expected counts below {}: {}",
            low_cells.len(),
            r * c,
            params.min_expected_count,
            low_cells.join("; ")
        ));
    }
    if !ignored.is_empty() {
        builder = builder.warning(format!(
            "only '{}' and '{}' were cross-tabulated; ignored: {}",
            rows.name,
            columns.name,
            ignored.join(", ")
        ));
    }
    if !params.tail.is_two_sided() {
        builder = builder.warning(format!(
            "'{}' alternative ignored: the chi-square test is upper-tailed",
            params.tail
        ));
    }

    let effect = builder
        .current_effect_size()
        .ok_or_else(|| AnalysisError::degenerate("effect size unavailable"))?;
    let mut narrative = Narrative {
        method: MethodKind::CategoricalIndependence,
        subject: interpretation::subject(&[rows.name.as_str(), columns.name.as_str()]),
        p_value,
        alpha: params.alpha,
        tail: Tail::TwoSided,
        effect: &effect,
        mean_difference: None,
    }
    .render();
    if low_reliability {
        narrative.push_str(" Interpret with caution: some expected counts are small.");
    }

    Ok(builder
        .frequencies(vec![summarize_categories(rows), summarize_categories(columns)])
        .contingency(table)
        .build(narrative))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(name: &str, labels: &[&str]) -> CategoricalSeries {
        CategoricalSeries::new(name, labels.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_small_table_known_values() {
        let e = independence(
            &cat("age_group", &["18-25", "26-35", "18-25"]),
            &cat("pref", &["A", "B", "A"]),
            &[],
            &ProcedureParams::default(),
        )
        .unwrap();
        let table = e.contingency.as_ref().unwrap();
        assert_eq!(table.row_labels, vec!["18-25", "26-35"]);
        assert_eq!(table.observed, vec![vec![2, 0], vec![0, 1]]);
        assert!((e.statistic.unwrap().value - 3.0).abs() < 1e-9);
        assert!((e.effect_size.unwrap().value - 1.0).abs() < 1e-9);
        assert!(e.low_reliability);
        assert!(!e.warnings.is_empty());
    }

    #[test]
    fn test_large_independent_table() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        for i in 0..200 {
            a.push(if i % 2 == 0 { "x" } else { "y" });
            b.push(if (i / 2) % 2 == 0 { "p" } else { "q" });
        }
        let e = independence(&cat("a", &a), &cat("b", &b), &[], &ProcedureParams::default()).unwrap();
        assert!(e.statistic.unwrap().value.abs() < 1e-9);
        assert!(!e.significant);
        assert!(!e.low_reliability);
    }

    #[test]
    fn test_single_category_degenerate() {
        let err = independence(
            &cat("a", &["x", "x", "x"]),
            &cat("b", &["p", "q", "p"]),
            &[],
            &ProcedureParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateInput { .. }));
    }

    #[test]
    fn test_ignored_variables_warned() {
        let e = independence(
            &cat("a", &["x", "y", "x", "y"]),
            &cat("b", &["p", "q", "q", "p"]),
            &["c".to_string(), "d".to_string()],
            &ProcedureParams::default(),
        )
        .unwrap();
        assert_eq!(e.variables, vec!["a", "b"]);
        assert!(e.warnings.iter().any(|w| w.contains("ignored: c, d")));
    }
}
