//! Per-variable summary statistics and Tukey-fence outliers.

use evidence_core::constants::MIN_QUARTILE_SAMPLE;
use evidence_core::types::VariableSummary;

use crate::selector::NumericSeries;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n - 1 denominator). Zero for fewer than two values.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    ss / (values.len() - 1) as f64
}

pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Sum of squared deviations from the mean.
pub fn sum_of_squares(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum()
}

/// Central moments m2, m3, m4 (population form).
pub fn central_moments(values: &[f64]) -> (f64, f64, f64) {
    let n = values.len() as f64;
    if n == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let m = mean(values);
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for v in values {
        let d = v - m;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    (m2 / n, m3 / n, m4 / n)
}

/// Moment skewness g1 = m3 / m2^1.5. `None` below three values or with no spread.
pub fn skewness(values: &[f64]) -> Option<f64> {
    if values.len() < 3 {
        return None;
    }
    let (m2, m3, _) = central_moments(values);
    if m2 <= 0.0 {
        return None;
    }
    Some(m3 / m2.powf(1.5))
}

pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

/// Percentile of sorted data using linear interpolation between ranks.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        len => {
            let rank = (p / 100.0) * (len - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let frac = rank - lower as f64;
            if upper >= len {
                sorted[len - 1]
            } else {
                sorted[lower] * (1.0 - frac) + sorted[upper] * frac
            }
        }
    }
}

/// Values outside `[q1 - k·iqr, q3 + k·iqr]`, in input order.
pub fn tukey_outliers(values: &[f64], q1: f64, q3: f64, multiplier: f64) -> Vec<f64> {
    let iqr = q3 - q1;
    let lower_fence = q1 - multiplier * iqr;
    let upper_fence = q3 + multiplier * iqr;
    values
        .iter()
        .copied()
        .filter(|v| *v < lower_fence || *v > upper_fence)
        .collect()
}

/// Full summary of one numeric series.
pub fn summarize(series: &NumericSeries, iqr_multiplier: f64) -> VariableSummary {
    let values = &series.values;
    let sorted = sorted(values);
    let mean = mean(values);
    let std_dev = std_dev(values);

    let (q1, q3, iqr, outliers) = if values.len() >= MIN_QUARTILE_SAMPLE {
        let q1 = percentile(&sorted, 25.0);
        let q3 = percentile(&sorted, 75.0);
        let outliers = tukey_outliers(values, q1, q3, iqr_multiplier);
        (Some(q1), Some(q3), Some(q3 - q1), outliers)
    } else {
        (None, None, None, Vec::new())
    };

    let coefficient_of_variation = if mean != 0.0 {
        Some(std_dev / mean.abs() * 100.0)
    } else {
        None
    };

    VariableSummary {
        name: series.name.clone(),
        count: values.len(),
        mean,
        std_dev,
        min: sorted.first().copied().unwrap_or(0.0),
        max: sorted.last().copied().unwrap_or(0.0),
        median: percentile(&sorted, 50.0),
        q1,
        q3,
        iqr,
        skewness: skewness(values),
        coefficient_of_variation,
        outliers,
    }
}

/// One warning per summary that flagged outliers.
pub fn outlier_warnings(summaries: &[VariableSummary]) -> Vec<String> {
    summaries
        .iter()
        .filter(|s| !s.outliers.is_empty())
        .map(|s| {
            let values: Vec<String> = s.outliers.iter().map(|v| format!("{v}")).collect();
            format!(
                "'{}' has {} outlier(s) outside the Tukey fences: {}",
                s.name,
                s.outliers.len(),
                values.join(", ")
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variance_sample_form() {
        assert!((variance(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 32.0 / 7.0).abs() < 1e-12);
        assert_eq!(variance(&[3.0]), 0.0);
    }

    #[test]
    fn test_percentile_basic() {
        let sorted = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((percentile(&sorted, 50.0) - 3.0).abs() < 1e-10);
        assert!((percentile(&sorted, 25.0) - 2.0).abs() < 1e-10);
        assert!((percentile(&[1.0, 2.0, 3.0, 4.0], 25.0) - 1.75).abs() < 1e-10);
    }

    #[test]
    fn test_summary_flags_outlier() {
        let mut values = vec![10.0; 19];
        values.push(11.0);
        values.push(100.0);
        let s = summarize(&NumericSeries::new("x", values), 1.5);
        assert_eq!(s.count, 21);
        assert_eq!(s.outliers, vec![11.0, 100.0]);
        assert_eq!(s.median, 10.0);
    }

    #[test]
    fn test_small_sample_skips_quartiles() {
        let s = summarize(&NumericSeries::new("x", vec![1.0, 2.0, 3.0]), 1.5);
        assert!(s.q1.is_none());
        assert!(s.outliers.is_empty());
        assert_eq!(s.skewness, Some(0.0));
        assert!((s.coefficient_of_variation.unwrap() - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_symmetric_data_has_zero_skew() {
        assert!(skewness(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap().abs() < 1e-12);
        assert!(skewness(&[1.0, 1.0, 1.0]).is_none());
    }
}
