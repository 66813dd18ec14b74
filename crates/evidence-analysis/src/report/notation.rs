//! APA-style statistical notation and method references.

use evidence_core::types::{
    DegreesOfFreedom, Evidence, FrequencySummary, MethodKind, StatisticKind, VariableSummary,
};

const WELCH_1947: &str = "Welch, B. L. (1947). The generalization of \"Student's\" problem when several different population variances are involved. Biometrika, 34(1-2), 28-35.";
const STUDENT_1908: &str = "Student. (1908). The probable error of a mean. Biometrika, 6(1), 1-25.";
const FISHER_1925: &str = "Fisher, R. A. (1925). Statistical methods for research workers. Oliver and Boyd.";
const PEARSON_1895: &str = "Pearson, K. (1895). Notes on regression and inheritance in the case of two parents. Proceedings of the Royal Society of London, 58, 240-242.";
const SPEARMAN_1904: &str = "Spearman, C. (1904). The proof and measurement of association between two things. The American Journal of Psychology, 15(1), 72-101.";
const PEARSON_1900: &str = "Pearson, K. (1900). On the criterion that a given system of deviations from the probable in the case of a correlated system of variables is such that it can be reasonably supposed to have arisen from random sampling. Philosophical Magazine, 50(302), 157-175.";
const CRAMER_1946: &str = "Cramér, H. (1946). Mathematical methods of statistics. Princeton University Press.";
const COHEN_1988: &str = "Cohen, J. (1988). Statistical power analysis for the behavioral sciences (2nd ed.). Lawrence Erlbaum.";

/// Drop the leading zero of a bounded statistic: `0.004` → `.004`, `-0.5` → `-.5`.
pub fn strip_leading_zero(s: &str) -> String {
    if let Some(rest) = s.strip_prefix("-0.") {
        format!("-.{rest}")
    } else if let Some(rest) = s.strip_prefix("0.") {
        format!(".{rest}")
    } else {
        s.to_string()
    }
}

/// `p = .004`, `p < .001`, or `p > .999`.
pub fn apa_p(p: f64, places: usize) -> String {
    let floor = 10f64.powi(-(places as i32));
    if p < floor {
        format!("p < {}", strip_leading_zero(&format!("{floor:.places$}")))
    } else if p > 1.0 - floor {
        format!("p > {}", strip_leading_zero(&format!("{:.places$}", 1.0 - floor)))
    } else {
        format!("p = {}", strip_leading_zero(&format!("{p:.places$}")))
    }
}

/// `95%`, or `97.5%` when the level is not a whole percent.
pub fn level_percent(level: f64) -> String {
    let pct = level * 100.0;
    if (pct - pct.round()).abs() < 1e-9 {
        format!("{}%", pct.round() as i64)
    } else {
        format!("{pct:.1}%")
    }
}

fn df_text(e: &Evidence) -> String {
    match (e.degrees_of_freedom, e.contingency.as_ref()) {
        (Some(DegreesOfFreedom::Single(df)), Some(table)) => {
            let n: u64 = table.observed.iter().flatten().sum();
            format!("{}, N = {n}", DegreesOfFreedom::Single(df))
        }
        (Some(df), _) => df.to_string(),
        (None, _) => String::new(),
    }
}

/// Inline statistic, e.g. `t(3.25) = -7.64, p = .004, d = -6.24, 95% CI [-2.51, -1.09]`.
/// `None` for methods without a test statistic.
pub fn statistic_line(e: &Evidence, p_places: usize) -> Option<String> {
    let statistic = e.statistic?;
    let value = match statistic.kind {
        StatisticKind::PearsonR | StatisticKind::SpearmanRho => {
            strip_leading_zero(&format!("{:.2}", statistic.value))
        }
        _ => format!("{:.2}", statistic.value),
    };
    let mut parts = vec![format!("{}({}) = {value}", statistic.kind.symbol(), df_text(e))];
    if let Some(p) = e.p_value {
        parts.push(apa_p(p, p_places));
    }
    if let Some(effect) = e.effect_size {
        // r is already reported as the statistic
        if !matches!(
            statistic.kind,
            StatisticKind::PearsonR | StatisticKind::SpearmanRho
        ) {
            parts.push(format!("{} = {:.2}", effect.kind.symbol(), effect.value));
        }
    }
    if let Some(ci) = &e.confidence_interval {
        parts.push(format!(
            "{} CI [{:.2}, {:.2}]",
            level_percent(ci.level),
            ci.lower,
            ci.upper
        ));
    }
    Some(parts.join(", "))
}

pub fn summary_line(s: &VariableSummary, places: usize) -> String {
    let mut line = format!(
        "{}: M = {:.places$}, SD = {:.places$}, Mdn = {:.places$}, range [{:.places$}, {:.places$}], n = {}",
        s.name, s.mean, s.std_dev, s.median, s.min, s.max, s.count
    );
    if let Some(iqr) = s.iqr {
        line.push_str(&format!(", IQR = {iqr:.places$}"));
    }
    line
}

pub fn frequency_line(f: &FrequencySummary, places: usize) -> String {
    let share = if f.total > 0 {
        f.mode_count as f64 / f.total as f64 * 100.0
    } else {
        0.0
    };
    format!(
        "{}: k = {}, mode = {} ({share:.1}%), H = {:.places$} bits (ratio {:.places$}), n = {}",
        f.name,
        f.categories.len(),
        f.mode,
        f.entropy,
        f.entropy_ratio,
        f.total
    )
}

/// References for the test and effect size an Evidence used.
pub fn references(e: &Evidence) -> Vec<&'static str> {
    let mut refs = Vec::new();
    match e.method {
        MethodKind::TwoSampleComparison => refs.extend([WELCH_1947, COHEN_1988]),
        MethodKind::PairedComparison => refs.extend([STUDENT_1908, COHEN_1988]),
        MethodKind::MultiGroupComparison => {
            refs.push(FISHER_1925);
            if e.variables.len() == 2 {
                refs.push(WELCH_1947);
            }
            refs.push(COHEN_1988);
        }
        MethodKind::Correlation => match e.statistic.map(|s| s.kind) {
            Some(StatisticKind::SpearmanRho) => refs.extend([SPEARMAN_1904, COHEN_1988]),
            _ => refs.extend([PEARSON_1895, COHEN_1988]),
        },
        MethodKind::CategoricalIndependence => refs.extend([PEARSON_1900, CRAMER_1946]),
        MethodKind::Descriptive | MethodKind::Frequency => {}
    }
    refs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apa_p() {
        assert_eq!(apa_p(0.0042, 3), "p = .004");
        assert_eq!(apa_p(0.00001, 3), "p < .001");
        assert_eq!(apa_p(1.0, 3), "p > .999");
        assert_eq!(apa_p(0.5, 2), "p = .50");
    }

    #[test]
    fn test_strip_leading_zero() {
        assert_eq!(strip_leading_zero("0.90"), ".90");
        assert_eq!(strip_leading_zero("-0.35"), "-.35");
        assert_eq!(strip_leading_zero("1.00"), "1.00");
    }

    #[test]
    fn test_level_percent() {
        assert_eq!(level_percent(0.95), "95%");
        assert_eq!(level_percent(0.975), "97.5%");
    }
}
