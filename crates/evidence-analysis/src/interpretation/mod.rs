//! Short natural-language interpretations attached to every `Evidence`.

pub mod templates;

use evidence_core::types::{EffectSize, FrequencySummary, MethodKind, Tail, VariableSummary};

pub use templates::{render, template_for, TemplateFields};

/// "statistically significant" or not, qualified by the alternative for one-tailed tests.
pub fn verdict(p: f64, alpha: f64, tail: Tail) -> String {
    let base = if p < alpha {
        "statistically significant"
    } else {
        "not statistically significant"
    };
    match tail {
        Tail::TwoSided => base.to_string(),
        Tail::Greater => format!("{base} for an increase"),
        Tail::Less => format!("{base} for a decrease"),
    }
}

/// `p = 0.004` or `p < 0.001`.
pub fn p_phrase(p: f64) -> String {
    if p < 0.001 {
        "p < 0.001".to_string()
    } else {
        format!("p = {p:.3}")
    }
}

pub fn effect_phrase(effect: &EffectSize) -> String {
    format!("{} = {:.2}", effect.kind.symbol(), effect.value)
}

/// Inferential narrative for a method with a test statistic.
pub struct Narrative<'a> {
    pub method: MethodKind,
    pub subject: String,
    pub p_value: f64,
    pub alpha: f64,
    pub tail: Tail,
    pub effect: &'a EffectSize,
    pub mean_difference: Option<f64>,
}

impl Narrative<'_> {
    pub fn render(&self) -> String {
        let direction = if self.effect.value >= 0.0 {
            "positive"
        } else {
            "negative"
        };
        let fields = TemplateFields {
            subject: self.subject.clone(),
            difference: self
                .mean_difference
                .map(|d| format!("{d:.3}"))
                .unwrap_or_default(),
            verdict: verdict(self.p_value, self.alpha, self.tail),
            p: p_phrase(self.p_value),
            magnitude: self.effect.magnitude.name().to_string(),
            effect: effect_phrase(self.effect),
            direction: direction.to_string(),
        };
        render(self.method, &fields)
    }
}

/// "a vs b" for two names, "a, b, c" otherwise.
pub fn subject(names: &[&str]) -> String {
    match names {
        [a, b] => format!("{a} vs {b}"),
        _ => names.join(", "),
    }
}

pub fn descriptive(summaries: &[VariableSummary]) -> String {
    let parts: Vec<String> = summaries
        .iter()
        .map(|s| {
            format!(
                "{} averages {:.3} (SD {:.3}, n = {}, range {:.3} to {:.3})",
                s.name, s.mean, s.std_dev, s.count, s.min, s.max
            )
        })
        .collect();
    format!("Descriptive summary only: {}.", parts.join("; "))
}

pub fn frequency(frequencies: &[FrequencySummary]) -> String {
    let parts: Vec<String> = frequencies
        .iter()
        .map(|f| {
            let share = if f.total > 0 {
                f.mode_count as f64 / f.total as f64 * 100.0
            } else {
                0.0
            };
            format!(
                "{} has {} categories; most common is '{}' ({:.1}% of {})",
                f.name,
                f.categories.len(),
                f.mode,
                share,
                f.total
            )
        })
        .collect();
    format!("{}.", parts.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use evidence_core::types::EffectSizeKind;

    #[test]
    fn test_two_sample_narrative() {
        let effect = EffectSize::new(EffectSizeKind::CohensD, -6.24);
        let text = Narrative {
            method: MethodKind::TwoSampleComparison,
            subject: subject(&["control", "test"]),
            p_value: 0.004,
            alpha: 0.05,
            tail: Tail::TwoSided,
            effect: &effect,
            mean_difference: Some(-1.8),
        }
        .render();
        assert_eq!(
            text,
            "control vs test: the mean difference of -1.800 is statistically significant (p = 0.004), a large effect (d = -6.24)."
        );
    }

    #[test]
    fn test_correlation_narrative_direction() {
        let effect = EffectSize::new(EffectSizeKind::PearsonR, -0.35);
        let text = Narrative {
            method: MethodKind::Correlation,
            subject: subject(&["x", "y"]),
            p_value: 0.2,
            alpha: 0.05,
            tail: Tail::TwoSided,
            effect: &effect,
            mean_difference: None,
        }
        .render();
        assert!(text.contains("medium negative correlation"));
        assert!(text.contains("not statistically significant"));
    }

    #[test]
    fn test_p_phrase() {
        assert_eq!(p_phrase(0.0000001), "p < 0.001");
        assert_eq!(p_phrase(0.0421), "p = 0.042");
    }
}
