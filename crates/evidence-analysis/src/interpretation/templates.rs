//! Narrative templates per inferential method.
//! Placeholders: `{subject}`, `{difference}`, `{verdict}`, `{p}`, `{magnitude}`,
//! `{effect}`, `{direction}`.

use evidence_core::types::MethodKind;

pub fn template_for(method: MethodKind) -> &'static str {
    match method {
        MethodKind::PairedComparison => {
            "{subject}: the mean change of {difference} is {verdict} ({p}), a {magnitude} effect ({effect})."
        }
        MethodKind::TwoSampleComparison => {
            "{subject}: the mean difference of {difference} is {verdict} ({p}), a {magnitude} effect ({effect})."
        }
        MethodKind::MultiGroupComparison => {
            "{subject}: differences among group means are {verdict} ({p}), a {magnitude} effect ({effect})."
        }
        MethodKind::Correlation => {
            "{subject}: {magnitude} {direction} correlation ({effect}), {verdict} ({p})."
        }
        MethodKind::CategoricalIndependence => {
            "{subject}: the association is {verdict} ({p}), {magnitude} in strength ({effect})."
        }
        MethodKind::Descriptive | MethodKind::Frequency => "{subject}",
    }
}

/// Values substituted into a template.
#[derive(Debug, Clone, Default)]
pub struct TemplateFields {
    pub subject: String,
    pub difference: String,
    pub verdict: String,
    pub p: String,
    pub magnitude: String,
    pub effect: String,
    pub direction: String,
}

impl TemplateFields {
    fn get(&self, placeholder: &str) -> Option<&str> {
        let value = match placeholder {
            "subject" => &self.subject,
            "difference" => &self.difference,
            "verdict" => &self.verdict,
            "p" => &self.p,
            "magnitude" => &self.magnitude,
            "effect" => &self.effect,
            "direction" => &self.direction,
            _ => return None,
        };
        Some(value.as_str())
    }
}

/// Fill a template in one left-to-right pass. Substituted text is never
/// rescanned, so braces inside variable names come through verbatim.
pub fn render(method: MethodKind, fields: &TemplateFields) -> String {
    let template = template_for(method);
    let mut out = String::with_capacity(template.len() + fields.subject.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}').and_then(|close| {
            fields.get(&after[..close]).map(|value| (close, value))
        }) {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
