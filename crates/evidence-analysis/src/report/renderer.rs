//! Report renderer for a session's evidence history.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::debug;

use evidence_core::constants::{DEFAULT_DECIMAL_PLACES, EMPTY_REPORT_MESSAGE};
use evidence_core::types::{Evidence, MethodKind};

use super::notation;
use super::style::ReportStyle;

/// Renders `Evidence` records as text. Stateless apart from number formatting.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    decimal_places: usize,
}

impl ReportRenderer {
    pub fn new(decimal_places: usize) -> Self {
        Self { decimal_places }
    }

    pub fn render(&self, session_id: &str, records: &[Evidence], style: ReportStyle) -> String {
        debug!(session_id, records = records.len(), style = style.name(), "rendering report");
        if records.is_empty() {
            return EMPTY_REPORT_MESSAGE.to_string();
        }
        match style {
            ReportStyle::Business => self.business(session_id, records),
            ReportStyle::Academic => self.academic(session_id, records),
            ReportStyle::Comprehensive => self.comprehensive(session_id, records),
        }
    }

    fn header(&self, title: &str, session_id: &str, records: &[Evidence]) -> String {
        format!(
            "# {title}\n\nSession: {} | Findings: {} | Generated: {}\n\n",
            escape_line(session_id),
            records.len(),
            Utc::now().format("%Y-%m-%d %H:%M UTC")
        )
    }

    fn business(&self, session_id: &str, records: &[Evidence]) -> String {
        let mut out = self.header("Findings", session_id, records);
        for (i, e) in records.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, plain_language(e)));
        }
        out
    }

    fn academic(&self, session_id: &str, records: &[Evidence]) -> String {
        let mut out = self.header("Statistical Results", session_id, records);
        for (i, e) in records.iter().enumerate() {
            out.push_str(&self.academic_entry(i + 1, e));
        }
        out.push_str(&references_section(records));
        out
    }

    fn academic_entry(&self, number: usize, e: &Evidence) -> String {
        let mut entry = format!(
            "## {number}. {} ({}): {}\n\n",
            e.method.label(),
            e.test_name,
            escape_line(&e.variables.join(", "))
        );
        if let Some(line) = notation::statistic_line(e, self.decimal_places) {
            entry.push_str(&format!("{line}\n\n"));
        }
        for summary in &e.summaries {
            entry.push_str(&format!(
                "- {}\n",
                notation::summary_line(summary, self.decimal_places)
            ));
        }
        if e.method == MethodKind::Frequency {
            for frequency in &e.frequencies {
                entry.push_str(&format!(
                    "- {}\n",
                    notation::frequency_line(frequency, self.decimal_places)
                ));
            }
        }
        if !e.summaries.is_empty() || e.method == MethodKind::Frequency {
            entry.push('\n');
        }
        entry
    }

    fn comprehensive(&self, session_id: &str, records: &[Evidence]) -> String {
        let mut out = self.header("Comprehensive Statistical Report", session_id, records);
        for (i, e) in records.iter().enumerate() {
            out.push_str(&self.academic_entry(i + 1, e));
            out.push_str(&format!("Interpretation: {}\n\n", e.interpretation));
            if e.low_reliability {
                out.push_str("Reliability: low (test assumptions not fully met)\n\n");
            }
            if !e.warnings.is_empty() {
                out.push_str("Warnings:\n");
                for warning in &e.warnings {
                    out.push_str(&format!("- {warning}\n"));
                }
                out.push('\n');
            }
        }
        out.push_str(&summary_section(records));
        out.push_str(&references_section(records));
        out
    }
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_DECIMAL_PLACES)
    }
}

/// One sentence without raw statistics.
pub fn plain_language(e: &Evidence) -> String {
    let strength = e
        .magnitude()
        .map(|m| m.plain())
        .unwrap_or("unquantified");
    let names = &e.variables;
    let first = names.first().map(String::as_str).unwrap_or("the first group");
    let second = names.get(1).map(String::as_str).unwrap_or("the second group");

    match e.method {
        MethodKind::PairedComparison | MethodKind::TwoSampleComparison => {
            let direction = match e.mean_difference {
                Some(d) if d > 0.0 => "higher",
                Some(d) if d < 0.0 => "lower",
                _ => "about the same",
            };
            if e.significant {
                format!(
                    "{first} was {direction} than {second}, a {strength} difference that is unlikely to be chance."
                )
            } else {
                format!(
                    "{first} and {second} did not differ reliably; the observed gap could be chance."
                )
            }
        }
        MethodKind::MultiGroupComparison => {
            let groups = names.join(", ");
            if e.significant {
                format!("The groups {groups} differ, with a {strength} share of variation explained by group.")
            } else {
                format!("The groups {groups} showed no reliable difference.")
            }
        }
        MethodKind::Correlation => {
            let direction = match e.effect_size.map(|s| s.value) {
                Some(v) if v < 0.0 => "in opposite directions",
                _ => "together",
            };
            if e.significant {
                format!("{first} and {second} move {direction}, a {strength} relationship.")
            } else {
                format!("{first} and {second} showed no reliable relationship.")
            }
        }
        MethodKind::CategoricalIndependence => {
            let caution = if e.low_reliability {
                " (small sample: treat with caution)"
            } else {
                ""
            };
            if e.significant {
                format!("{first} and {second} are related, a {strength} association{caution}.")
            } else {
                format!("{first} and {second} showed no reliable association{caution}.")
            }
        }
        MethodKind::Descriptive => {
            format!("Overview of {} (no comparison tested).", names.join(", "))
        }
        MethodKind::Frequency => {
            let modes: Vec<String> = e
                .frequencies
                .iter()
                .map(|f| format!("most common {} is '{}'", f.name, f.mode))
                .collect();
            format!("Category breakdown: {}.", modes.join("; "))
        }
    }
}

fn summary_section(records: &[Evidence]) -> String {
    let inferential: Vec<&Evidence> = records.iter().filter(|e| e.p_value.is_some()).collect();
    let significant = inferential.iter().filter(|e| e.significant).count();
    let descriptive_only = records.len() - inferential.len();
    let low_reliability = records.iter().filter(|e| e.low_reliability).count();

    let mut per_method: BTreeMap<&'static str, usize> = BTreeMap::new();
    for e in records {
        *per_method.entry(e.method.label()).or_insert(0) += 1;
    }

    let mut out = String::from("## Summary\n\n");
    out.push_str(&format!("- Total findings: {}\n", records.len()));
    out.push_str(&format!("- Significant: {significant}\n"));
    out.push_str(&format!(
        "- Not significant: {}\n",
        inferential.len() - significant
    ));
    out.push_str(&format!("- Descriptive only: {descriptive_only}\n"));
    if low_reliability > 0 {
        out.push_str(&format!("- Low reliability: {low_reliability}\n"));
    }
    for (label, count) in per_method {
        out.push_str(&format!("- {label}: {count}\n"));
    }
    out.push('\n');
    out
}

fn references_section(records: &[Evidence]) -> String {
    let mut refs: Vec<&'static str> = records.iter().flat_map(notation::references).collect();
    if refs.is_empty() {
        return String::new();
    }
    refs.sort_unstable();
    refs.dedup();
    let mut out = String::from("## References\n\n");
    for r in refs {
        out.push_str(&format!("- {r}\n"));
    }
    out
}

/// Keep caller-supplied names on one line and out of markdown headers.
fn escape_line(s: &str) -> String {
    s.replace('#', "\\#").replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_session_message() {
        let r = ReportRenderer::default();
        for style in [ReportStyle::Business, ReportStyle::Academic, ReportStyle::Comprehensive] {
            assert_eq!(r.render("s", &[], style), EMPTY_REPORT_MESSAGE);
        }
    }

    #[test]
    fn test_escape_line() {
        assert_eq!(escape_line("## a\nb"), "\\#\\# a b");
    }
}
