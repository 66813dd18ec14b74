//! Statistical method kinds and test tails.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AnalysisError;

/// The procedure applied to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodKind {
    /// Summary statistics only.
    #[serde(rename = "descriptive_analysis", alias = "descriptive")]
    Descriptive,
    /// Two measurements of the same units (before/after).
    #[serde(rename = "paired_comparison", alias = "paired")]
    PairedComparison,
    /// Two independent groups.
    #[serde(
        rename = "two_group_comparison",
        alias = "two_sample_comparison",
        alias = "t_test"
    )]
    TwoSampleComparison,
    /// Omnibus test across independent groups.
    #[serde(
        rename = "multi_group_comparison",
        alias = "anova_analysis",
        alias = "anova"
    )]
    MultiGroupComparison,
    /// Association between two numeric variables.
    #[serde(rename = "correlation_analysis", alias = "correlation")]
    Correlation,
    /// Association between two categorical variables.
    #[serde(
        rename = "categorical_independence",
        alias = "chi_square_test",
        alias = "chi_square"
    )]
    CategoricalIndependence,
    /// Category counts for categorical variables.
    #[serde(rename = "frequency_analysis", alias = "frequency")]
    Frequency,
}

impl MethodKind {
    pub const ALL: [MethodKind; 7] = [
        Self::Descriptive,
        Self::PairedComparison,
        Self::TwoSampleComparison,
        Self::MultiGroupComparison,
        Self::Correlation,
        Self::CategoricalIndependence,
        Self::Frequency,
    ];

    /// Wire name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Descriptive => "descriptive_analysis",
            Self::PairedComparison => "paired_comparison",
            Self::TwoSampleComparison => "two_group_comparison",
            Self::MultiGroupComparison => "multi_group_comparison",
            Self::Correlation => "correlation_analysis",
            Self::CategoricalIndependence => "categorical_independence",
            Self::Frequency => "frequency_analysis",
        }
    }

    /// Human-readable label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Descriptive => "Descriptive analysis",
            Self::PairedComparison => "Paired comparison",
            Self::TwoSampleComparison => "Two-sample comparison",
            Self::MultiGroupComparison => "Multi-group comparison",
            Self::Correlation => "Correlation analysis",
            Self::CategoricalIndependence => "Categorical independence",
            Self::Frequency => "Frequency analysis",
        }
    }

    /// Whether the method produces an inferential test.
    pub fn is_inferential(&self) -> bool {
        !matches!(self, Self::Descriptive | Self::Frequency)
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MethodKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "descriptive_analysis" | "descriptive" => Ok(Self::Descriptive),
            "paired_comparison" | "paired" => Ok(Self::PairedComparison),
            "two_group_comparison" | "two_sample_comparison" | "t_test" => {
                Ok(Self::TwoSampleComparison)
            }
            "multi_group_comparison" | "anova_analysis" | "anova" => {
                Ok(Self::MultiGroupComparison)
            }
            "correlation_analysis" | "correlation" => Ok(Self::Correlation),
            "categorical_independence" | "chi_square_test" | "chi_square" => {
                Ok(Self::CategoricalIndependence)
            }
            "frequency_analysis" | "frequency" => Ok(Self::Frequency),
            _ => Err(AnalysisError::unsupported(s, "unknown analysis type")),
        }
    }
}

/// Direction of the alternative hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tail {
    /// H1: parameter differs from the null in either direction.
    #[default]
    TwoSided,
    /// H1: first group / association is greater.
    Greater,
    /// H1: first group / association is less.
    Less,
}

impl Tail {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TwoSided => "two_sided",
            Self::Greater => "greater",
            Self::Less => "less",
        }
    }

    pub fn is_two_sided(&self) -> bool {
        matches!(self, Self::TwoSided)
    }
}

impl fmt::Display for Tail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_names_parse() {
        assert_eq!(
            "anova_analysis".parse::<MethodKind>().unwrap(),
            MethodKind::MultiGroupComparison
        );
        assert_eq!(
            "chi_square_test".parse::<MethodKind>().unwrap(),
            MethodKind::CategoricalIndependence
        );
        assert!("regression".parse::<MethodKind>().is_err());
    }

    #[test]
    fn test_serde_names_match_wire_names() {
        for kind in MethodKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
            let back: MethodKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }
}
