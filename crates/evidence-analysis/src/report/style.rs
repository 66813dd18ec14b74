//! Report styles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use evidence_core::AnalysisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStyle {
    /// One plain-language line per finding, no raw statistics.
    #[default]
    Business,
    /// Statistical notation per finding.
    Academic,
    /// Academic notation plus narrative, warnings, and a closing summary.
    Comprehensive,
}

impl ReportStyle {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Academic => "academic",
            Self::Comprehensive => "comprehensive",
        }
    }
}

impl fmt::Display for ReportStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReportStyle {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "business" => Ok(Self::Business),
            "academic" => Ok(Self::Academic),
            "comprehensive" => Ok(Self::Comprehensive),
            other => Err(AnalysisError::invalid_parameter(
                "style",
                format!("unknown report style '{other}'"),
            )),
        }
    }
}
