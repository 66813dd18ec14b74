//! Typed views over raw variables.
//!
//! A variable is numeric when every value reads as a finite number, and
//! categorical when none does. Anything in between is rejected.

use evidence_core::types::{RawValue, Variable};
use evidence_core::AnalysisError;

#[derive(Debug, Clone, PartialEq)]
pub struct NumericSeries {
    pub name: String,
    pub values: Vec<f64>,
}

impl NumericSeries {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalSeries {
    pub name: String,
    pub labels: Vec<String>,
}

impl CategoricalSeries {
    pub fn new(name: impl Into<String>, labels: Vec<String>) -> Self {
        Self {
            name: name.into(),
            labels,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedVariable {
    Numeric(NumericSeries),
    Categorical(CategoricalSeries),
}

impl TypedVariable {
    /// Classify a raw variable. Empty and mixed variables are errors.
    pub fn classify(variable: &Variable) -> Result<Self, AnalysisError> {
        if variable.is_empty() {
            return Err(AnalysisError::insufficient(format!(
                "variable '{}' has no values",
                variable.name
            )));
        }
        if let Some(bad) = variable.values.iter().find(|v| v.is_unusable()) {
            let kind = match bad {
                RawValue::Invalid(kind) => kind.as_str(),
                _ => "non-finite number",
            };
            return Err(AnalysisError::ambiguous(format!(
                "variable '{}' contains a value that is neither a number nor a label ({kind})",
                variable.name
            )));
        }

        let numbers: Vec<Option<f64>> = variable.values.iter().map(RawValue::as_number).collect();
        let numeric = numbers.iter().filter(|v| v.is_some()).count();

        if numeric == numbers.len() {
            Ok(Self::Numeric(NumericSeries::new(
                &variable.name,
                numbers.into_iter().flatten().collect(),
            )))
        } else if numeric == 0 {
            Ok(Self::Categorical(CategoricalSeries::new(
                &variable.name,
                variable.values.iter().map(RawValue::as_label).collect(),
            )))
        } else {
            Err(AnalysisError::ambiguous(format!(
                "variable '{}' mixes {} numeric and {} categorical values",
                variable.name,
                numeric,
                numbers.len() - numeric
            )))
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Numeric(s) => &s.name,
            Self::Categorical(s) => &s.name,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(s) => s.len(),
            Self::Categorical(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric(_))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Numeric(_) => "numeric",
            Self::Categorical(_) => "categorical",
        }
    }
}
