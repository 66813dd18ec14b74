//! The ordered selection rules.
//!
//! Group collections take precedence over free-standing data. Within each
//! source the first matching rule wins:
//!
//! 1. two groups, paired flag or `before`/`after` names, equal length → paired
//! 2. two groups otherwise → two-sample
//! 3. three or more groups → multi-group
//! 4. two equal-length numeric variables → correlation (`before`/`after` → paired)
//! 5. two or more categorical variables → categorical independence
//! 6. one categorical variable → frequency
//! 7. any numeric variable with at least two values → descriptive
//!
//! An explicit `analysis_type` replaces inference but must fit the data.

use tracing::debug;

use evidence_core::constants::PAIRED_GROUP_NAMES;
use evidence_core::types::{AnalysisRequest, MethodKind, ObservationSet};
use evidence_core::AnalysisError;

use super::series::{CategoricalSeries, NumericSeries, TypedVariable};

/// The procedure picked for a request, carrying its typed inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodChoice {
    Descriptive {
        variables: Vec<NumericSeries>,
    },
    Paired {
        first: NumericSeries,
        second: NumericSeries,
    },
    TwoSample {
        first: NumericSeries,
        second: NumericSeries,
    },
    MultiGroup {
        groups: Vec<NumericSeries>,
    },
    Correlation {
        x: NumericSeries,
        y: NumericSeries,
    },
    CategoricalIndependence {
        rows: CategoricalSeries,
        columns: CategoricalSeries,
        /// Categorical variables past the first two, left out of the test.
        ignored: Vec<String>,
    },
    Frequency {
        variables: Vec<CategoricalSeries>,
    },
}

impl MethodChoice {
    pub fn method(&self) -> MethodKind {
        match self {
            Self::Descriptive { .. } => MethodKind::Descriptive,
            Self::Paired { .. } => MethodKind::PairedComparison,
            Self::TwoSample { .. } => MethodKind::TwoSampleComparison,
            Self::MultiGroup { .. } => MethodKind::MultiGroupComparison,
            Self::Correlation { .. } => MethodKind::Correlation,
            Self::CategoricalIndependence { .. } => MethodKind::CategoricalIndependence,
            Self::Frequency { .. } => MethodKind::Frequency,
        }
    }
}

/// Where the variables came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Groups,
    Data,
}

/// Typed variables of the request's effective source.
struct TypedInput {
    source: Source,
    variables: Vec<TypedVariable>,
}

impl TypedInput {
    fn numeric(&self) -> Vec<NumericSeries> {
        self.variables
            .iter()
            .filter_map(|v| match v {
                TypedVariable::Numeric(s) => Some(s.clone()),
                TypedVariable::Categorical(_) => None,
            })
            .collect()
    }

    fn categorical(&self) -> Vec<CategoricalSeries> {
        self.variables
            .iter()
            .filter_map(|v| match v {
                TypedVariable::Categorical(s) => Some(s.clone()),
                TypedVariable::Numeric(_) => None,
            })
            .collect()
    }

    fn all_numeric(&self) -> bool {
        self.variables.iter().all(TypedVariable::is_numeric)
    }

    fn all_categorical(&self) -> bool {
        self.variables.iter().all(|v| !v.is_numeric())
    }
}

/// Decide the procedure for a request.
pub fn select(request: &AnalysisRequest) -> Result<MethodChoice, AnalysisError> {
    let requested = request.requested_method()?;
    let input = type_input(request)?;
    let choice = match requested {
        None => infer(&input, request.paired)?,
        Some(kind) => explicit(kind, &input, request.paired)?,
    };
    debug!(
        method = choice.method().name(),
        explicit = requested.is_some(),
        variables = input.variables.len(),
        "method selected"
    );
    Ok(choice)
}

fn type_input(request: &AnalysisRequest) -> Result<TypedInput, AnalysisError> {
    let (source, set) = match (&request.groups, &request.data) {
        (Some(groups), _) if !groups.is_empty() => (Source::Groups, groups),
        (_, Some(data)) => (Source::Data, data),
        (Some(groups), None) => (Source::Groups, groups),
        (None, None) => {
            return Err(AnalysisError::insufficient(
                "request carries neither data nor groups",
            ))
        }
    };
    let variables = classify_all(set)?;
    if variables.is_empty() {
        return Err(AnalysisError::insufficient("no variables supplied"));
    }
    if source == Source::Groups {
        if let Some(bad) = variables.iter().find(|v| !v.is_numeric()) {
            return Err(AnalysisError::ambiguous(format!(
                "group '{}' is categorical; groups must be numeric",
                bad.name()
            )));
        }
    }
    Ok(TypedInput { source, variables })
}

fn classify_all(set: &ObservationSet) -> Result<Vec<TypedVariable>, AnalysisError> {
    set.variables().iter().map(TypedVariable::classify).collect()
}

/// Names `before`/`after` in either order, case-insensitive.
fn named_as_paired(first: &str, second: &str) -> bool {
    let (a, b) = PAIRED_GROUP_NAMES;
    let first = first.trim();
    let second = second.trim();
    (first.eq_ignore_ascii_case(a) && second.eq_ignore_ascii_case(b))
        || (first.eq_ignore_ascii_case(b) && second.eq_ignore_ascii_case(a))
}

fn infer(input: &TypedInput, paired_flag: bool) -> Result<MethodChoice, AnalysisError> {
    match input.source {
        Source::Groups => infer_groups(input.numeric(), paired_flag),
        Source::Data => infer_data(input, paired_flag),
    }
}

fn infer_groups(
    mut groups: Vec<NumericSeries>,
    paired_flag: bool,
) -> Result<MethodChoice, AnalysisError> {
    match groups.len() {
        0 => Err(AnalysisError::insufficient("no groups supplied")),
        1 => {
            if paired_flag {
                return Err(AnalysisError::unsupported(
                    MethodKind::PairedComparison.name(),
                    "paired comparison needs exactly two groups",
                ));
            }
            require_usable(&groups)?;
            Ok(MethodChoice::Descriptive { variables: groups })
        }
        2 => {
            let second = groups.remove(1);
            let first = groups.remove(0);
            let equal = first.len() == second.len();
            if paired_flag {
                if !equal {
                    return Err(AnalysisError::unsupported(
                        MethodKind::PairedComparison.name(),
                        format!(
                            "paired groups must have equal length ({} vs {})",
                            first.len(),
                            second.len()
                        ),
                    ));
                }
                return Ok(MethodChoice::Paired { first, second });
            }
            if equal && named_as_paired(&first.name, &second.name) {
                Ok(MethodChoice::Paired { first, second })
            } else {
                Ok(MethodChoice::TwoSample { first, second })
            }
        }
        _ => {
            if paired_flag {
                return Err(AnalysisError::unsupported(
                    MethodKind::PairedComparison.name(),
                    format!("paired comparison needs exactly two groups, got {}", groups.len()),
                ));
            }
            Ok(MethodChoice::MultiGroup { groups })
        }
    }
}

fn infer_data(input: &TypedInput, paired_flag: bool) -> Result<MethodChoice, AnalysisError> {
    if !input.all_numeric() && !input.all_categorical() {
        let kinds: Vec<String> = input
            .variables
            .iter()
            .map(|v| format!("{} ({})", v.name(), v.kind_name()))
            .collect();
        return Err(AnalysisError::ambiguous(format!(
            "request mixes numeric and categorical variables: {}",
            kinds.join(", ")
        )));
    }
    if input.variables.iter().all(|v| v.len() < 2) {
        return Err(AnalysisError::insufficient(
            "no variable has at least two values",
        ));
    }

    if input.all_categorical() {
        let categorical = input.categorical();
        if categorical.len() >= 2 {
            return categorical_pair(categorical);
        }
        return Ok(MethodChoice::Frequency {
            variables: categorical,
        });
    }

    let mut numeric = input.numeric();
    if numeric.len() == 2 && numeric[0].len() == numeric[1].len() {
        let y = numeric.remove(1);
        let x = numeric.remove(0);
        if paired_flag || named_as_paired(&x.name, &y.name) {
            return Ok(MethodChoice::Paired {
                first: x,
                second: y,
            });
        }
        return Ok(MethodChoice::Correlation { x, y });
    }
    if paired_flag {
        return Err(AnalysisError::unsupported(
            MethodKind::PairedComparison.name(),
            "paired comparison needs exactly two variables of equal length",
        ));
    }
    Ok(MethodChoice::Descriptive { variables: numeric })
}

/// First two categorical variables; they must align observation by observation.
/// The rest are named in `ignored`.
fn categorical_pair(
    mut categorical: Vec<CategoricalSeries>,
) -> Result<MethodChoice, AnalysisError> {
    let ignored: Vec<String> = categorical.drain(2..).map(|c| c.name).collect();
    let columns = categorical.remove(1);
    let rows = categorical.remove(0);
    if rows.len() != columns.len() {
        return Err(AnalysisError::ambiguous(format!(
            "categorical variables '{}' and '{}' have different lengths ({} vs {})",
            rows.name,
            columns.name,
            rows.len(),
            columns.len()
        )));
    }
    Ok(MethodChoice::CategoricalIndependence {
        rows,
        columns,
        ignored,
    })
}

fn require_usable(variables: &[NumericSeries]) -> Result<(), AnalysisError> {
    if variables.iter().any(|v| v.len() >= 2) {
        Ok(())
    } else {
        Err(AnalysisError::insufficient(
            "no variable has at least two values",
        ))
    }
}

/// Build the requested method's inputs, or explain why the data cannot support it.
fn explicit(
    kind: MethodKind,
    input: &TypedInput,
    paired_flag: bool,
) -> Result<MethodChoice, AnalysisError> {
    let unsupported = |reason: String| AnalysisError::unsupported(kind.name(), reason);

    match kind {
        MethodKind::Descriptive => {
            if !input.all_numeric() {
                return Err(unsupported(
                    "descriptive analysis needs numeric variables".to_string(),
                ));
            }
            let variables = input.numeric();
            require_usable(&variables)?;
            Ok(MethodChoice::Descriptive { variables })
        }
        MethodKind::PairedComparison => {
            let pair = numeric_pair(input).map_err(unsupported)?;
            if pair.0.len() != pair.1.len() {
                return Err(unsupported(format!(
                    "paired measurements must have equal length ({} vs {})",
                    pair.0.len(),
                    pair.1.len()
                )));
            }
            Ok(MethodChoice::Paired {
                first: pair.0,
                second: pair.1,
            })
        }
        MethodKind::TwoSampleComparison => {
            if paired_flag {
                return Err(unsupported(
                    "request is flagged paired; use a paired comparison".to_string(),
                ));
            }
            let (first, second) = numeric_pair(input).map_err(unsupported)?;
            Ok(MethodChoice::TwoSample { first, second })
        }
        MethodKind::MultiGroupComparison => {
            if !input.all_numeric() {
                return Err(unsupported("groups must be numeric".to_string()));
            }
            let groups = input.numeric();
            if groups.len() < 2 {
                return Err(unsupported(format!(
                    "needs at least two groups, got {}",
                    groups.len()
                )));
            }
            Ok(MethodChoice::MultiGroup { groups })
        }
        MethodKind::Correlation => {
            let (x, y) = numeric_pair(input).map_err(unsupported)?;
            if x.len() != y.len() {
                return Err(unsupported(format!(
                    "correlated variables must have equal length ({} vs {})",
                    x.len(),
                    y.len()
                )));
            }
            Ok(MethodChoice::Correlation { x, y })
        }
        MethodKind::CategoricalIndependence => {
            if !input.all_categorical() {
                return Err(unsupported(
                    "categorical independence needs categorical variables".to_string(),
                ));
            }
            let categorical = input.categorical();
            if categorical.len() < 2 {
                return Err(unsupported(format!(
                    "needs two categorical variables, got {}",
                    categorical.len()
                )));
            }
            categorical_pair(categorical)
        }
        MethodKind::Frequency => {
            if !input.all_categorical() {
                return Err(unsupported(
                    "frequency analysis needs categorical variables".to_string(),
                ));
            }
            Ok(MethodChoice::Frequency {
                variables: input.categorical(),
            })
        }
    }
}

/// Exactly two numeric variables, in input order.
fn numeric_pair(input: &TypedInput) -> Result<(NumericSeries, NumericSeries), String> {
    if !input.all_numeric() {
        return Err("both variables must be numeric".to_string());
    }
    let mut numeric = input.numeric();
    if numeric.len() != 2 {
        return Err(format!("needs exactly two variables, got {}", numeric.len()));
    }
    let second = numeric.remove(1);
    let first = numeric.remove(0);
    Ok((first, second))
}
