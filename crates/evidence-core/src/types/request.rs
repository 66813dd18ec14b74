//! Analysis requests as received from the transport.

use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use super::method::{MethodKind, Tail};
use super::observations::ObservationSet;
use crate::errors::AnalysisError;

/// One analyze call's input.
///
/// `groups` is a Group Collection: each entry is one numeric group. `data`
/// holds free-standing variables. `analysis_type` of `None` (or `"auto"` on
/// the wire) lets the selector infer the method. The name is kept as sent and
/// resolved by [`AnalysisRequest::requested_method`], so an unknown name fails
/// its own request instead of the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisRequest {
    pub data: Option<ObservationSet>,
    pub groups: Option<ObservationSet>,
    /// Caller asserts the two groups are paired measurements.
    pub paired: bool,
    #[serde(deserialize_with = "deserialize_analysis_type")]
    pub analysis_type: Option<String>,
    pub alpha: Option<f64>,
    pub confidence_level: Option<f64>,
    pub tail: Tail,
}

impl AnalysisRequest {
    pub fn with_data(data: ObservationSet) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    pub fn with_groups(groups: ObservationSet) -> Self {
        Self {
            groups: Some(groups),
            ..Self::default()
        }
    }

    pub fn paired(mut self, paired: bool) -> Self {
        self.paired = paired;
        self
    }

    pub fn analysis_type(mut self, kind: MethodKind) -> Self {
        self.analysis_type = Some(kind.name().to_string());
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = Some(level);
        self
    }

    pub fn tail(mut self, tail: Tail) -> Self {
        self.tail = tail;
        self
    }

    /// The explicitly requested method, `None` for inference.
    pub fn requested_method(&self) -> Result<Option<MethodKind>, AnalysisError> {
        match self.analysis_type.as_deref().map(str::trim) {
            None => Ok(None),
            Some(name) if name.eq_ignore_ascii_case(AUTO_METHOD) => Ok(None),
            Some(name) => name.parse::<MethodKind>().map(Some),
        }
    }

    /// Resolve alpha against a default, rejecting values outside (0, 1).
    pub fn resolved_alpha(&self, default: f64) -> Result<f64, AnalysisError> {
        resolve_unit_interval("alpha", self.alpha, default)
    }

    /// Resolve the confidence level against a default, rejecting values outside (0, 1).
    pub fn resolved_confidence_level(&self, default: f64) -> Result<f64, AnalysisError> {
        resolve_unit_interval("confidence_level", self.confidence_level, default)
    }
}

fn resolve_unit_interval(
    field: &str,
    value: Option<f64>,
    default: f64,
) -> Result<f64, AnalysisError> {
    let v = value.unwrap_or(default);
    if v > 0.0 && v < 1.0 {
        Ok(v)
    } else {
        Err(AnalysisError::invalid_parameter(
            field,
            format!("{v} is not strictly between 0 and 1"),
        ))
    }
}

const AUTO_METHOD: &str = "auto";

/// `"auto"` and `null` mean inference. Any other value is kept as text and
/// rejected later by `requested_method`.
fn deserialize_analysis_type<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(AnalysisTypeVisitor)
}

struct AnalysisTypeVisitor;

impl AnalysisTypeVisitor {
    fn name(v: &str) -> Option<String> {
        if v.trim().eq_ignore_ascii_case(AUTO_METHOD) {
            None
        } else {
            Some(v.to_string())
        }
    }
}

impl<'de> Visitor<'de> for AnalysisTypeVisitor {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an analysis type name")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Self::name(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        while access.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Some("list".to_string()))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        while access.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Some("object".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_analysis_type_is_none() {
        let req: AnalysisRequest =
            serde_json::from_str(r#"{"data": {"x": [1, 2]}, "analysis_type": "auto"}"#).unwrap();
        assert_eq!(req.requested_method().unwrap(), None);
        assert_eq!(req.tail, Tail::TwoSided);
    }

    #[test]
    fn test_explicit_analysis_type() {
        let req: AnalysisRequest =
            serde_json::from_str(r#"{"groups": {"a": [1], "b": [2]}, "analysis_type": "anova_analysis"}"#)
                .unwrap();
        assert_eq!(
            req.requested_method().unwrap(),
            Some(MethodKind::MultiGroupComparison)
        );
    }

    #[test]
    fn test_unknown_analysis_type_fails_on_resolution() {
        let req: AnalysisRequest =
            serde_json::from_str(r#"{"analysis_type": "regression"}"#).unwrap();
        let err = req.requested_method().unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedMethod { .. }));

        for raw in [r#"{"analysis_type": true}"#, r#"{"analysis_type": 3}"#, r#"{"analysis_type": ["t_test"]}"#] {
            let req: AnalysisRequest = serde_json::from_str(raw).unwrap();
            assert!(req.requested_method().is_err(), "{raw}");
        }
        let req: AnalysisRequest = serde_json::from_str(r#"{"analysis_type": null}"#).unwrap();
        assert_eq!(req.requested_method().unwrap(), None);
    }

    #[test]
    fn test_builder_stores_wire_name() {
        let req = AnalysisRequest::default().analysis_type(MethodKind::Correlation);
        assert_eq!(req.analysis_type.as_deref(), Some("correlation_analysis"));
        assert_eq!(req.requested_method().unwrap(), Some(MethodKind::Correlation));
    }

    #[test]
    fn test_alpha_resolution() {
        let req = AnalysisRequest::default();
        assert_eq!(req.resolved_alpha(0.05).unwrap(), 0.05);
        assert_eq!(req.clone().alpha(0.01).resolved_alpha(0.05).unwrap(), 0.01);
        assert!(req.clone().alpha(1.5).resolved_alpha(0.05).is_err());
        assert!(req.confidence_level(0.0).resolved_confidence_level(0.95).is_err());
    }
}
