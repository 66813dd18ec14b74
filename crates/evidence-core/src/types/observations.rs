//! Named observation sets as supplied by the caller.
//!
//! An `ObservationSet` is an ordered mapping from variable name to values.
//! It deserializes from a JSON object (keys kept in document order) or from a
//! sequence of `{ "name": ..., "values": [...] }` entries, and always
//! serializes back to an object in insertion order.

use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single raw observation: a number or a text label.
///
/// Text that parses as a finite number is treated as numeric by
/// [`RawValue::as_number`]; everything else is a categorical label.
/// Wire values that are neither (`null`, booleans, nested lists or objects)
/// deserialize as `Invalid` so one bad value fails its own request only.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Number(f64),
    Text(String),
    /// Kind of the unusable wire value, e.g. `null`.
    Invalid(String),
}

impl RawValue {
    /// Numeric reading of this value, if it has one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) if v.is_finite() => Some(*v),
            Self::Number(_) | Self::Invalid(_) => None,
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    /// Label reading of this value: the text itself, or the formatted number.
    pub fn as_label(&self) -> String {
        match self {
            Self::Number(v) => v.to_string(),
            Self::Text(s) | Self::Invalid(s) => s.clone(),
        }
    }

    /// Neither a finite number nor a label.
    pub fn is_unusable(&self) -> bool {
        match self {
            Self::Number(v) => !v.is_finite(),
            Self::Invalid(_) => true,
            Self::Text(_) => false,
        }
    }
}

impl Serialize for RawValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(v) => serializer.serialize_f64(*v),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Invalid(_) => serializer.serialize_unit(),
        }
    }
}

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RawValueVisitor)
    }
}

struct RawValueVisitor;

impl<'de> Visitor<'de> for RawValueVisitor {
    type Value = RawValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a text label")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(RawValue::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(RawValue::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(RawValue::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(RawValue::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(RawValue::Text(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(RawValue::Invalid(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(RawValue::Invalid("null".to_string()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        self.visit_unit()
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        RawValue::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        while access.next_element::<IgnoredAny>()?.is_some() {}
        Ok(RawValue::Invalid("list".to_string()))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        while access.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(RawValue::Invalid("object".to_string()))
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// A named variable and its ordered values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub values: Vec<RawValue>,
}

impl Variable {
    pub fn new<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RawValue>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordered mapping from variable name to values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationSet {
    variables: Vec<Variable>,
}

impl ObservationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. A repeated name replaces the earlier variable in place.
    pub fn with<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RawValue>,
    {
        self.insert(Variable::new(name, values));
        self
    }

    pub fn insert(&mut self, variable: Variable) {
        match self.variables.iter_mut().find(|v| v.name == variable.name) {
            Some(existing) => *existing = variable,
            None => self.variables.push(variable),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn names(&self) -> Vec<&str> {
        self.variables.iter().map(|v| v.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl FromIterator<Variable> for ObservationSet {
    fn from_iter<T: IntoIterator<Item = Variable>>(iter: T) -> Self {
        let mut set = Self::new();
        for variable in iter {
            set.insert(variable);
        }
        set
    }
}

impl Serialize for ObservationSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.variables.len()))?;
        for variable in &self.variables {
            map.serialize_entry(&variable.name, &variable.values)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ObservationSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ObservationSetVisitor)
    }
}

struct ObservationSetVisitor;

impl<'de> Visitor<'de> for ObservationSetVisitor {
    type Value = ObservationSet;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of variable name to values, or a list of named variables")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut set = ObservationSet::new();
        while let Some((name, values)) = access.next_entry::<String, Vec<RawValue>>()? {
            set.insert(Variable { name, values });
        }
        Ok(set)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut set = ObservationSet::new();
        while let Some(variable) = access.next_element::<Variable>()? {
            set.insert(variable);
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_text_reads_as_number() {
        assert_eq!(RawValue::from("4.5").as_number(), Some(4.5));
        assert_eq!(RawValue::from(" 7 ").as_number(), Some(7.0));
        assert_eq!(RawValue::from("18-25").as_number(), None);
        assert_eq!(RawValue::from("NaN").as_number(), None);
        assert!(RawValue::Number(f64::INFINITY).is_unusable());
    }

    #[test]
    fn test_deserialize_keeps_document_order() {
        let set: ObservationSet =
            serde_json::from_str(r#"{"zeta": [1, 2], "alpha": ["a", "b"]}"#).unwrap();
        assert_eq!(set.names(), vec!["zeta", "alpha"]);
        assert_eq!(set.get("alpha").unwrap().values[0], RawValue::from("a"));
    }

    #[test]
    fn test_deserialize_from_list() {
        let set: ObservationSet = serde_json::from_str(
            r#"[{"name": "b", "values": [1.0]}, {"name": "a", "values": [2.0]}]"#,
        )
        .unwrap();
        assert_eq!(set.names(), vec!["b", "a"]);
    }

    #[test]
    fn test_serialize_in_insertion_order() {
        let set = ObservationSet::new()
            .with("test", [7.8, 8.2])
            .with("control", [6.1, 5.8]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"test":[7.8,8.2],"control":[6.1,5.8]}"#);
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let set = ObservationSet::new().with("x", [1.0]).with("x", [2.0, 3.0]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("x").unwrap().len(), 2);
    }

    #[test]
    fn test_unusable_wire_values_deserialize_as_invalid() {
        let set: ObservationSet =
            serde_json::from_str(r#"{"x": [1, null, 3], "flag": [true, "b"], "nested": [[1]]}"#)
                .unwrap();
        let x = &set.get("x").unwrap().values;
        assert_eq!(x[0], RawValue::Number(1.0));
        assert_eq!(x[1], RawValue::Invalid("null".to_string()));
        assert!(x[1].is_unusable());
        assert_eq!(set.get("flag").unwrap().values[0], RawValue::Invalid("true".to_string()));
        assert_eq!(set.get("nested").unwrap().values[0], RawValue::Invalid("list".to_string()));
        assert!(!RawValue::from("b").is_unusable());
    }
}
