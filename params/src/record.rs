//! The prediction request record handed to the pipeline.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::model::ConstantValue;

/// A scalar cell in a [`PredictionRecord`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Integer-typed numeric value.
    Int(i64),
    /// Decimal numeric value.
    Float(f64),
    /// Text value, consumed by categorical encoders.
    Text(String),
}

impl FeatureValue {
    /// Returns the numeric value, or `None` for text.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Int(v) => Some(*v as f64),
            FeatureValue::Float(v) => Some(*v),
            FeatureValue::Text(_) => None,
        }
    }

    /// Returns the text value, or `None` for numbers.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a short type name for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            FeatureValue::Int(_) => "int",
            FeatureValue::Float(_) => "float",
            FeatureValue::Text(_) => "text",
        }
    }
}

impl From<ConstantValue> for FeatureValue {
    fn from(value: ConstantValue) -> Self {
        match value {
            ConstantValue::Int(v) => FeatureValue::Int(v),
            ConstantValue::Float(v) => FeatureValue::Float(v),
            ConstantValue::Str(s) => FeatureValue::Text(s.to_string()),
        }
    }
}

/// One flat, ordered row of named features.
///
/// Built fresh for every prediction and dropped after the call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionRecord {
    columns: Vec<(String, FeatureValue)>,
}

impl PredictionRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column. Later duplicates are kept so that schema checks can
    /// see them.
    pub fn push(&mut self, key: impl Into<String>, value: FeatureValue) {
        self.columns.push((key.into(), value));
    }

    /// Returns the first value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FeatureValue> {
        self.columns.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns the column keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(k, _)| k.as_str())
    }

    /// Iterates over `(key, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the record has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Removes and returns the value under `key`.
    pub fn remove(&mut self, key: &str) -> Option<FeatureValue> {
        let idx = self.columns.iter().position(|(k, _)| k == key)?;
        Some(self.columns.remove(idx).1)
    }
}

impl Serialize for PredictionRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (key, value) in &self.columns {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_insertion_order() {
        let mut record = PredictionRecord::new();
        record.push("b", FeatureValue::Int(1));
        record.push("a", FeatureValue::Text("x".to_string()));
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"b":1,"a":"x"}"#);
    }

    #[test]
    fn remove_drops_column() {
        let mut record = PredictionRecord::new();
        record.push("a", FeatureValue::Float(1.5));
        record.push("b", FeatureValue::Int(2));
        assert_eq!(record.remove("a"), Some(FeatureValue::Float(1.5)));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["b"]);
        assert!(record.remove("a").is_none());
    }

    #[test]
    fn value_accessors() {
        assert_eq!(FeatureValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(FeatureValue::Text("N11".into()).as_text(), Some("N11"));
        assert!(FeatureValue::Text("N11".into()).as_f64().is_none());
        assert_eq!(FeatureValue::Float(0.5).type_name(), "float");
    }
}
