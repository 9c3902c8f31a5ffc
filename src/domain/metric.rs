use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single field value carried by a metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Boolean(bool),
    String(String),
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Unsigned(value)
    }
}

impl From<usize> for FieldValue {
    fn from(value: usize) -> Self {
        FieldValue::Unsigned(value as u64)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

/// One observation produced by an input plugin.
///
/// Buffers and filters only look at `name`; the rest travels untouched to the
/// output plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    pub tags: BTreeMap<String, String>,
    pub fields: BTreeMap<String, FieldValue>,
    pub timestamp: DateTime<Utc>,
}

impl Metric {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: BTreeMap::new(),
            fields: BTreeMap::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Adds `key=value` unless the tag is already present.
    pub fn tag_if_absent(&mut self, key: &str, value: &str) {
        if !self.tags.contains_key(key) {
            self.tags.insert(key.to_string(), value.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let metric = Metric::new("cpu")
            .with_tag("cpu", "cpu0")
            .with_field("usage_idle", 97.5)
            .with_field("count", 4_i64);

        assert_eq!(metric.name, "cpu");
        assert_eq!(metric.tags.get("cpu").map(String::as_str), Some("cpu0"));
        assert_eq!(metric.fields.get("count"), Some(&FieldValue::Integer(4)));
    }

    #[test]
    fn test_tag_if_absent_keeps_existing() {
        let mut metric = Metric::new("mem").with_tag("host", "a");
        metric.tag_if_absent("host", "b");
        metric.tag_if_absent("dc", "eu");
        assert_eq!(metric.tags["host"], "a");
        assert_eq!(metric.tags["dc"], "eu");
    }

    #[test]
    fn test_json_shape() {
        let metric = Metric::new("disk").with_field("free", 10_u64);
        let json = serde_json::to_value(&metric).unwrap();
        assert_eq!(json["name"], "disk");
        assert_eq!(json["fields"]["free"], 10);
    }
}
