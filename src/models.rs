use crate::error::{AltmetricError, Result};
use crate::flatten::flatten_json;
use crate::identifier::Identifier;
use crate::table::MetricsTable;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A scalar value from a flattened Altmetric response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl MetricValue {
    /// Convert a JSON scalar; `None` for nulls and containers
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(MetricValue::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(MetricValue::Integer(i)),
                None => n.as_f64().map(MetricValue::Float),
            },
            Value::String(s) => Some(MetricValue::Text(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetricValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetricValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value, widening integers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Integer(i) => Some(*i as f64),
            MetricValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetricValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Bool(b) => write!(f, "{}", b),
            MetricValue::Integer(i) => write!(f, "{}", i),
            MetricValue::Float(x) => write!(f, "{}", x),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        MetricValue::Text(value)
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        MetricValue::Integer(value)
    }
}

impl From<i32> for MetricValue {
    fn from(value: i32) -> Self {
        MetricValue::Integer(value.into())
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Float(value)
    }
}

impl From<bool> for MetricValue {
    fn from(value: bool) -> Self {
        MetricValue::Bool(value)
    }
}

/// Marker carried by serialized results so reloaded JSON can be checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum ResultKind {
    #[serde(rename = "altmetric")]
    Altmetric,
}

/// Flattened attention metrics for one scholarly object
///
/// Only [`AltmetricClient::fetch_metrics`](crate::AltmetricClient::fetch_metrics)
/// builds these from a live response; [`MetricsResult::from_json_value`]
/// restores one that was previously serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsResult {
    kind: ResultKind,
    identifier: Identifier,
    fields: Vec<(String, MetricValue)>,
    raw: Value,
}

impl MetricsResult {
    pub(crate) fn new(identifier: Identifier, document: Value) -> Self {
        Self {
            kind: ResultKind::Altmetric,
            identifier,
            fields: flatten_json(&document),
            raw: document,
        }
    }

    /// Restore a result from its serialized JSON form
    ///
    /// # Errors
    ///
    /// Returns `AltmetricError::NotAMetricsResult` if the value is not a
    /// serialized `MetricsResult` (for instance a raw API response or any
    /// unrelated JSON).
    pub fn from_json_value(value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(|err| AltmetricError::NotAMetricsResult {
            found: format!("{} ({})", describe_json(value), err),
        })
    }

    /// The identifier this result was fetched for
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// Look up a flattened value by its key path
    pub fn get(&self, path: &str) -> Option<&MetricValue> {
        self.fields
            .iter()
            .find(|(key, _)| key == path)
            .map(|(_, value)| value)
    }

    /// Iterate over `(path, value)` pairs in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Flattened key paths in document order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The response document as received
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Project into a single-row table
    pub fn to_table(&self) -> MetricsTable {
        MetricsTable::from_result(self)
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title").and_then(MetricValue::as_str)
    }

    /// Altmetric attention score
    pub fn score(&self) -> Option<f64> {
        self.get("score").and_then(MetricValue::as_f64)
    }

    pub fn altmetric_id(&self) -> Option<i64> {
        self.get("altmetric_id").and_then(MetricValue::as_i64)
    }

    pub fn doi(&self) -> Option<&str> {
        self.get("doi").and_then(MetricValue::as_str)
    }

    pub fn details_url(&self) -> Option<&str> {
        self.get("details_url").and_then(MetricValue::as_str)
    }

    /// Total posts mentioning the object, from either response layout
    pub fn cited_by_posts_count(&self) -> Option<i64> {
        self.get("cited_by_posts_count")
            .or_else(|| self.get("counts.cited_by_posts_count"))
            .and_then(MetricValue::as_i64)
    }
}

impl<'a> IntoIterator for &'a MetricsResult {
    type Item = (&'a str, &'a MetricValue);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a MetricValue)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

fn describe_json(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(map) if map.contains_key("kind") => "an object with a foreign kind marker",
        Value::Object(_) => "an object without the altmetric marker",
    }
}
