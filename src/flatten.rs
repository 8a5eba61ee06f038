//! Flattening of nested JSON documents into single-level key paths
//!
//! Object members are joined with `.` and array elements are indexed with
//! `[n]`, so `{"counts": {"posts": 3}, "authors": ["A", "B"]}` becomes
//! `counts.posts`, `authors[0]` and `authors[1]`. Nulls and empty containers
//! produce no entries. Entries keep the order of the source document.
//!
//! Paths are not escaped, so a key that itself contains `.` can collide with
//! a nested path: `{"a.b": 1, "a": {"b": 2}}` yields two `a.b` entries. Both
//! are kept, in document order; lookups by name see the first one.

use crate::models::MetricValue;
use serde_json::Value;

/// Key used when the document itself is a scalar
pub const SCALAR_KEY: &str = "value";

/// Flatten a JSON document into ordered `(path, value)` pairs
///
/// # Example
///
/// ```
/// use altmetric_client::flatten::flatten_json;
/// use altmetric_client::MetricValue;
/// use serde_json::json;
///
/// let flat = flatten_json(&json!({
///     "title": "T",
///     "counts": { "cited_by_posts_count": 3 }
/// }));
///
/// assert_eq!(flat[0], ("title".to_string(), MetricValue::from("T")));
/// assert_eq!(
///     flat[1],
///     ("counts.cited_by_posts_count".to_string(), MetricValue::from(3))
/// );
/// ```
pub fn flatten_json(document: &Value) -> Vec<(String, MetricValue)> {
    let mut entries = Vec::new();
    match document {
        Value::Object(_) | Value::Array(_) => flatten_into(String::new(), document, &mut entries),
        scalar => flatten_into(SCALAR_KEY.to_string(), scalar, &mut entries),
    }
    entries
}

fn flatten_into(path: String, value: &Value, entries: &mut Vec<(String, MetricValue)>) {
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                flatten_into(child_path, child, entries);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(format!("{}[{}]", path, index), child, entries);
            }
        }
        scalar => {
            if let Some(metric) = MetricValue::from_json(scalar) {
                entries.push((path, metric));
            }
        }
    }
}
