//! Backend-native field container
//!
//! `LogContext` holds a record's fields after translation: an insertion
//! ordered `serde_json` map. Namespaces are nested objects. Re-inserting a key
//! keeps its original position and replaces its value.

use super::output_format::escape_control;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogContext {
    fields: Map<String, Value>,
}

impl LogContext {
    /// Create a new empty log context
    pub fn new() -> Self {
        Self { fields: Map::new() }
    }

    /// Add a field to the context
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.insert(key, value);
        self
    }

    /// Add a field to the context (mutable version)
    pub fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.fields.insert(key.into(), value.into());
    }

    /// Append every field of `other`, in order
    pub fn extend(&mut self, other: LogContext) {
        for (key, value) in other.fields {
            self.fields.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Get all fields
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.fields
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if context has any fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    /// Format fields as key=value pairs
    ///
    /// Strings are written raw, everything else as compact JSON.
    pub fn format_fields(&self) -> String {
        self.fields
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => format!("{}={}", k, escape_control(s)),
                other => format!("{}={}", k, other),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<Map<String, Value>> for LogContext {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_fields())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_log_context_creation() {
        let ctx = LogContext::new();
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let ctx = LogContext::new()
            .with_field("zeta", 1)
            .with_field("alpha", 2)
            .with_field("mid", 3);

        assert_eq!(ctx.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_duplicate_key_keeps_position_and_last_value() {
        let mut ctx = LogContext::new().with_field("a", 1).with_field("b", 2);
        ctx.insert("a", 3);

        assert_eq!(ctx.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(ctx.get("a"), Some(&json!(3)));
    }

    #[test]
    fn test_format_fields() {
        let ctx = LogContext::new()
            .with_field("user", "alice")
            .with_field("attempts", 3)
            .with_field("tags", json!(["a", "b"]))
            .with_field("req", json!({"id": 7}));

        assert_eq!(
            ctx.format_fields(),
            r#"user=alice attempts=3 tags=["a","b"] req={"id":7}"#
        );
    }

    #[test]
    fn test_format_fields_escapes_line_breaks() {
        let ctx = LogContext::new().with_field("note", "ok\nERROR forged");
        assert_eq!(ctx.format_fields(), "note=ok\\nERROR forged");
    }

    #[test]
    fn test_extend_appends() {
        let mut base = LogContext::new().with_field("service", "api");
        base.extend(LogContext::new().with_field("user_id", 123));

        assert_eq!(base.keys().collect::<Vec<_>>(), vec!["service", "user_id"]);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let ctx = LogContext::new().with_field("k", "v");
        assert_eq!(serde_json::to_value(&ctx).unwrap(), json!({"k": "v"}));
    }
}
