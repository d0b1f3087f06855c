// src/types/mod.rs
//! Transport shapes mirrored from the API gateway
//!
//! Response types hold the keys they need typed and keep everything else
//! as raw JSON, so a decoded body re-serializes to exactly what the backend
//! sent. Loose fields are read through accessors instead of typed members.

pub mod admin;
pub mod career_ark;
pub mod cv_data;
pub mod records;
pub mod response;

pub use admin::*;
pub use career_ark::*;
pub use cv_data::*;
pub use records::*;
pub use response::*;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

pub type JsonObject = Map<String, Value>;

/// Record id as sent by the backend. Some services use strings, others
/// integers; the original form is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(Number),
    Text(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{}", n),
            Id::Text(s) => write!(f, "{}", s),
        }
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        match self {
            Id::Text(s) => s == other,
            Id::Number(n) => n.to_string() == other,
        }
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

pub(crate) fn str_field<'a>(fields: &'a JsonObject, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}

pub(crate) fn object_field<'a>(fields: &'a JsonObject, key: &str) -> Option<&'a JsonObject> {
    fields.get(key).and_then(Value::as_object)
}

/// Entries of a list field; `null`, a missing key or a non-list reads as empty.
pub(crate) fn list_field<'a>(fields: &'a JsonObject, key: &str) -> &'a [Value] {
    match fields.get(key) {
        Some(Value::Array(items)) => items,
        _ => &[],
    }
}

pub(crate) fn text_list<'a>(fields: &'a JsonObject, key: &str) -> Vec<&'a str> {
    list_field(fields, key)
        .iter()
        .filter_map(Value::as_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_keeps_wire_form() {
        let numeric: Id = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(numeric.to_string(), "7");
        assert_eq!(numeric, "7");
        assert_eq!(serde_json::to_value(&numeric).unwrap(), json!(7));

        let text: Id = serde_json::from_value(json!("j-1")).unwrap();
        assert_eq!(serde_json::to_value(&text).unwrap(), json!("j-1"));
        assert!(serde_json::from_value::<Id>(json!(null)).is_err());
    }

    #[test]
    fn test_list_field_tolerates_null() {
        let fields: JsonObject = serde_json::from_value(json!({
            "a": null,
            "b": {"x": 1},
            "c": ["rust", 3, "sql"]
        }))
        .unwrap();
        assert!(list_field(&fields, "a").is_empty());
        assert!(list_field(&fields, "b").is_empty());
        assert!(list_field(&fields, "missing").is_empty());
        assert_eq!(text_list(&fields, "c"), vec!["rust", "sql"]);
    }
}
