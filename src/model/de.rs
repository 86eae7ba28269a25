//! Lenient field deserializers for documents written by older editor builds.

use serde::{Deserialize, Deserializer, de::Error};
use serde_json::Value;

use super::TransitionType;

/// Accepts `"12"` or `12` and yields `"12"`.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("expected string or number id, found {}", other))),
    }
}

/// Like [`string_or_number`] but `null` or a missing field yields `None`.
pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(D::Error::custom(format!("expected string or number id, found {}", other))),
    }
}

/// Accepts any scalar and keeps its textual form; `null` becomes empty.
pub fn scalar_to_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!("expected a scalar value, found {}", other))),
    }
}

/// Reads a transition mode the way the editor renders it: `btnsto` or `buttons`
/// offer buttons, any other value falls back to a direct transition.
pub fn opt_transition_type<'de, D>(deserializer: D) -> Result<Option<TransitionType>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s == "btnsto" || s == "buttons" => Ok(Some(TransitionType::ButtonChoice)),
        _ => Ok(Some(TransitionType::Direct)),
    }
}
