//! Lenient readers for order form fields.
//!
//! Form values arrive as whatever the client sent. These never fail, so a
//! bad value reaches the order validator instead of stopping at decoding.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `true` only for `true` or `"true"`; anything else is `false`.
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

/// A string as sent, a number in its decimal form, anything else empty.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}
