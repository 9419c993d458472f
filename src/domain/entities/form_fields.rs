use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Turns whatever a client sent into text.
///
/// Form posts always carry text, JSON clients send `"budget": 5000`, and bots
/// send anything. Every value lands here as a string so that a wrong type never
/// fails the body before the honeypot and field rules have looked at it.
fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.is_finite() => format!("{}", f as i64),
            _ => n.to_string(),
        }),
        other => Some(other.to_string()),
    }
}

/// `deserialize_with` helper for optional fields of any JSON type.
pub fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(value_to_text))
}

/// `deserialize_with` helper for required fields; `null` reads as empty.
pub fn loose_required<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(loose_text(deserializer)?.unwrap_or_default())
}

/// Trims a required field in place.
pub fn trim_required(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

/// Trims an optional field; blank input counts as absent.
pub fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(trim_required)
        .filter(|s| !s.is_empty())
}

/// True when the field was submitted with something other than whitespace.
pub fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.trim().is_empty())
}
