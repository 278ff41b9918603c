//! Defensive input parsing shared by all capabilities.
//!
//! Decision models hand back arguments in whatever shape they feel like:
//! a well-formed JSON object, a JSON-encoded string of an object, or a
//! bare string. Capabilities accept all three and treat anything
//! unrecognizable as raw text for their default field, so a sloppy model
//! turn degrades the answer rather than killing the session.

use serde_json::{Map, Value};

/// A capability's parsed input.
#[derive(Debug, Clone)]
pub enum CapabilityInput {
    /// A JSON object with named fields.
    Structured(Map<String, Value>),
    /// Anything else, treated as the capability's default field.
    RawText(String),
}

impl CapabilityInput {
    /// Parse a JSON arguments value into structured or raw form.
    pub fn parse(arguments: Value) -> Self {
        match arguments {
            Value::Object(map) => Self::Structured(map),
            Value::String(s) => {
                // A string that encodes a JSON object counts as structured.
                let trimmed = s.trim();
                if trimmed.starts_with('{') {
                    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
                        return Self::Structured(map);
                    }
                }
                Self::RawText(s)
            }
            Value::Null => Self::RawText(String::new()),
            other => Self::RawText(other.to_string()),
        }
    }

    /// Read a string field, or the raw text if this input is unstructured
    /// and `field` is the capability's default field.
    pub fn str_field(&self, field: &str, default_field: &str) -> Option<String> {
        match self {
            Self::Structured(map) => map.get(field).and_then(value_as_string),
            Self::RawText(s) if field == default_field && !s.is_empty() => Some(s.clone()),
            Self::RawText(_) => None,
        }
    }

    /// Read a string field with a fallback value.
    pub fn str_field_or(&self, field: &str, default_field: &str, fallback: &str) -> String {
        self.str_field(field, default_field)
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Read a u32 field, accepting numbers and numeric strings
    /// (with an optional " minutes" suffix).
    pub fn u32_field(&self, field: &str) -> Option<u32> {
        match self {
            Self::Structured(map) => match map.get(field)? {
                Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
                Value::String(s) => s.trim().trim_end_matches(" minutes").trim().parse().ok(),
                _ => None,
            },
            Self::RawText(_) => None,
        }
    }
}

/// Stringify scalar JSON values; objects and arrays are not field values.
fn value_as_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_parses_structured() {
        let input = CapabilityInput::parse(json!({"query": "fractions"}));
        assert_eq!(
            input.str_field("query", "query").as_deref(),
            Some("fractions")
        );
    }

    #[test]
    fn json_encoded_string_parses_structured() {
        let input = CapabilityInput::parse(json!(r#"{"topic": "algebra", "duration": 45}"#));
        assert_eq!(input.str_field("topic", "topic").as_deref(), Some("algebra"));
        assert_eq!(input.u32_field("duration"), Some(45));
    }

    #[test]
    fn bare_string_is_raw_text() {
        let input = CapabilityInput::parse(json!("photosynthesis"));
        assert_eq!(
            input.str_field("query", "query").as_deref(),
            Some("photosynthesis")
        );
        // Non-default fields are absent
        assert!(input.str_field("context", "query").is_none());
    }

    #[test]
    fn malformed_braces_fall_back_to_raw() {
        let input = CapabilityInput::parse(json!("{not json at all"));
        assert!(matches!(input, CapabilityInput::RawText(_)));
        assert_eq!(
            input.str_field("content", "content").as_deref(),
            Some("{not json at all")
        );
    }

    #[test]
    fn duration_accepts_minutes_suffix() {
        let input = CapabilityInput::parse(json!({"duration": "60 minutes"}));
        assert_eq!(input.u32_field("duration"), Some(60));
    }

    #[test]
    fn duration_beyond_u32_is_rejected() {
        let input = CapabilityInput::parse(json!({"duration": 4_294_967_296u64}));
        assert_eq!(input.u32_field("duration"), None);
        let input = CapabilityInput::parse(json!({"duration": -5}));
        assert_eq!(input.u32_field("duration"), None);
    }

    #[test]
    fn numeric_fields_stringify() {
        let input = CapabilityInput::parse(json!({"age_group": 12}));
        assert_eq!(input.str_field("age_group", "content").as_deref(), Some("12"));
    }

    #[test]
    fn null_is_empty_raw() {
        let input = CapabilityInput::parse(Value::Null);
        assert!(input.str_field("query", "query").is_none());
    }
}
