use serde_json::Value;
use tracing::debug;

use crate::error::{Result, SubtransError};

/// Parse an oracle response that is expected to hold a JSON array.
///
/// The whole response is tried first. When that fails the text between the
/// first `[` and the last `]` is tried, which recovers arrays wrapped in prose
/// or code fences. Brackets inside surrounding prose defeat this.
pub fn parse_json_response(raw: &str) -> Result<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        return Ok(value);
    }

    let start = raw.find('[');
    let end = raw.rfind(']');
    match (start, end) {
        (Some(start), Some(end)) if start < end => {
            let candidate = &raw[start..=end];
            debug!("Extracted JSON array from mixed text: {}", candidate);
            serde_json::from_str::<Value>(candidate).map_err(|e| {
                SubtransError::Contract(format!("Embedded array is not valid JSON: {}", e))
            })
        }
        _ => Err(SubtransError::Contract(
            "Response is not a JSON array".to_string(),
        )),
    }
}

/// Check the structural contract and pull out one translated string per input line
pub fn extract_translations(value: Value, expected: usize) -> Result<Vec<String>> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(SubtransError::Contract(format!(
                "Expected a JSON array, got {}",
                json_type_name(&other)
            )));
        }
    };

    if items.len() != expected {
        return Err(SubtransError::Contract(format!(
            "Expected {} entries, got {}",
            expected,
            items.len()
        )));
    }

    let object_mode = matches!(items.first(), Some(Value::Object(_)));

    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| match item {
            Value::Object(mut fields) if object_mode => {
                Ok(fields.remove("text").map(value_to_text).unwrap_or_default())
            }
            other if object_mode => Err(SubtransError::Contract(format!(
                "Entry {} is {}, expected an object",
                position,
                json_type_name(&other)
            ))),
            other => Ok(value_to_text(other)),
        })
        .collect()
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_parse() {
        let value = parse_json_response(r#"[{"id":0,"text":"Привет"}]"#).unwrap();
        assert_eq!(value, json!([{"id": 0, "text": "Привет"}]));
    }

    #[test]
    fn test_bracket_recovery_from_prose() {
        let raw = "Here you go:\n[{\"id\":0,\"text\":\"Привет\"}]\nThanks!";
        let value = parse_json_response(raw).unwrap();
        assert_eq!(value, json!([{"id": 0, "text": "Привет"}]));
    }

    #[test]
    fn test_bracket_recovery_from_code_fence() {
        let raw = "```json\n[\"a\", \"b\"]\n```";
        assert_eq!(parse_json_response(raw).unwrap(), json!(["a", "b"]));
    }

    #[test]
    fn test_no_brackets_is_contract_violation() {
        let err = parse_json_response("I cannot help with that.").unwrap_err();
        assert!(matches!(err, SubtransError::Contract(_)));
    }

    #[test]
    fn test_stray_brackets_in_prose_defeat_recovery() {
        let raw = "Note [1]: here it is [{\"id\":0,\"text\":\"x\"}] done";
        assert!(matches!(parse_json_response(raw), Err(SubtransError::Contract(_))));
    }

    #[test]
    fn test_object_entries() {
        let value = json!([
            {"id": 0, "text": "Привет"},
            {"id": 1},
            {"id": 2, "text": null},
            {"id": 3, "text": 7}
        ]);
        assert_eq!(
            extract_translations(value, 4).unwrap(),
            vec!["Привет", "", "", "7"]
        );
    }

    #[test]
    fn test_bare_values_are_coerced() {
        let value = json!(["Мир", null, 12, true]);
        assert_eq!(
            extract_translations(value, 4).unwrap(),
            vec!["Мир", "", "12", "true"]
        );
    }

    #[test]
    fn test_wrong_length_rejected() {
        let value = json!([{"id": 0, "text": "a"}]);
        assert!(matches!(
            extract_translations(value, 2),
            Err(SubtransError::Contract(_))
        ));
    }

    #[test]
    fn test_non_array_rejected() {
        let value = json!({"id": 0, "text": "a"});
        assert!(matches!(
            extract_translations(value, 1),
            Err(SubtransError::Contract(_))
        ));
    }

    #[test]
    fn test_mixed_entries_rejected() {
        let value = json!([{"id": 0, "text": "a"}, "b"]);
        assert!(matches!(
            extract_translations(value, 2),
            Err(SubtransError::Contract(_))
        ));
    }
}
