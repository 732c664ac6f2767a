use tagres::Payload;

/// Parse a CLI payload as JSON, falling back to a plain string.
pub(crate) fn parse_cli_payload(raw: &str) -> Payload {
    serde_json::from_str(raw).unwrap_or_else(|_| Payload::String(raw.to_string()))
}

pub(crate) fn render_then(outcome: Option<Payload>) -> String {
    match outcome {
        Some(payload) => payload.to_string(),
        None => "no match".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_parses_json_or_falls_back_to_text() {
        assert_eq!(parse_cli_payload("42"), json!(42));
        assert_eq!(parse_cli_payload(r#"{"a": [1]}"#), json!({"a": [1]}));
        assert_eq!(parse_cli_payload("\"quoted\""), json!("quoted"));
        assert_eq!(parse_cli_payload("Meta."), json!("Meta."));
    }

    #[test]
    fn then_sentinel_is_rendered_apart_from_null() {
        assert_eq!(render_then(None), "no match");
        assert_eq!(render_then(Some(json!(null))), "null");
        assert_eq!(render_then(Some(json!(false))), "false");
    }
}
