use serde_json::Value;
use thiserror::Error;

/// Failure reported by the provider's HTTP API
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} API error ({status}): {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },
    
    #[error("{provider} stream error: {message}")]
    Stream {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    /// Human readable message without the provider/status prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Api { message, .. } | Self::Stream { message, .. } => message,
        }
    }
}

/// Normalize an error body into a readable message
/// 
/// `{"error": {"message": ...}}` yields the message, a JSON string yields the
/// string, other JSON is re-serialized and non-JSON text passes through.
pub fn error_message_from_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "unknown error".to_string();
    }
    
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(s)) => s,
        Ok(value) => value
            .get("error")
            .and_then(|e| e.get("message").or(Some(e)))
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        Err(_) => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_error_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message_from_body(body), "API key not valid");
    }

    #[test]
    fn test_string_error() {
        assert_eq!(error_message_from_body(r#"{"error": "quota exceeded"}"#), "quota exceeded");
        assert_eq!(error_message_from_body(r#""plain json string""#), "plain json string");
    }

    #[test]
    fn test_unknown_json_is_stringified() {
        assert_eq!(error_message_from_body(r#"{"code":7}"#), r#"{"code":7}"#);
    }

    #[test]
    fn test_text_passthrough() {
        assert_eq!(error_message_from_body("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(error_message_from_body(""), "unknown error");
    }
}
