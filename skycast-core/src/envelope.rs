//! The transport-neutral result envelope.
//!
//! Success and failure both travel through [`ResultEnvelope`]; transports only
//! serialize it, they never invent their own error signaling.

use serde_json::{Value, json};

use crate::{args::ArgumentIssue, model::Format};

/// Payload carrier: a plain string or a structured JSON document.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultContent {
    Text(String),
    Structured(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultEnvelope {
    pub content: ResultContent,
    pub is_error: bool,
}

impl ResultEnvelope {
    /// Package a successful payload in the requested format.
    pub fn success(format: Format, payload: Value) -> Self {
        package(format, payload, false)
    }

    /// Package a domain-error payload in the requested format.
    pub fn domain_error(format: Format, payload: Value) -> Self {
        package(format, payload, true)
    }

    /// An error reported as a plain human-readable message.
    pub fn text_error(message: impl Into<String>) -> Self {
        Self {
            content: ResultContent::Text(message.into()),
            is_error: true,
        }
    }

    /// A validation failure.
    ///
    /// Always structured, whatever format the caller asked for, so machine
    /// clients can read the per-field issues.
    pub fn invalid_arguments(issues: &[ArgumentIssue]) -> Self {
        Self {
            content: ResultContent::Structured(json!({
                "error": "invalid_arguments",
                "issues": issues,
            })),
            is_error: true,
        }
    }
}

/// Wrap a payload per the requested format.
///
/// Text mode serializes to compact single-line JSON; json mode carries the
/// value untouched.
pub fn package(format: Format, payload: Value, is_error: bool) -> ResultEnvelope {
    let content = match format {
        Format::Json => ResultContent::Structured(payload),
        Format::Text => ResultContent::Text(payload.to_string()),
    };

    ResultEnvelope { content, is_error }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_format_keeps_structure() {
        let envelope = ResultEnvelope::success(Format::Json, json!({"temperature": 20.4}));

        assert!(!envelope.is_error);
        assert_eq!(
            envelope.content,
            ResultContent::Structured(json!({"temperature": 20.4}))
        );
    }

    #[test]
    fn text_format_serializes_compactly() {
        let envelope =
            ResultEnvelope::success(Format::Text, json!({"temperature": 20.4, "wind_speed": 5.0}));

        let ResultContent::Text(text) = envelope.content else {
            panic!("expected text content");
        };
        assert_eq!(text, r#"{"temperature":20.4,"wind_speed":5.0}"#);
        assert!(!text.contains('\n'));
    }

    #[test]
    fn domain_errors_respect_format() {
        let envelope = ResultEnvelope::domain_error(Format::Text, json!({"error": "missing_daily"}));

        assert!(envelope.is_error);
        assert!(matches!(envelope.content, ResultContent::Text(_)));
    }

    #[test]
    fn invalid_arguments_are_always_structured() {
        let issues = vec![ArgumentIssue {
            path: "city".to_string(),
            message: "city is required".to_string(),
        }];

        // Structured even though nothing here asked for json.
        let envelope = ResultEnvelope::invalid_arguments(&issues);

        assert!(envelope.is_error);
        let ResultContent::Structured(value) = envelope.content else {
            panic!("expected structured content");
        };
        assert_eq!(value["error"], "invalid_arguments");
        assert_eq!(value["issues"][0]["path"], "city");
        assert_eq!(value["issues"][0]["message"], "city is required");
    }

    #[test]
    fn text_errors_carry_the_message() {
        let envelope = ResultEnvelope::text_error("Location 'Atlantis' not found");

        assert!(envelope.is_error);
        assert_eq!(
            envelope.content,
            ResultContent::Text("Location 'Atlantis' not found".to_string())
        );
    }
}
