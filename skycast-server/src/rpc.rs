//! Wire types for the tool-call protocol.
//!
//! A hand-written slice of JSON-RPC 2.0 plus the tool-result shape: just the
//! messages the stdio transport speaks. The HTTP transports reuse
//! [`ToolCallResult`] so every transport serializes the envelope identically.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use skycast_core::{ResultContent, ResultEnvelope};

pub const JSONRPC_VERSION: &str = "2.0";
pub const PROTOCOL_VERSION: &str = "2025-06-18";

pub const TOOL_NAME: &str = "get_weather";

// Standard JSON-RPC error codes
pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;

/// A request ID, which JSON-RPC allows to be a string or a number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RequestId {
    String(String),
    Number(i64),
}

/// An incoming message. A missing `id` marks a notification.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    #[allow(dead_code)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<RequestId>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: RequestId,
    pub result: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcErrorResponse {
    pub jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    pub error: ErrorObject,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
}

pub fn response(id: RequestId, result: Value) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: JSONRPC_VERSION,
        id,
        result,
    }
}

pub fn error_response(id: Option<RequestId>, code: i32, message: impl Into<String>) -> JsonRpcErrorResponse {
    JsonRpcErrorResponse {
        jsonrpc: JSONRPC_VERSION,
        id,
        error: ErrorObject {
            code,
            message: message.into(),
        },
    }
}

/// A content block inside a tool result. Only text blocks are produced here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
}

/// The wire shape of one tool call's outcome, shared by all transports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallResult {
    pub content: Vec<ContentBlock>,
    #[serde(rename = "structuredContent", skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl From<ResultEnvelope> for ToolCallResult {
    fn from(envelope: ResultEnvelope) -> Self {
        match envelope.content {
            ResultContent::Text(text) => Self {
                content: vec![ContentBlock::Text { text }],
                structured_content: None,
                is_error: envelope.is_error,
            },
            ResultContent::Structured(value) => Self {
                content: Vec::new(),
                structured_content: Some(value),
                is_error: envelope.is_error,
            },
        }
    }
}

/// Arguments of a `tools/call` request.
pub fn call_arguments(params: Option<&Value>) -> (Option<&str>, Map<String, Value>) {
    let name = params
        .and_then(|p| p.get("name"))
        .and_then(Value::as_str);
    let arguments = params
        .and_then(|p| p.get("arguments"))
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    (name, arguments)
}

/// The single tool this server advertises.
pub fn tool_descriptor() -> Value {
    json!({
        "name": TOOL_NAME,
        "description": "Get current, hourly, or daily weather for a city",
        "inputSchema": {
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "City name to look up"
                },
                "units": {
                    "type": "string",
                    "enum": ["metric", "imperial"],
                    "description": "Measurement system (default metric)"
                },
                "mode": {
                    "type": "string",
                    "enum": ["current", "hourly", "daily"],
                    "description": "Report shape (default current)"
                },
                "days": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 16,
                    "description": "Forecast days, daily mode only (7 to 10, default 7)"
                },
                "format": {
                    "type": "string",
                    "enum": ["json", "text"],
                    "description": "Payload format (default from server config)"
                }
            },
            "required": ["city"]
        }
    })
}

pub fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": "skycast",
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_with_numeric_id_parses() {
        let line = r#"{"jsonrpc": "2.0", "id": 7, "method": "tools/list"}"#;
        let request: JsonRpcRequest = serde_json::from_str(line).expect("should parse");

        assert_eq!(request.id, Some(RequestId::Number(7)));
        assert_eq!(request.method, "tools/list");
    }

    #[test]
    fn request_with_string_id_parses() {
        let line = r#"{"jsonrpc": "2.0", "id": "abc", "method": "ping"}"#;
        let request: JsonRpcRequest = serde_json::from_str(line).expect("should parse");

        assert_eq!(request.id, Some(RequestId::String("abc".to_string())));
    }

    #[test]
    fn notification_has_no_id() {
        let line = r#"{"jsonrpc": "2.0", "method": "notifications/initialized"}"#;
        let request: JsonRpcRequest = serde_json::from_str(line).expect("should parse");

        assert!(request.id.is_none());
    }

    #[test]
    fn text_envelope_becomes_content_block() {
        let envelope = ResultEnvelope::text_error("Location 'Atlantis' not found");
        let result = ToolCallResult::from(envelope);

        assert!(result.is_error);
        assert!(result.structured_content.is_none());
        assert_eq!(
            result.content,
            vec![ContentBlock::Text {
                text: "Location 'Atlantis' not found".to_string()
            }]
        );

        let wire = serde_json::to_value(&result).expect("should serialize");
        assert_eq!(wire["content"][0]["type"], "text");
        assert_eq!(wire["isError"], true);
    }

    #[test]
    fn structured_envelope_becomes_structured_content() {
        let envelope = ResultEnvelope::success(
            skycast_core::Format::Json,
            json!({"temperature": 20.4}),
        );
        let result = ToolCallResult::from(envelope);

        assert!(!result.is_error);
        assert!(result.content.is_empty());

        let wire = serde_json::to_value(&result).expect("should serialize");
        assert_eq!(wire["structuredContent"]["temperature"], 20.4);
        assert_eq!(wire["isError"], false);
    }

    #[test]
    fn call_arguments_extracts_name_and_map() {
        let params = json!({
            "name": "get_weather",
            "arguments": {"city": "Berlin", "days": 7}
        });

        let (name, arguments) = call_arguments(Some(&params));
        assert_eq!(name, Some("get_weather"));
        assert_eq!(arguments.get("city"), Some(&json!("Berlin")));
        assert_eq!(arguments.get("days"), Some(&json!(7)));
    }

    #[test]
    fn call_arguments_tolerates_missing_pieces() {
        let (name, arguments) = call_arguments(None);
        assert_eq!(name, None);
        assert!(arguments.is_empty());
    }

    #[test]
    fn tool_descriptor_requires_city() {
        let descriptor = tool_descriptor();
        assert_eq!(descriptor["name"], "get_weather");
        assert_eq!(descriptor["inputSchema"]["required"], json!(["city"]));
        assert_eq!(descriptor["inputSchema"]["properties"]["days"]["maximum"], 16);
    }
}
