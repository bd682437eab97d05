//! Tool-call protocol over stdin/stdout.
//!
//! Line-delimited JSON-RPC: one message per line in, one per line out.
//! Logging goes to stderr so the protocol stream stays clean.

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use skycast_core::WeatherService;

use crate::rpc::{
    self, JsonRpcRequest, METHOD_NOT_FOUND, PARSE_ERROR, RequestId, ToolCallResult,
};

/// Serve the tool protocol until stdin closes.
pub async fn serve(service: Arc<WeatherService>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    info!("Serving tool protocol on stdio");

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }

        let reply = match serde_json::from_str::<JsonRpcRequest>(&line) {
            Ok(request) => handle_message(&service, request).await,
            Err(e) => Some(to_value(rpc::error_response(
                None,
                PARSE_ERROR,
                format!("Invalid JSON-RPC message: {e}"),
            ))),
        };

        if let Some(reply) = reply {
            let mut encoded = reply.to_string();
            encoded.push('\n');
            stdout
                .write_all(encoded.as_bytes())
                .await
                .context("Failed to write stdout")?;
            stdout.flush().await.context("Failed to flush stdout")?;
        }
    }

    info!("stdin closed, shutting down");
    Ok(())
}

/// Dispatch one message. Notifications produce no reply.
async fn handle_message(service: &WeatherService, request: JsonRpcRequest) -> Option<Value> {
    let Some(id) = request.id else {
        debug!(method = %request.method, "Ignoring notification");
        return None;
    };

    let reply = match request.method.as_str() {
        "initialize" => to_value(rpc::response(id, rpc::initialize_result())),
        "ping" => to_value(rpc::response(id, json!({}))),
        "tools/list" => to_value(rpc::response(
            id,
            json!({"tools": [rpc::tool_descriptor()]}),
        )),
        "tools/call" => handle_tool_call(service, id, request.params.as_ref()).await,
        method => to_value(rpc::error_response(
            Some(id),
            METHOD_NOT_FOUND,
            format!("Method not found: {method}"),
        )),
    };

    Some(reply)
}

async fn handle_tool_call(
    service: &WeatherService,
    id: RequestId,
    params: Option<&Value>,
) -> Value {
    let (name, arguments) = rpc::call_arguments(params);

    if name != Some(rpc::TOOL_NAME) {
        return to_value(rpc::error_response(
            Some(id),
            rpc::INVALID_PARAMS,
            format!("Unknown tool: {}", name.unwrap_or("<missing>")),
        ));
    }

    let envelope = service.get_weather(&arguments).await;
    let result = ToolCallResult::from(envelope);

    to_value(rpc::response(id, to_value(result)))
}

fn to_value<T: serde::Serialize>(message: T) -> Value {
    serde_json::to_value(message).unwrap_or_else(|_| json!({}))
}
