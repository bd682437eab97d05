//! HTTP transport: a plain query endpoint and an incrementally-flushed
//! event stream, both thin shells over the shared handler.
//!
//! Errors stay in-band: the body carries `isError` and the status is always
//! 200, matching the tool protocol where a failed call is not a failed
//! request.

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures::stream::Stream;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::{convert::Infallible, sync::Arc};
use tokio::{net::TcpListener, signal, sync::mpsc};
use tracing::{info, instrument};

use skycast_core::{ProgressSink, ProgressStage, ResultEnvelope, WeatherService};

use crate::rpc::ToolCallResult;

#[derive(Clone)]
struct AppState {
    service: Arc<WeatherService>,
}

/// Bind and serve until ctrl-c.
pub async fn serve(service: Arc<WeatherService>, host: &str, port: u16) -> Result<()> {
    let app = router(service);

    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for ctrl-c or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install ctrl-c handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received ctrl-c, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}

/// Build the router. Separate from [`serve`] so tests can drive it directly.
pub fn router(service: Arc<WeatherService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/weather", get(get_weather))
        .route("/weather/stream", get(weather_stream))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(AppState { service })
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Query parameters, mapped 1:1 onto the shared argument keys.
#[derive(Debug, Default, Deserialize)]
struct WeatherParams {
    city: Option<String>,
    units: Option<String>,
    mode: Option<String>,
    days: Option<String>,
    format: Option<String>,
}

impl WeatherParams {
    /// Translate query scalars into the argument map.
    ///
    /// Query strings carry no types, so `days` is promoted to a JSON number
    /// when it parses as one; otherwise the raw string goes through and the
    /// validator reports it.
    fn into_args(self) -> Map<String, Value> {
        let mut args = Map::new();

        if let Some(city) = self.city {
            args.insert("city".to_string(), Value::String(city));
        }
        if let Some(units) = self.units {
            args.insert("units".to_string(), Value::String(units));
        }
        if let Some(mode) = self.mode {
            args.insert("mode".to_string(), Value::String(mode));
        }
        if let Some(days) = self.days {
            let value = days
                .parse::<i64>()
                .map_or(Value::String(days), Value::from);
            args.insert("days".to_string(), value);
        }
        if let Some(format) = self.format {
            args.insert("format".to_string(), Value::String(format));
        }

        args
    }
}

#[instrument(skip(state, params))]
async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Json<ToolCallResult> {
    let envelope = state.service.get_weather(&params.into_args()).await;
    Json(ToolCallResult::from(envelope))
}

/// Progress sink that forwards checkpoints onto the SSE channel.
///
/// Sends are fire-and-forget: a client that went away just drops events.
struct ChannelProgress {
    tx: mpsc::UnboundedSender<Event>,
}

impl ProgressSink for ChannelProgress {
    fn emit(&self, stage: ProgressStage) {
        let _ = self.tx.send(progress_event(stage));
    }
}

fn progress_event(stage: ProgressStage) -> Event {
    Event::default()
        .event("progress")
        .data(json!({"stage": stage.as_str()}).to_string())
}

fn terminal_event(envelope: ResultEnvelope) -> Event {
    let name = if envelope.is_error { "error" } else { "result" };
    let result = ToolCallResult::from(envelope);
    let data = serde_json::to_value(&result)
        .unwrap_or_else(|_| json!({}))
        .to_string();

    Event::default().event(name).data(data)
}

#[instrument(skip(state, params))]
async fn weather_stream(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, rx) = mpsc::unbounded_channel();
    let service = Arc::clone(&state.service);
    let args = params.into_args();

    tokio::spawn(async move {
        let progress = ChannelProgress { tx: tx.clone() };
        let envelope = service.get_weather_with_progress(&args, &progress).await;
        let _ = tx.send(terminal_event(envelope));
    });

    let stream = futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|event| (Ok::<_, Infallible>(event), rx))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
