use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::alerts::AlertHandler;
use crate::config::Config;
use crate::error::WebhookError;
use crate::event::CallEvent;
use crate::filter::CallFilter;
use crate::window::TimeWindow;

/// Shared state for the webhook server: the startup configuration, the
/// filter built from it, and the injected alert handler.
pub struct AppState {
    pub config: Config,
    pub filter: CallFilter,
    pub alert: Arc<dyn AlertHandler>,
}

impl AppState {
    pub fn new(config: Config, alert: Arc<dyn AlertHandler>) -> Self {
        let window = TimeWindow::new(config.start_hour, config.end_hour, config.timezone);
        Self {
            config,
            filter: CallFilter::new(window),
            alert,
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/ringba-webhook", post(ringba_webhook))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
}

/// Bind and run the server until ctrl-c.
pub async fn serve(state: Arc<AppState>) -> Result<()> {
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

/// A panicking handler must still produce a response; requests never
/// take the process down.
fn handle_panic(_err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    tracing::error!("Panic while handling request");
    WebhookError::Internal.into_response()
}

/// Health check response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    monitoring_hours: String,
    timezone: &'static str,
}

/// Response for a call that did not pass the filter.
#[derive(Debug, Serialize)]
struct FilteredResponse {
    status: &'static str,
    message: &'static str,
}

/// Response for a call whose notification went out.
#[derive(Debug, Serialize)]
struct DispatchedResponse {
    caller_id: String,
    target_name: String,
    status: &'static str,
    time: String,
    message: &'static str,
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "Ringba After Hours Monitor",
        monitoring_hours: state.config.monitoring_hours(),
        timezone: state.config.timezone.name(),
    })
}

async fn ringba_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match handle_webhook(&state, &headers, &body).await {
        Ok(response) => response,
        Err(err) => {
            tracing::error!("Error processing webhook: {}", err);
            err.into_response()
        }
    }
}

async fn handle_webhook(
    state: &AppState,
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<Response, WebhookError> {
    tracing::debug!(
        "Webhook request: content-type='{}', length={}, user-agent='{}'",
        header_str(headers, "content-type"),
        body.len(),
        header_str(headers, "user-agent")
    );

    // An empty body is a platform misconfiguration, not an error; answer
    // with a hint about what we expected.
    if body.is_empty() {
        tracing::warn!("Empty webhook body - check the Ringba webhook configuration");
        return Ok((
            StatusCode::OK,
            Json(json!({
                "status": "received",
                "message": "Empty request received - check Ringba webhook configuration",
                "expected_format": {
                    "targetName": "actual target name (not blank/empty/No value)",
                    "callerId": "example_caller_id",
                    "timestamp": "2024-01-01T12:00:00Z"
                }
            })),
        )
            .into_response());
    }

    let raw_text = std::str::from_utf8(body).map_err(|_| WebhookError::Encoding)?;
    tracing::debug!("Raw webhook body: '{}'", raw_text);

    // The platform is sloppy about Content-Type, so parse the raw text
    // no matter what the header says.
    let payload: Value = serde_json::from_str(raw_text).map_err(|_| WebhookError::Json)?;

    if is_empty_payload(&payload) {
        return Err(WebhookError::NoData);
    }

    // Slack URL verification handshake.
    if payload.get("type").and_then(Value::as_str) == Some("url_verification") {
        if let Some(challenge) = payload.get("challenge").and_then(Value::as_str) {
            return Ok((StatusCode::OK, Json(json!({ "challenge": challenge }))).into_response());
        }
    }

    let event = CallEvent::from_payload(&payload);
    tracing::info!(
        "Parsed call event: targetName='{}', callerId='{}', timestamp={:?}",
        event.target_name,
        event.caller_id,
        event.timestamp
    );

    let decision = state
        .filter
        .evaluate(&event.target_name, event.timestamp.as_deref());
    if !decision.is_admitted() {
        tracing::info!(
            "Call filtered out ({:?}): targetName='{}', timestamp={:?}",
            decision,
            event.target_name,
            event.timestamp
        );
        return Ok((
            StatusCode::OK,
            Json(FilteredResponse {
                status: "filtered",
                message: "Call does not match filter criteria",
            }),
        )
            .into_response());
    }

    // Pass the platform's timestamp through verbatim; only synthesize a
    // display time when none was supplied.
    let time_of_call = match &event.timestamp {
        Some(ts) => ts.clone(),
        None => Utc::now()
            .with_timezone(&state.config.timezone)
            .format("%Y-%m-%d %I:%M:%S %p %Z")
            .to_string(),
    };

    state
        .alert
        .send(
            &event.caller_id,
            &time_of_call,
            &event.target_name,
            "After Hours Call",
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to send Slack notification: {}", e);
            WebhookError::Dispatch
        })?;

    tracing::info!(
        "Processed after hours call from {} with target {}",
        event.caller_id,
        event.target_name
    );

    Ok((
        StatusCode::OK,
        Json(DispatchedResponse {
            caller_id: event.caller_id,
            target_name: event.target_name,
            status: "success",
            time: time_of_call,
            message: "After hours call notification sent",
        }),
    )
        .into_response())
}

/// Mirrors the platform's habit of POSTing JSON that decodes to nothing
/// useful: null, false, zero, and empty strings/objects/arrays all count
/// as no data.
fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
