use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Request-level failures for the webhook endpoint. Filtered calls are
/// routine outcomes, not errors, and never appear here.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Body bytes are not valid UTF-8.
    #[error("Invalid request encoding")]
    Encoding,

    /// Body text is not parsable JSON.
    #[error("Invalid JSON data")]
    Json,

    /// Body parsed to a JSON value carrying no data.
    #[error("No JSON data received")]
    NoData,

    /// Outbound notification delivery failed.
    #[error("Failed to send Slack notification")]
    Dispatch,

    /// Anything else that went wrong while handling the request.
    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::Encoding | Self::Json | Self::NoData => StatusCode::BAD_REQUEST,
            Self::Dispatch | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
