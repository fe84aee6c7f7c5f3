use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure taxonomy for one relay invocation. Every variant is caught at the
/// handler boundary and rendered as a `{ "success": false, "error": … }`
/// body; nothing is retried.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Upstream unreachable: connect failure, timeout, DNS.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Upstream answered with a non-success HTTP status.
    #[error("Upstream returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// Upstream answered 2xx but the payload is unusable.
    #[error("Application error: {0}")]
    Application(String),

    /// Inbound body missing `message` or not parseable as JSON.
    #[error("Invalid request: {0}")]
    Input(String),
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RelayError::Transport(format!("request timed out: {}", err))
        } else if err.is_connect() {
            RelayError::Transport(format!("connection failed: {}", err))
        } else {
            RelayError::Transport(err.to_string())
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = match self {
            RelayError::Input(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(json!({
                "success": false,
                "error": self.to_string(),
            })),
        )
            .into_response()
    }
}
