//! Error types for the proxy API.
//!
//! [`ProxyError`] unifies every way a relayed request can fail and converts
//! into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation, so a
//! client always receives a JSON body even when NASA misbehaves.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur while relaying a request to NASA.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// The rover name in the path contains characters NASA never uses.
    #[error("invalid rover name: {0}")]
    InvalidRover(String),

    /// The upstream request could not be sent or its body not read.
    #[error("upstream request failed: {0}")]
    Upstream(String),

    /// NASA answered with a non-success status.
    #[error("upstream returned {status}: {body}")]
    UpstreamStatus {
        /// Status code returned by NASA.
        status: u16,
        /// Response body, for the log.
        body: String,
    },

    /// NASA answered 200 but the body lacks a field the proxy needs.
    #[error("malformed upstream body: {0}")]
    MalformedUpstream(String),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidRover(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) | Self::UpstreamStatus { .. } | Self::MalformedUpstream(_) => {
                StatusCode::BAD_GATEWAY
            }
        };

        tracing::error!(error = %self, status = status.as_u16(), "proxy request failed");

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
