//! Error types for the client.
//!
//! Uses `thiserror` for typed errors that surface through the client:
//! configuration, proxy fetches, template rendering and surface writes.
//! None of them stop the render loop; the loop logs and carries on.

/// Errors that can occur in the client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Configuration is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// A request to the proxy failed or returned a non-success status.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// The proxy answered with a body lacking a field the client needs.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// A view template failed to load or render.
    #[error("template error: {0}")]
    Template(String),

    /// Writing rendered markup to the surface failed.
    #[error("surface error: {0}")]
    Surface(#[from] std::io::Error),

    /// Serialization or deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// The event loop has exited and no longer accepts events.
    #[error("client event loop has stopped")]
    Stopped,
}

impl From<minijinja::Error> for ClientError {
    fn from(source: minijinja::Error) -> Self {
        Self::Template(source.to_string())
    }
}
