//! Shared application state for the proxy.
//!
//! The proxy holds no data of its own; the state is just the upstream
//! client, injected into handlers through Axum's `State` extractor.

use crate::config::NasaConfig;
use crate::nasa::NasaClient;

/// Shared state for the Axum application.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Client for the NASA API.
    pub nasa: NasaClient,
}

impl AppState {
    /// Create the state for the given upstream.
    pub fn new(config: &NasaConfig) -> Self {
        Self {
            nasa: NasaClient::new(config),
        }
    }
}
