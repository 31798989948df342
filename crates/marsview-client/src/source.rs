//! Where the client's data comes from.
//!
//! Uses an enum rather than a trait object for the same reason as the rest
//! of the workspace: async methods are not dyn-compatible. Two sources
//! exist:
//!
//! - [`ProxyClient`] -- HTTP calls to the Marsview proxy
//! - [`FixtureSource`] -- canned JSON, for offline runs and tests
//!
//! Both return the picture of the day already unwrapped from the proxy's
//! `{image}` envelope, and rover photos as the raw `{photos: [...]}` body.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use marsview_types::{ApodEnvelope, Rover};
use serde_json::Value;
use tracing::debug;

use crate::error::ClientError;

/// A source of picture-of-the-day and rover-photo data.
pub enum DataSource {
    /// The Marsview proxy over HTTP.
    Proxy(ProxyClient),
    /// Canned responses.
    Fixture(FixtureSource),
}

impl DataSource {
    /// Fetch today's picture-of-the-day record.
    pub async fn apod(&self) -> Result<Value, ClientError> {
        match self {
            Self::Proxy(source) => source.fetch_apod().await,
            Self::Fixture(source) => source.fetch_apod().await,
        }
    }

    /// Fetch the latest photos of `rover`.
    pub async fn rover_photos(&self, rover: Rover) -> Result<Value, ClientError> {
        match self {
            Self::Proxy(source) => source.fetch_rover_photos(rover).await,
            Self::Fixture(source) => source.fetch_rover_photos(rover).await,
        }
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &str {
        match self {
            Self::Proxy(_) => "proxy",
            Self::Fixture(_) => "fixture",
        }
    }
}

// ---------------------------------------------------------------------------
// Proxy
// ---------------------------------------------------------------------------

/// HTTP client for the Marsview proxy.
pub struct ProxyClient {
    client: reqwest::Client,
    base_url: String,
}

impl ProxyClient {
    /// Create a client for the proxy at `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// GET `/apod` and unwrap the `image` field.
    pub async fn fetch_apod(&self) -> Result<Value, ClientError> {
        let envelope: ApodEnvelope = serde_json::from_value(self.get_json("apod").await?)
            .map_err(|e| ClientError::UnexpectedResponse(format!("apod lacks image: {e}")))?;
        Ok(envelope.image)
    }

    /// GET `/rovers/{rover}`.
    pub async fn fetch_rover_photos(&self, rover: Rover) -> Result<Value, ClientError> {
        self.get_json(&format!("rovers/{}", rover.key())).await
    }

    async fn get_json(&self, path: &str) -> Result<Value, ClientError> {
        let url = format!("{}/{path}", self.base_url);
        debug!(%url, "fetching from proxy");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Fetch(format!("GET /{path} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(ClientError::Fetch(format!(
                "GET /{path} returned {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::UnexpectedResponse(format!("GET /{path} body: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Canned responses, optionally delayed to mimic network latency.
///
/// Every request is recorded so callers can check what was asked for.
/// Clones share the same request log.
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    apod: Option<Value>,
    rovers: BTreeMap<Rover, Value>,
    latency: Duration,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FixtureSource {
    /// A source with no data; every request fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer picture-of-the-day requests with `record`.
    #[must_use]
    pub fn with_apod(mut self, record: Value) -> Self {
        self.apod = Some(record);
        self
    }

    /// Answer requests for `rover` with `body` (`{photos: [...]}`).
    #[must_use]
    pub fn with_rover(mut self, rover: Rover, body: Value) -> Self {
        self.rovers.insert(rover, body);
        self
    }

    /// Wait `latency` before answering each request.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Load fixtures from `dir`: `apod.json` and `<rover>.json`.
    ///
    /// Missing files are skipped; unreadable or invalid ones are errors.
    pub fn from_dir(dir: &Path) -> Result<Self, ClientError> {
        let mut source = Self::new();
        if let Some(record) = read_fixture(&dir.join("apod.json"))? {
            source = source.with_apod(record);
        }
        for rover in Rover::ALL {
            if let Some(body) = read_fixture(&dir.join(format!("{}.json", rover.key())))? {
                source = source.with_rover(rover, body);
            }
        }
        Ok(source)
    }

    /// Paths requested so far, e.g. `/apod`, `/rovers/spirit`.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Return the canned picture of the day.
    pub async fn fetch_apod(&self) -> Result<Value, ClientError> {
        self.answer("/apod".to_owned()).await;
        self.apod
            .clone()
            .ok_or_else(|| ClientError::Fetch("no apod fixture".to_owned()))
    }

    /// Return the canned photos of `rover`.
    pub async fn fetch_rover_photos(&self, rover: Rover) -> Result<Value, ClientError> {
        self.answer(format!("/rovers/{}", rover.key())).await;
        self.rovers
            .get(&rover)
            .cloned()
            .ok_or_else(|| ClientError::Fetch(format!("no fixture for {rover}")))
    }

    async fn answer(&self, path: String) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

fn read_fixture(path: &Path) -> Result<Option<Value>, ClientError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&raw)?))
}
