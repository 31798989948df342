//! HTTP client for the NASA open APIs.
//!
//! Two upstream services are used:
//!
//! - `planetary/apod` -- today's Astronomy Picture of the Day
//! - `mars-photos/api/v1` -- rover mission manifests and photo listings
//!
//! Bodies are relayed as raw JSON; only the manifest is parsed, because the
//! photo query needs the rover's most recent sol.

use marsview_types::ManifestResponse;
use serde_json::Value;
use tracing::debug;

use crate::config::NasaConfig;
use crate::error::ProxyError;

/// Client for the NASA API, shared by all request handlers.
#[derive(Debug, Clone)]
pub struct NasaClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl NasaClient {
    /// Create a client for the configured API endpoint.
    pub fn new(config: &NasaConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Fetch today's picture of the day as raw JSON.
    pub async fn apod(&self) -> Result<Value, ProxyError> {
        self.get_json("planetary/apod", &[]).await
    }

    /// Fetch the mission manifest of `rover`.
    pub async fn manifest(&self, rover: &str) -> Result<ManifestResponse, ProxyError> {
        let body = self
            .get_json(&format!("mars-photos/api/v1/manifests/{rover}"), &[])
            .await?;
        serde_json::from_value(body).map_err(|e| {
            ProxyError::MalformedUpstream(format!("manifest for {rover} lacks photo_manifest: {e}"))
        })
    }

    /// Fetch every photo `rover` took on `sol`.
    pub async fn photos(&self, rover: &str, sol: u64) -> Result<Value, ProxyError> {
        let sol = sol.to_string();
        self.get_json(
            &format!("mars-photos/api/v1/rovers/{rover}/photos"),
            &[("sol", sol.as_str())],
        )
        .await
    }

    /// Fetch the photos of the rover's most recent sol.
    ///
    /// Looks up `max_sol` in the manifest first, then queries that sol.
    pub async fn latest_photos(&self, rover: &str) -> Result<Value, ProxyError> {
        let manifest = self.manifest(rover).await?;
        let max_sol = manifest.photo_manifest.max_sol;
        debug!(rover, max_sol, "resolved most recent sol");

        let body = self.photos(rover, max_sol).await?;
        // Reject bodies the client could not read rather than relaying them.
        if !body.get("photos").is_some_and(Value::is_array) {
            return Err(ProxyError::MalformedUpstream(format!(
                "photos for {rover} lack a photos array"
            )));
        }
        Ok(body)
    }

    /// GET `{api_url}/{path}` with the API key attached and decode JSON.
    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ProxyError> {
        let url = format!("{}/{path}", self.api_url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| ProxyError::Upstream(format!("GET {path} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(ProxyError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProxyError::Upstream(format!("GET {path} returned invalid JSON: {e}")))
    }
}
