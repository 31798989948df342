//! Payloads exchanged with the proxy and the NASA API.
//!
//! Photo lists stay as raw [`serde_json::Value`]s: the proxy relays them
//! verbatim and the client stores them verbatim.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of the proxy's `GET /apod`: the upstream APOD JSON under `image`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApodEnvelope {
    /// Raw APOD record.
    pub image: Value,
}

/// Body of `GET /rovers/{name}` (and of NASA's photos endpoint).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotosResponse {
    /// Raw photo objects, in upstream order.
    #[serde(default)]
    pub photos: Vec<Value>,
}

/// The part of NASA's mission manifest the proxy needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PhotoManifest {
    /// Most recent Martian sol with photos.
    pub max_sol: u64,
}

/// Top-level wrapper of NASA's manifest response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ManifestResponse {
    /// The manifest itself.
    pub photo_manifest: PhotoManifest,
}
