//! Endpoint handlers for the proxy.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/apod` | Today's APOD, wrapped as `{ "image": ... }` |
//! | `GET` | `/rovers/:name` | Photos from the rover's most recent sol |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use marsview_types::ApodEnvelope;
use serde_json::Value;
use tracing::info;

use crate::error::ProxyError;
use crate::state::AppState;

/// Relay today's picture of the day.
pub async fn get_apod(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApodEnvelope>, ProxyError> {
    let image = state.nasa.apod().await?;
    info!("relayed picture of the day");
    Ok(Json(ApodEnvelope { image }))
}

/// Relay the latest photos of one rover.
///
/// Any rover NASA knows works, not only the three the client routes to.
pub async fn get_rover_photos(
    State(state): State<Arc<AppState>>,
    Path(rover_name): Path<String>,
) -> Result<Json<Value>, ProxyError> {
    let rover = validate_rover_name(&rover_name)?;
    let photos = state.nasa.latest_photos(&rover).await?;
    info!(rover, "relayed rover photos");
    Ok(Json(photos))
}

/// Accept ASCII-letter names only, normalized to lower case.
fn validate_rover_name(name: &str) -> Result<String, ProxyError> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ProxyError::InvalidRover(name.to_owned()));
    }
    Ok(name.to_ascii_lowercase())
}
