//! Axum router construction for the proxy.
//!
//! Assembles the two API routes plus the static asset fallback into a
//! single [`Router`] with CORS and request tracing enabled.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the proxy.
///
/// The router includes:
/// - `GET /apod` -- today's picture of the day
/// - `GET /rovers/{rover_name}` -- latest photos of one rover
/// - everything else -- files under `public_dir` (`index.html` for `/`)
///
/// CORS allows any origin so the client may be served from elsewhere.
pub fn build_router(state: Arc<AppState>, public_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/apod", get(handlers::get_apod))
        .route("/rovers/{rover_name}", get(handlers::get_rover_photos))
        .fallback_service(ServeDir::new(public_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
