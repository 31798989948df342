//! Proxy server for the Marsview viewer.
//!
//! This crate provides an Axum HTTP server that forwards two kinds of
//! request to the NASA open APIs and relays the JSON back:
//!
//! - **`GET /apod`** -- today's Astronomy Picture of the Day, wrapped as
//!   `{ "image": <APOD JSON> }`
//! - **`GET /rovers/{name}`** -- the photos a Mars rover took on its most
//!   recent sol, as NASA returns them (`{ "photos": [...] }`)
//!
//! Everything else is served from the static `public/` directory, which is
//! where the client writes its rendered page.
//!
//! The proxy is stateless: no caching, no retries. Upstream failures become
//! a JSON error body with status `502` (see [`ProxyError`]).

pub mod config;
pub mod error;
pub mod handlers;
pub mod nasa;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use config::{ConfigError, NasaConfig, ProxyConfig};
pub use error::ProxyError;
pub use router::build_router;
pub use server::{ServerError, serve, start_server};
pub use state::AppState;
