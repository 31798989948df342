//! Proxy entry point for the Marsview viewer.
//!
//! Forwards `/apod` and `/rovers/{name}` to the NASA API and serves the
//! static `public/` directory.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from environment variables
//! 3. Bind and serve until `Ctrl-C`

use marsview_proxy::{ProxyConfig, start_server};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the server cannot bind.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("marsview-proxy starting");

    let config = ProxyConfig::from_env()?;
    info!(
        host = config.host,
        port = config.port,
        nasa_api_url = config.nasa.api_url,
        public_dir = %config.public_dir.display(),
        "configuration loaded"
    );
    if config.uses_demo_key() {
        warn!("NASA_API_KEY not set, using the rate-limited DEMO_KEY");
    }

    start_server(&config, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
        }
        info!("shutdown requested");
    })
    .await?;

    Ok(())
}
