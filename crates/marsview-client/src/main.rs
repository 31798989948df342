//! Headless host for the Marsview client.
//!
//! Plays the part of the browser: fires the load event, turns every line
//! read from stdin into a hash change, and writes each rendered page to
//! `RENDER_OUTPUT` (by default the proxy's `public/index.html`).
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from environment variables
//! 3. Load view templates and pick the data source
//! 4. Run the event loop until stdin closes (drain) or `Ctrl-C` (stop now)

use std::io::BufRead;

use marsview_client::{
    App, AppHandle, ClientConfig, DataSource, FileSurface, FixtureSource, ProxyClient, ViewEngine,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, templates or fixtures are invalid.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("marsview client starting");

    let config = ClientConfig::from_env()?;
    info!(
        proxy_url = config.proxy_url,
        render_debounce_ms = config.render_debounce.as_millis(),
        render_output = %config.render_output.display(),
        "configuration loaded"
    );

    let views = match &config.templates_dir {
        Some(dir) => {
            info!(templates_dir = %dir.display(), "loading view templates");
            ViewEngine::from_dir(dir)?
        }
        None => ViewEngine::new()?,
    };

    let source = match &config.fixture_dir {
        Some(dir) => {
            info!(fixture_dir = %dir.display(), "serving canned responses");
            DataSource::Fixture(FixtureSource::from_dir(dir)?)
        }
        None => DataSource::Proxy(ProxyClient::new(&config.proxy_url)),
    };

    let surface = FileSurface::new(config.render_output.clone());
    let app = App::new(views, source, Box::new(surface), config.render_debounce);
    let handle = app.handle();
    let mut running = tokio::spawn(app.run());

    handle.load()?;
    forward_stdin(handle);

    tokio::select! {
        finished = &mut running => {
            finished?;
            info!("all fetches settled, exiting");
        }
        interrupted = tokio::signal::ctrl_c() => {
            if let Err(e) = interrupted {
                warn!(error = %e, "failed to listen for Ctrl-C");
            }
            info!("interrupted, stopping");
            running.abort();
        }
    }

    Ok(())
}

/// Forward stdin lines as hash changes, then ask the loop to drain.
///
/// Reads on a plain thread: a blocked stdin read must not keep the
/// runtime from shutting down on `Ctrl-C`.
fn forward_stdin(handle: AppHandle) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if handle.navigate(line.trim()).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to read stdin");
                    break;
                }
            }
        }
        debug!("stdin closed, draining");
        let _ = handle.shutdown();
    });
}
