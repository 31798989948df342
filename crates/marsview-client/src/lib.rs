//! Client for the Marsview viewer.
//!
//! Renders the NASA picture of the day and Mars-rover photo galleries from
//! a single JSON state, routed by the URL hash:
//!
//! - `#curiosity`, `#opportunity`, `#spirit` (or any hash ending in one of
//!   them) -- the rover's gallery
//! - anything else -- home, with the picture of the day
//!
//! # Modules
//!
//! - [`store`] -- Immutable snapshots and deep-merge updates
//! - [`scheduler`] -- Cancellable one-shot timer for debounced renders
//! - [`router`] -- Hash to page
//! - [`views`] -- Templates, and what each page still needs fetched
//! - [`fetchers`] -- State patches produced by fetches
//! - [`source`] -- Proxy and fixture data sources
//! - [`surface`] -- Where rendered markup goes
//! - [`app`] -- The event loop tying it all together

pub mod app;
pub mod config;
pub mod error;
pub mod fetchers;
pub mod router;
pub mod scheduler;
pub mod source;
pub mod store;
pub mod surface;
pub mod views;

// Re-export primary types for convenience.
pub use app::{App, AppHandle};
pub use config::ClientConfig;
pub use error::ClientError;
pub use router::{Route, route_for};
pub use source::{DataSource, FixtureSource, ProxyClient};
pub use store::{Snapshot, Store};
pub use surface::{FileSurface, Frame, MemorySurface, Surface};
pub use views::{RenderContext, Requirement, View, ViewEngine};
