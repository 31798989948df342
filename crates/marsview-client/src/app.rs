//! The client event loop.
//!
//! One task owns the store, the current hash, the render timer and the
//! surface. Everything that changes them arrives as an event on a single
//! channel, so no state is shared and nothing is locked:
//!
//! ```text
//! host (load / hashchange) ──┐
//! render timer (due) ────────┼──> App::run ──> store merge ──> schedule render
//! fetch task (resolved) ─────┘                         render ──> surface
//!                                                             └──> fetch tasks
//! ```
//!
//! Every store update schedules a render instead of rendering directly; the
//! [`DeferredTask`] collapses bursts into one render with the latest state
//! and hash. A render reports the data it lacked, and the effect runner
//! spawns at most one fetch per requirement.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use marsview_types::Rover;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::error::ClientError;
use crate::fetchers::{apod_patch, rover_loaded_patch, rover_placeholder_patch};
use crate::scheduler::DeferredTask;
use crate::source::DataSource;
use crate::store::{Snapshot, Store};
use crate::surface::Surface;
use crate::views::{RenderContext, Requirement, ViewEngine};

/// Something the event loop reacts to.
#[derive(Debug)]
enum AppEvent {
    /// The page finished loading.
    Load,
    /// `location.hash` changed.
    HashChange(String),
    /// The render timer of the given generation fired.
    RenderDue(u64),
    /// A fetch finished; `patch` is `None` when it failed.
    Resolved {
        requirement: Requirement,
        patch: Option<Value>,
    },
    /// Stop once idle.
    Shutdown,
}

/// Sender side of the event loop, handed to the host.
#[derive(Debug, Clone)]
pub struct AppHandle {
    events: mpsc::UnboundedSender<AppEvent>,
}

impl AppHandle {
    /// Report that the page has loaded.
    pub fn load(&self) -> Result<(), ClientError> {
        self.send(AppEvent::Load)
    }

    /// Report a new `location.hash`.
    pub fn navigate(&self, hash: impl Into<String>) -> Result<(), ClientError> {
        self.send(AppEvent::HashChange(hash.into()))
    }

    /// Ask the loop to exit once no fetch is in flight and no render is
    /// pending.
    pub fn shutdown(&self) -> Result<(), ClientError> {
        self.send(AppEvent::Shutdown)
    }

    fn send(&self, event: AppEvent) -> Result<(), ClientError> {
        if self.events.send(event).is_err() {
            return Err(ClientError::Stopped);
        }
        Ok(())
    }
}

/// Today's date in the local time zone.
fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// The client: store, router, views and fetchers wired to one event loop.
pub struct App {
    store: Store,
    hash: String,
    views: ViewEngine,
    source: Arc<DataSource>,
    surface: Box<dyn Surface>,
    render_timer: DeferredTask,
    in_flight: BTreeSet<Requirement>,
    apod_requested_on: Option<NaiveDate>,
    today: fn() -> NaiveDate,
    draining: bool,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    /// Create a client starting from the initial state and an empty hash.
    ///
    /// Renders are debounced by `render_debounce`.
    pub fn new(
        views: ViewEngine,
        source: DataSource,
        surface: Box<dyn Surface>,
        render_debounce: Duration,
    ) -> Self {
        let (events_tx, events) = mpsc::unbounded_channel();
        Self {
            store: Store::default(),
            hash: String::new(),
            views,
            source: Arc::new(source),
            surface,
            render_timer: DeferredTask::new(render_debounce),
            in_flight: BTreeSet::new(),
            apod_requested_on: None,
            today: local_today,
            draining: false,
            events_tx,
            events,
        }
    }

    /// Start from `snapshot` instead of the initial state.
    #[must_use]
    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.store = Store::with_snapshot(snapshot);
        self
    }

    /// Start with `hash` as the current location hash.
    #[must_use]
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = hash.into();
        self
    }

    /// Use `today` instead of the local clock for picture-of-the-day
    /// freshness.
    #[must_use]
    pub const fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// A handle for delivering host events.
    pub fn handle(&self) -> AppHandle {
        AppHandle {
            events: self.events_tx.clone(),
        }
    }

    /// The current state.
    pub const fn snapshot(&self) -> &Snapshot {
        self.store.snapshot()
    }

    /// Run the event loop until shut down and idle. Returns the final state.
    pub async fn run(mut self) -> Snapshot {
        info!(source = self.source.name(), "client event loop started");

        while let Some(event) = self.events.recv().await {
            match event {
                AppEvent::Load => {
                    debug!("page loaded");
                    self.schedule_render();
                }
                AppEvent::HashChange(hash) => {
                    debug!(hash = hash, "hash changed");
                    self.hash = hash;
                    self.schedule_render();
                }
                AppEvent::RenderDue(generation) => {
                    if self.render_timer.complete(generation) {
                        self.render_now();
                    }
                }
                AppEvent::Resolved { requirement, patch } => {
                    self.in_flight.remove(&requirement);
                    if let Some(patch) = patch {
                        self.update_store(&patch);
                    }
                }
                AppEvent::Shutdown => {
                    info!(
                        in_flight = self.in_flight.len(),
                        render_pending = self.render_timer.is_pending(),
                        "shutdown requested, draining"
                    );
                    self.draining = true;
                }
            }

            if self.draining && self.is_idle() {
                break;
            }
        }

        info!("client event loop stopped");
        self.store.snapshot().clone()
    }

    /// Whether nothing is left that could change the page.
    fn is_idle(&self) -> bool {
        self.in_flight.is_empty() && !self.render_timer.is_pending()
    }

    /// Merge `patch` into the state and schedule a render.
    fn update_store(&mut self, patch: &Value) {
        self.store.merge(patch);
        self.schedule_render();
    }

    /// (Re)start the render timer.
    fn schedule_render(&mut self) {
        let events = self.events_tx.clone();
        self.render_timer.schedule(move |generation| {
            // The loop holds a sender itself, so this only fails after it exits.
            let _ = events.send(AppEvent::RenderDue(generation));
        });
    }

    /// Render the current state and hash, then act on what the view lacked.
    fn render_now(&mut self) {
        let snapshot = self.store.snapshot().clone();
        let ctx = RenderContext {
            hash: &self.hash,
            today: (self.today)(),
        };

        let view = match self.views.render(&snapshot, &ctx) {
            Ok(view) => view,
            Err(e) => {
                error!(hash = self.hash, error = %e, "render failed");
                return;
            }
        };
        debug!(
            hash = self.hash,
            bytes = view.markup.len(),
            requirements = ?view.requirements,
            "rendered"
        );

        if let Err(e) = self.surface.replace_contents(&view.markup) {
            error!(error = %e, "failed to write rendered page");
        }
        self.run_effects(&view.requirements);
    }

    /// Start a fetch for every requirement not already being fetched.
    fn run_effects(&mut self, requirements: &[Requirement]) {
        for requirement in requirements {
            match *requirement {
                Requirement::Apod => self.fetch_apod(),
                Requirement::RoverPhotos(rover) => self.fetch_rover_data(rover),
            }
        }
    }

    /// Fetch the picture of the day, at most once per local day.
    fn fetch_apod(&mut self) {
        let today = (self.today)();
        if self.apod_requested_on == Some(today) || !self.in_flight.insert(Requirement::Apod) {
            return;
        }
        self.apod_requested_on = Some(today);

        let source = Arc::clone(&self.source);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let patch = match source.apod().await {
                Ok(record) => Some(apod_patch(record)),
                Err(e) => {
                    warn!(error = %e, "picture of the day fetch failed");
                    None
                }
            };
            let _ = events.send(AppEvent::Resolved {
                requirement: Requirement::Apod,
                patch,
            });
        });
    }

    /// Mark `rover` as loading, then fetch its photos.
    fn fetch_rover_data(&mut self, rover: Rover) {
        let requirement = Requirement::RoverPhotos(rover);
        if !self.in_flight.insert(requirement) {
            return;
        }
        self.update_store(&rover_placeholder_patch(rover));

        let source = Arc::clone(&self.source);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let patch = match source
                .rover_photos(rover)
                .await
                .and_then(|body| rover_loaded_patch(rover, body))
            {
                Ok(patch) => Some(patch),
                Err(e) => {
                    warn!(rover = %rover, error = %e, "rover photos fetch failed");
                    None
                }
            };
            let _ = events.send(AppEvent::Resolved { requirement, patch });
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::source::FixtureSource;
    use crate::surface::MemorySurface;

    const DEBOUNCE: Duration = Duration::from_millis(20);

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap_or_default()
    }

    fn app(source: FixtureSource) -> App {
        App::new(
            ViewEngine::new().unwrap(),
            DataSource::Fixture(source),
            Box::new(MemorySurface::new()),
            DEBOUNCE,
        )
        .with_clock(today)
    }

    fn todays_apod() -> Value {
        json!({
            "date": "2024-03-09",
            "media_type": "image",
            "url": "https://apod.nasa.gov/apod/image/m31.jpg",
            "explanation": "The Andromeda Galaxy."
        })
    }

    #[test]
    fn pre_seeded_snapshot_is_kept() {
        let seeded = Snapshot::new(json!({"rovers": ["Spirit"]}));
        let app = app(FixtureSource::new()).with_snapshot(seeded.clone());
        assert!(app.snapshot().same_version(&seeded));
    }

    #[tokio::test(start_paused = true)]
    async fn handle_fails_after_loop_exits() {
        let app = app(FixtureSource::new());
        let handle = app.handle();

        handle.shutdown().unwrap();
        app.run().await;

        assert!(matches!(handle.load(), Err(ClientError::Stopped)));
    }

    #[tokio::test(start_paused = true)]
    async fn load_fetches_apod_and_merges_it() {
        let fixture = FixtureSource::new().with_apod(todays_apod());
        let app = app(fixture.clone());
        let handle = app.handle();

        handle.load().unwrap();
        handle.shutdown().unwrap();
        let state = app.run().await;

        assert_eq!(state.apod().unwrap().date.as_deref(), Some("2024-03-09"));
        assert_eq!(fixture.requests(), vec!["/apod"]);
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_apod_is_not_refetched() {
        let fixture = FixtureSource::new();
        let seeded = Store::default().merge(&json!({"apod": todays_apod()}));
        let app = app(fixture.clone()).with_snapshot(seeded);
        let handle = app.handle();

        handle.load().unwrap();
        handle.shutdown().unwrap();
        app.run().await;

        assert!(fixture.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_apod_fetch_is_not_retried_the_same_day() {
        let fixture = FixtureSource::new();
        let app = app(fixture.clone());
        let handle = app.handle();
        let running = tokio::spawn(app.run());

        handle.load().unwrap();
        for hash in ["#home", "", "#home"] {
            tokio::time::sleep(Duration::from_millis(50)).await;
            handle.navigate(hash).unwrap();
        }
        handle.shutdown().unwrap();
        let state = running.await.unwrap();

        assert!(state.apod().is_none());
        assert_eq!(fixture.requests(), vec!["/apod"]);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_rover_fetch_keeps_placeholder() {
        let fixture = FixtureSource::new();
        let app = app(fixture.clone()).with_hash("#spirit");
        let handle = app.handle();

        handle.load().unwrap();
        handle.shutdown().unwrap();
        let state = app.run().await;

        assert_eq!(
            state.as_value()["roversData"]["spirit"],
            json!({"photos": []})
        );
        assert_eq!(fixture.requests(), vec!["/rovers/spirit"]);
    }

    #[tokio::test(start_paused = true)]
    async fn each_rover_is_fetched_once() {
        let body = json!({"photos": [{
            "img_src": "a.jpg",
            "earth_date": "2012-08-06",
            "rover": {"name": "Curiosity"}
        }]});
        let fixture = FixtureSource::new()
            .with_rover(Rover::Curiosity, body)
            .with_latency(Duration::from_millis(500));
        let seeded = Store::default().merge(&json!({"apod": todays_apod()}));
        let app = app(fixture.clone())
            .with_snapshot(seeded)
            .with_hash("#curiosity");
        let handle = app.handle();
        let running = tokio::spawn(app.run());

        handle.load().unwrap();
        for hash in ["#curiosity", "#home", "#curiosity", "#x/curiosity"] {
            tokio::time::sleep(Duration::from_millis(50)).await;
            handle.navigate(hash).unwrap();
        }
        handle.shutdown().unwrap();
        let state = running.await.unwrap();

        assert_eq!(fixture.requests(), vec!["/rovers/curiosity"]);
        let record = state.rover(Rover::Curiosity).unwrap();
        assert_eq!(record.loaded_photos().map(<[_]>::len), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_photos_are_fetched_once() {
        let body = json!({"photos": [{
            "img_src": "a.jpg",
            "earth_date": null,
            "rover": {"name": "Spirit"}
        }]});
        let fixture = FixtureSource::new()
            .with_rover(Rover::Spirit, body)
            .with_latency(Duration::from_millis(100));
        let app = app(fixture.clone()).with_hash("#spirit");
        let handle = app.handle();
        let running = tokio::spawn(app.run());

        handle.load().unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        handle.shutdown().unwrap();
        let state = running.await.unwrap();

        assert_eq!(fixture.requests(), vec!["/rovers/spirit"]);
        assert_eq!(
            state.as_value()["roversData"]["spirit"],
            json!({"photos": []})
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unreadable_stored_photos_are_not_refetched() {
        let fixture = FixtureSource::new();
        let seeded = Store::default().merge(&json!({"roversData": {"spirit": {
            "photos": [{"img_src": 7, "earth_date": "2010-03-21"}]
        }}}));
        let app = app(fixture.clone())
            .with_snapshot(seeded)
            .with_hash("#spirit");
        let handle = app.handle();
        let running = tokio::spawn(app.run());

        handle.load().unwrap();
        for hash in ["#home", "#spirit"] {
            tokio::time::sleep(Duration::from_millis(50)).await;
            handle.navigate(hash).unwrap();
        }
        handle.shutdown().unwrap();
        let state = running.await.unwrap();

        assert!(
            !fixture
                .requests()
                .iter()
                .any(|path| path == "/rovers/spirit")
        );
        assert_eq!(state.as_value()["roversData"]["spirit"]["photos"][0]["img_src"], 7);
    }
}
