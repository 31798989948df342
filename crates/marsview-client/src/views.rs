//! Views: pure functions from state and hash to markup.
//!
//! Rendering is split in two phases. A view never fetches anything; it
//! returns a [`View`] holding the markup *and* the list of data it found
//! missing ([`Requirement`]s). The caller decides what to fetch. Rendering
//! the same snapshot, hash and day twice yields byte-identical markup.
//!
//! Markup is produced by `minijinja` templates. The defaults are compiled
//! in; [`ViewEngine::from_dir`] loads replacements from disk so the page can
//! be restyled without recompiling.
//!
//! Template values are inserted verbatim (no HTML escaping): every value
//! comes from the NASA API through our own proxy.

use std::path::Path;

use chrono::NaiveDate;
use marsview_types::{ApodRecord, Photo, Rover, RoverMeta, RoverRecord};
use minijinja::{Environment, context};
use serde::Serialize;
use tracing::warn;

use crate::error::ClientError;
use crate::router::{Route, route_for};
use crate::store::Snapshot;

const HOME: &str = "home.j2";
const GALLERY: &str = "gallery.j2";
const LOADING: &str = "loading.j2";

/// Built-in templates, by name.
const TEMPLATES: [(&str, &str); 6] = [
    ("header.j2", include_str!("../templates/header.j2")),
    ("footer.j2", include_str!("../templates/footer.j2")),
    (LOADING, include_str!("../templates/loading.j2")),
    ("apod.j2", include_str!("../templates/apod.j2")),
    (HOME, include_str!("../templates/home.j2")),
    (GALLERY, include_str!("../templates/gallery.j2")),
];

/// Link to the home page, always first in the navigation.
const HOME_LINK: &str = "home";

/// Data a view found missing while rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Requirement {
    /// Today's picture of the day.
    Apod,
    /// The latest photos of one rover.
    RoverPhotos(Rover),
}

/// Result of one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Markup for the root container.
    pub markup: String,
    /// Data to fetch before the page can be complete.
    pub requirements: Vec<Requirement>,
}

/// Inputs besides the state that a render depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext<'a> {
    /// Current `location.hash`, including the leading `#` if any.
    pub hash: &'a str,
    /// The local calendar day, for picture-of-the-day freshness.
    pub today: NaiveDate,
}

/// What the picture-of-the-day section shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApodOutcome {
    /// Nothing loaded yet; the section stays empty.
    Pending,
    /// A video: link, title and explanation.
    Video(ApodRecord),
    /// An image and its explanation.
    Image(ApodRecord),
}

/// Decide what the picture-of-the-day section shows.
pub fn apod_outcome(snapshot: &Snapshot) -> ApodOutcome {
    match snapshot.apod() {
        None => ApodOutcome::Pending,
        Some(record) if record.is_video() => ApodOutcome::Video(record),
        Some(record) => ApodOutcome::Image(record),
    }
}

/// Whether the picture of the day is missing or from an earlier day.
pub fn apod_needs_refresh(snapshot: &Snapshot, today: NaiveDate) -> bool {
    snapshot.apod().is_none_or(|record| !record.is_from(today))
}

/// Whether a rover's photos have never been requested.
///
/// A record with an empty `photos` list is loading, not missing. So is a
/// record whose photos cannot be rendered.
pub fn rover_needs_fetch(snapshot: &Snapshot, rover: Rover) -> bool {
    !snapshot.rover_requested(rover)
}

/// Navigation links: `home`, then each rover name lower-cased.
pub fn nav_links(snapshot: &Snapshot) -> Vec<String> {
    std::iter::once(HOME_LINK.to_owned())
        .chain(snapshot.rover_names().iter().map(|name| name.to_lowercase()))
        .collect()
}

/// Template-facing projection of an [`ApodRecord`].
#[derive(Debug, Serialize)]
struct ApodView {
    is_video: bool,
    url: String,
    title: String,
    explanation: String,
}

impl ApodView {
    fn new(record: ApodRecord, is_video: bool) -> Self {
        Self {
            is_video,
            url: record.url.unwrap_or_default(),
            title: record.title.unwrap_or_default(),
            explanation: record.explanation.unwrap_or_default(),
        }
    }
}

/// Compiled view templates.
pub struct ViewEngine {
    env: Environment<'static>,
}

impl ViewEngine {
    /// Create an engine with the built-in templates.
    pub fn new() -> Result<Self, ClientError> {
        let mut env = base_environment();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// Create an engine loading templates from `dir`.
    ///
    /// The directory must contain every built-in template name
    /// (`home.j2`, `gallery.j2`, `apod.j2`, `header.j2`, `footer.j2`,
    /// `loading.j2`); all are loaded up front so a missing file fails here.
    pub fn from_dir(dir: &Path) -> Result<Self, ClientError> {
        let mut env = base_environment();
        env.set_loader(minijinja::path_loader(dir.to_path_buf()));
        for (name, _) in TEMPLATES {
            env.get_template(name).map_err(|e| {
                ClientError::Template(format!("failed to load {name} from {}: {e}", dir.display()))
            })?;
        }
        Ok(Self { env })
    }

    /// Render the page for the current state and hash.
    pub fn render(&self, snapshot: &Snapshot, ctx: &RenderContext<'_>) -> Result<View, ClientError> {
        match route_for(ctx.hash) {
            Route::Home => self.home(snapshot, ctx.today),
            Route::Gallery(rover) => self.gallery(snapshot, rover),
        }
    }

    /// Navigation, picture of the day, footer.
    fn home(&self, snapshot: &Snapshot, today: NaiveDate) -> Result<View, ClientError> {
        let requirements = if apod_needs_refresh(snapshot, today) {
            vec![Requirement::Apod]
        } else {
            Vec::new()
        };

        let apod = match apod_outcome(snapshot) {
            ApodOutcome::Pending => None,
            ApodOutcome::Video(record) => Some(ApodView::new(record, true)),
            ApodOutcome::Image(record) => Some(ApodView::new(record, false)),
        };

        let markup = self.render_template(
            HOME,
            context! {
                links => nav_links(snapshot),
                apod => apod,
            },
        )?;

        Ok(View {
            markup,
            requirements,
        })
    }

    /// Navigation, rover metadata, one tile per photo, footer.
    ///
    /// Until photos arrive the page is only the loading placeholder.
    fn gallery(&self, snapshot: &Snapshot, rover: Rover) -> Result<View, ClientError> {
        let record = snapshot.rover(rover);
        let requirements = if rover_needs_fetch(snapshot, rover) {
            vec![Requirement::RoverPhotos(rover)]
        } else {
            Vec::new()
        };
        if record.is_none() && requirements.is_empty() {
            warn!(rover = %rover, "stored photos cannot be rendered, showing placeholder");
        }

        let Some(photos) = record.as_ref().and_then(RoverRecord::loaded_photos) else {
            return Ok(View {
                markup: self.render_template(LOADING, context! {})?,
                requirements,
            });
        };
        let meta: RoverMeta = record
            .as_ref()
            .and_then(|record| record.rover_data.clone())
            .unwrap_or_default();
        let photos: &[Photo] = photos;

        let markup = self.render_template(
            GALLERY,
            context! {
                links => nav_links(snapshot),
                rover => meta,
                photos => photos,
            },
        )?;

        Ok(View {
            markup,
            requirements,
        })
    }

    fn render_template(&self, name: &str, ctx: minijinja::Value) -> Result<String, ClientError> {
        Ok(self.env.get_template(name)?.render(ctx)?)
    }
}

fn base_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env
}
