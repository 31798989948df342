//! Typed projections of the client state.
//!
//! The state itself is untyped JSON; these structs are read out of it for a
//! single render pass. Every field defaults so a partially loaded record
//! (for example the `{photos: []}` placeholder) still deserializes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Media type NASA uses for video pictures of the day.
const VIDEO_MEDIA_TYPE: &str = "video";

/// Date format of the APOD `date` field.
pub const APOD_DATE_FORMAT: &str = "%Y-%m-%d";

/// One Astronomy Picture of the Day, as returned by the APOD API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApodRecord {
    /// Publication date, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// `image` or `video`.
    pub media_type: Option<String>,
    /// Image source or video page.
    pub url: Option<String>,
    /// High resolution image, absent for videos.
    pub hdurl: Option<String>,
    /// Picture title.
    pub title: Option<String>,
    /// Long-form description written by an astronomer.
    pub explanation: Option<String>,
    /// Credit line, when the picture is not public domain.
    pub copyright: Option<String>,
}

impl ApodRecord {
    /// Whether the picture of the day is a video rather than an image.
    pub fn is_video(&self) -> bool {
        self.media_type.as_deref() == Some(VIDEO_MEDIA_TYPE)
    }

    /// Whether this record was published on `today`.
    ///
    /// A missing or unparseable date is never current.
    pub fn is_from(&self, today: NaiveDate) -> bool {
        self.date
            .as_deref()
            .and_then(|date| NaiveDate::parse_from_str(date, APOD_DATE_FORMAT).ok())
            .is_some_and(|date| date == today)
    }
}

/// Mission metadata attached to every rover photo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoverMeta {
    /// Rover name, e.g. `Curiosity`.
    pub name: String,
    /// Launch date from Earth.
    pub launch_date: String,
    /// Landing date on Mars.
    pub landing_date: String,
    /// `active` or `complete`.
    pub status: String,
}

/// A single rover photo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Photo {
    /// Full-size image URL.
    pub img_src: String,
    /// Earth date the photo was taken.
    pub earth_date: String,
    /// The rover that took it.
    pub rover: RoverMeta,
}

/// Per-rover entry of `roversData`.
///
/// `photos` is `None` until a fetch has started, then `Some(vec![])` while
/// loading, then the photo list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoverRecord {
    /// Photos from the rover's most recent sol.
    pub photos: Option<Vec<Photo>>,
    /// Metadata copied from the first photo.
    #[serde(rename = "roverData")]
    pub rover_data: Option<RoverMeta>,
}

impl RoverRecord {
    /// The loaded photos, or `None` while loading or before the first fetch.
    pub fn loaded_photos(&self) -> Option<&[Photo]> {
        self.photos.as_deref().filter(|photos| !photos.is_empty())
    }
}
