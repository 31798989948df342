//! State patches produced by data fetches.
//!
//! Fetching itself happens in [`crate::app`]; this module only shapes what a
//! fetch merges into the store, so the shapes can be checked without a
//! network.

use marsview_types::{Photo, Rover};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ClientError;

/// Patch storing a freshly fetched picture-of-the-day record.
pub fn apod_patch(record: Value) -> Value {
    json!({ "apod": record })
}

/// Patch marking a rover as requested: `{roversData: {<rover>: {photos: []}}}`.
///
/// Merged before the request goes out so the gallery shows the loading
/// placeholder and does not ask again.
pub fn rover_placeholder_patch(rover: Rover) -> Value {
    let key = rover.key();
    json!({ "roversData": { key: { "photos": [] } } })
}

/// Patch storing a rover's photos and the mission metadata of the first one.
///
/// `body` is the proxy answer, `{photos: [...]}`. An empty list, a photo
/// that cannot be rendered, or a first photo without `rover` metadata is an
/// error; the caller leaves the placeholder in place.
pub fn rover_loaded_patch(rover: Rover, body: Value) -> Result<Value, ClientError> {
    let Value::Object(mut body) = body else {
        return Err(ClientError::UnexpectedResponse(format!(
            "photos of {rover} are not a JSON object"
        )));
    };
    let photos = body.remove("photos").unwrap_or(Value::Null);

    let meta = photos
        .as_array()
        .ok_or_else(|| {
            ClientError::UnexpectedResponse(format!("photos of {rover} lack a photos array"))
        })?
        .first()
        .ok_or_else(|| ClientError::UnexpectedResponse(format!("no photos for {rover}")))?
        .get("rover")
        .cloned()
        .ok_or_else(|| {
            ClientError::UnexpectedResponse(format!("first photo of {rover} lacks rover data"))
        })?;

    Vec::<Photo>::deserialize(&photos).map_err(|e| {
        ClientError::UnexpectedResponse(format!("photos of {rover} are malformed: {e}"))
    })?;

    let key = rover.key();
    Ok(json!({ "roversData": { key: { "photos": photos, "roverData": meta } } }))
}
