//! Shared type definitions for the Marsview viewer.
//!
//! Both the proxy and the client agree on these shapes. The client keeps
//! its state as raw JSON (so upstream fields it never renders survive a
//! merge) and projects typed records out of it with the structs here.
//!
//! # Modules
//!
//! - [`rover`] -- The fixed set of Mars rovers the viewer knows about
//! - [`records`] -- Typed projections of the client state (APOD, photos)
//! - [`wire`] -- Payloads exchanged with the proxy and the NASA API

pub mod records;
pub mod rover;
pub mod wire;

pub use records::{APOD_DATE_FORMAT, ApodRecord, Photo, RoverMeta, RoverRecord};
pub use rover::{ParseRoverError, Rover};
pub use wire::{ApodEnvelope, ManifestResponse, PhotoManifest, PhotosResponse};
