//! Track list types and the manifest loader.
//!
//! The track list is fetched once per session from a JSON manifest and is
//! only ever replaced wholesale, never edited in place.

mod display;
mod manifest;
mod model;

pub use display::display_from_fields;
pub use manifest::{ManifestError, ManifestSource, fetch_manifest, parse_manifest};
pub use model::*;
