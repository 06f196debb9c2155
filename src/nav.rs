//! Navigation: turn the location fragment into "which track, which mode",
//! and turn a track selection back into a fragment.
//!
//! Everything here works on plain strings and slices so it can be tested
//! without a terminal or an audio device.

mod fragment;
mod link;
mod reach;
mod resolve;

pub use fragment::{Directive, NavigationTarget};
pub use link::{Location, fragment_for_selection, link_id};
pub use reach::{Reach, reach};
pub use resolve::{NavigationError, NavigationOutcome, NavigationResolver, resolve_track};
