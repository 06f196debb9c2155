//! Playback controller: the single owner of the media resource and of the
//! `PlayerState` the UI renders.
//!
//! State changes only in reaction to an intent call on [`PlaybackController`]
//! or a notice drained from the resource by [`PlaybackController::pump`].
//! Resource events go through the pure [`reduce`] function.

mod controller;
mod events;
mod reducer;
mod resource;
mod state;

pub use controller::PlaybackController;
pub use events::{MediaError, MediaEvent, PlayFailure};
pub use reducer::reduce;
pub use resource::{LoadGeneration, MediaResource, PlayTicket, ResourceNotice};
pub use state::PlayerState;

#[cfg(test)]
mod tests;
