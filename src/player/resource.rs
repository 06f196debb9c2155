use std::time::Duration;

use super::events::{MediaEvent, PlayFailure};

/// Monotonic counter distinguishing successive track loads.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadGeneration(pub u64);

impl LoadGeneration {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Identifies one `play()` request.
///
/// `intent` is the controller's intent sequence number at the time of the
/// request; a settlement is only applied while it is still the latest intent.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PlayTicket {
    pub generation: LoadGeneration,
    pub intent: u64,
}

/// Something the resource reports back to its controller.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceNotice {
    /// A lifecycle event for the source loaded under `generation`.
    Event {
        generation: LoadGeneration,
        event: MediaEvent,
    },
    /// The outcome of a `play()` request.
    PlaySettled {
        ticket: PlayTicket,
        result: Result<(), PlayFailure>,
    },
}

/// A single streaming media element.
///
/// Commands are fire-and-forget; everything the resource learns afterwards is
/// reported as a [`ResourceNotice`] through [`MediaResource::poll_notice`].
pub trait MediaResource {
    /// Replace the source and start fetching it. Events for this source must
    /// carry `generation`.
    fn load(&mut self, src: &str, generation: LoadGeneration, duration_hint: Option<f64>);

    /// Request playback. Must eventually answer with exactly one
    /// `PlaySettled` for `ticket`.
    fn play(&mut self, ticket: PlayTicket);

    fn pause(&mut self);

    /// Move the playback position; out-of-range values are clamped here.
    fn set_current_time(&mut self, seconds: f64);

    fn set_volume(&mut self, volume: f64);

    /// Next pending notice, if any. Never blocks.
    fn poll_notice(&mut self) -> Option<ResourceNotice>;

    /// Release the underlying device, fading out over `fade_out`.
    fn shutdown(&mut self, fade_out: Duration);
}
