use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::library::AudioTrack;

use super::events::{MediaEvent, PlayFailure};
use super::reducer::reduce;
use super::resource::{LoadGeneration, MediaResource, PlayTicket, ResourceNotice};
use super::state::PlayerState;

/// Drives one [`MediaResource`] and keeps [`PlayerState`] in sync with it.
pub struct PlaybackController<R: MediaResource> {
    resource: R,
    state: PlayerState,
    generation: LoadGeneration,
    /// Bumped by every intent that supersedes an in-flight `play()`.
    intent: u64,
    /// The `play()` request still waiting for its settlement.
    pending_play: Option<PlayTicket>,
}

impl<R: MediaResource> PlaybackController<R> {
    pub fn new(resource: R) -> Self {
        Self {
            resource,
            state: PlayerState::default(),
            generation: LoadGeneration::default(),
            intent: 0,
            pending_play: None,
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn current_track(&self) -> Option<&AudioTrack> {
        self.state.current_track.as_ref()
    }

    pub fn generation(&self) -> LoadGeneration {
        self.generation
    }

    /// Whether a `play()` request is still waiting on the resource.
    pub fn play_pending(&self) -> bool {
        self.pending_play.is_some()
    }

    /// Switch to `track`. Re-selecting the loaded track does nothing.
    pub fn load_track(&mut self, track: &AudioTrack) {
        if self.state.current_track_id() == Some(track.id.as_str()) {
            debug!(id = %track.id, "track already loaded");
            return;
        }

        info!(id = %track.id, title = %track.title, "loading track");
        self.generation = self.generation.next();
        self.supersede_play();

        self.resource.pause();
        self.resource.set_current_time(0.0);

        self.state.current_track = Some(track.clone());
        self.state.current_time = 0.0;
        self.state.duration = track.duration.filter(|d| d.is_finite() && *d > 0.0).unwrap_or(0.0);
        self.state.is_playing = false;
        self.state.is_loading = true;
        self.state.is_buffering = true;
        self.state.load_progress = 0.0;
        self.state.error = None;

        self.resource.load(&track.src, self.generation, track.duration);
    }

    /// Ask the resource to start playback. The outcome lands in the state
    /// once the resource settles the request.
    pub fn play(&mut self) {
        if self.state.current_track.is_none() {
            debug!("play requested without a track");
            return;
        }

        self.intent += 1;
        let ticket = PlayTicket {
            generation: self.generation,
            intent: self.intent,
        };
        self.pending_play = Some(ticket);

        self.state.is_loading = true;
        self.state.error = None;
        self.resource.play(ticket);
    }

    pub fn pause(&mut self) {
        if self.supersede_play() {
            self.state.is_loading = false;
        }
        self.resource.pause();
        self.state.is_playing = false;
        self.state.error = None;
    }

    pub fn stop(&mut self) {
        if self.supersede_play() {
            self.state.is_loading = false;
        }
        self.resource.pause();
        self.resource.set_current_time(0.0);
        self.state.is_playing = false;
        self.state.current_time = 0.0;
    }

    pub fn toggle(&mut self) {
        if self.state.is_playing || self.pending_play.is_some() {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn set_volume(&mut self, volume: f64) {
        if volume.is_nan() {
            warn!("ignoring NaN volume");
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.resource.set_volume(volume);
        self.state.volume = volume;
    }

    pub fn seek(&mut self, seconds: f64) {
        if !seconds.is_finite() {
            warn!(seconds, "ignoring non-finite seek");
            return;
        }
        self.resource.set_current_time(seconds);
        self.state.current_time = seconds;
    }

    /// Apply every notice the resource has queued. Returns how many were
    /// applied (stale ones are not counted).
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(notice) = self.resource.poll_notice() {
            if self.apply_notice(notice) {
                applied += 1;
            }
        }
        applied
    }

    /// Apply one notice; returns `false` if it was stale and dropped.
    pub fn apply_notice(&mut self, notice: ResourceNotice) -> bool {
        match notice {
            ResourceNotice::Event { generation, event } => {
                if generation != self.generation {
                    trace!(?generation, current = ?self.generation, ?event, "dropping stale media event");
                    return false;
                }
                if let MediaEvent::Error(ref err) = event {
                    warn!(code = err.code(), detail = err.detail(), "media error");
                }
                let state = std::mem::take(&mut self.state);
                self.state = reduce(state, &event);
                true
            }
            ResourceNotice::PlaySettled { ticket, result } => self.settle_play(ticket, result),
        }
    }

    fn settle_play(&mut self, ticket: PlayTicket, result: Result<(), PlayFailure>) -> bool {
        if self.pending_play != Some(ticket) {
            debug!(?ticket, ?result, "dropping stale play settlement");
            return false;
        }
        self.pending_play = None;

        match result {
            Ok(()) => {
                debug!("playback started");
                self.state.is_playing = true;
                self.state.is_loading = false;
            }
            Err(failure) => {
                warn!(%failure, "play failed");
                self.state.is_playing = false;
                self.state.is_loading = false;
                self.state.is_buffering = false;
                self.state.error = Some(failure.to_string());
            }
        }
        true
    }

    /// Invalidate any in-flight `play()`; returns whether one was pending.
    fn supersede_play(&mut self) -> bool {
        self.intent += 1;
        self.pending_play.take().is_some()
    }

    /// Tear down the resource at the end of the session.
    pub fn shutdown(&mut self, fade_out: Duration) {
        self.supersede_play();
        self.resource.shutdown(fade_out);
        self.state.is_playing = false;
    }

    #[cfg(test)]
    pub(crate) fn resource_mut(&mut self) -> &mut R {
        &mut self.resource
    }
}
