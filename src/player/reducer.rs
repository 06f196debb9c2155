use super::events::MediaEvent;
use super::state::PlayerState;

/// Apply one resource event to `state`.
///
/// Pure: the same state and event always produce the same result, which keeps
/// the transition table testable without an audio device.
pub fn reduce(mut state: PlayerState, event: &MediaEvent) -> PlayerState {
    match event {
        MediaEvent::LoadStart => {
            state.is_loading = true;
            state.is_buffering = true;
            state.load_progress = 0.0;
        }
        MediaEvent::Progress {
            buffered_end,
            duration,
        } => {
            if let Some(end) = buffered_end {
                if *duration > 0.0 {
                    let pct = (end / duration * 100.0).round().clamp(0.0, 100.0);
                    // Never regress within a load cycle.
                    state.load_progress = state.load_progress.max(pct);
                }
            }
        }
        MediaEvent::LoadedData => {
            state.is_loading = false;
            state.load_progress = 100.0;
        }
        MediaEvent::CanPlay => {
            state.is_loading = false;
        }
        MediaEvent::Waiting => {
            state.is_buffering = true;
        }
        MediaEvent::Playing => {
            state.is_buffering = false;
            state.is_loading = false;
        }
        MediaEvent::TimeUpdate { current_time } => {
            state.current_time = *current_time;
        }
        MediaEvent::DurationChange { duration } => {
            state.duration = if duration.is_finite() && *duration > 0.0 {
                *duration
            } else {
                0.0
            };
        }
        MediaEvent::Ended => {
            state.is_playing = false;
            state.current_time = 0.0;
            state.is_buffering = false;
            state.is_loading = false;
        }
        MediaEvent::Error(err) => {
            state.is_playing = false;
            state.is_loading = false;
            state.is_buffering = false;
            state.error = Some(err.to_string());
        }
    }
    state
}
