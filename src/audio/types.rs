//! Commands understood by the audio thread.

use std::sync::Arc;

use crate::player::{LoadGeneration, MediaError, PlayTicket};

#[derive(Debug)]
pub(crate) enum AudioCmd {
    /// Replace the source and start fetching it.
    Load {
        src: String,
        generation: LoadGeneration,
        duration_hint: Option<f64>,
    },
    /// Sent by a loader thread once its download finished or failed.
    Fetched {
        generation: LoadGeneration,
        result: Result<Arc<[u8]>, MediaError>,
    },
    Play(PlayTicket),
    Pause,
    /// Seek to an absolute position in seconds.
    Seek(f64),
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}
