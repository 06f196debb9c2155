use crate::library::AudioTrack;

/// Snapshot of everything the UI needs to render playback.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub is_playing: bool,
    /// Playback position in seconds.
    pub current_time: f64,
    /// Track length in seconds; 0 while unknown.
    pub duration: f64,
    /// Always within `[0, 1]`.
    pub volume: f64,
    pub current_track: Option<AudioTrack>,
    pub is_buffering: bool,
    pub is_loading: bool,
    /// Percentage of the current source that has been fetched.
    pub load_progress: f64,
    pub error: Option<String>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: 1.0,
            current_track: None,
            is_buffering: false,
            is_loading: false,
            load_progress: 0.0,
            error: None,
        }
    }
}

impl PlayerState {
    /// Id of the loaded track, if any.
    pub fn current_track_id(&self) -> Option<&str> {
        self.current_track.as_ref().map(|t| t.id.as_str())
    }
}
