use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/podplay/config.toml` or `~/.config/podplay/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `PODPLAY__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub manifest: ManifestSettings,
    pub audio: AudioSettings,
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ManifestSettings {
    /// Manifest location. Relative values resolve against the page link when
    /// it is an http(s) URL, otherwise against the working directory.
    ///
    /// Override with `PODPLAY__MANIFEST__URL`.
    pub url: String,
    /// Abort the manifest request after this many seconds.
    pub timeout_secs: u64,
}

impl Default for ManifestSettings {
    fn default() -> Self {
        Self {
            url: "tracks.json".to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
    /// How often the audio thread reports playback position (milliseconds).
    pub tick_ms: u64,
    /// Give up on a track download that delivers no data for this many seconds.
    pub stall_timeout_secs: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            quit_fade_out_ms: 500,
            tick_ms: 200,
            stall_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Initial volume in `[0, 1]`.
    pub volume: f64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self { volume: 1.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Volume change per up/down arrow press.
    pub volume_step: f64,
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            volume_step: 0.1,
            scrub_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Base URL used when printing share links. When unset, the page link
    /// given on the command line is used (if it was a URL).
    pub share_base_url: Option<String>,

    /// Which track fields to show for the current track and playlist rows.
    ///
    /// Example: ["artist", "title"]
    pub now_playing_track_fields: Vec<TrackDisplayField>,

    /// Separator used to join `now_playing_track_fields`.
    pub now_playing_track_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ podcasts, streamed ~ ".to_string(),
            share_base_url: None,
            now_playing_track_fields: vec![TrackDisplayField::Title],
            now_playing_track_separator: " - ".to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackDisplayField {
    Title,
    Artist,
    Genre,
    Id,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default filter directive; `PODPLAY_LOG` takes precedence.
    pub level: String,
    /// Log file. Defaults to `$XDG_STATE_HOME/podplay/podplay.log`.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
