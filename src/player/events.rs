//! Resource lifecycle events and the playback error taxonomy.
//!
//! The `Display` text of [`MediaError`] and [`PlayFailure`] is exactly what
//! ends up in `PlayerState::error`.

use thiserror::Error;

/// Lifecycle notifications emitted by a media resource.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// The resource started fetching a new source.
    LoadStart,
    /// More of the source has been buffered. Both values share a unit
    /// (seconds when the duration is known).
    Progress {
        buffered_end: Option<f64>,
        duration: f64,
    },
    /// The first frame of media is available.
    LoadedData,
    /// Enough data is available to start playback.
    CanPlay,
    /// Playback stalled waiting for data.
    Waiting,
    /// Playback actually started or resumed.
    Playing,
    TimeUpdate {
        current_time: f64,
    },
    DurationChange {
        duration: f64,
    },
    /// Playback reached the end of the source.
    Ended,
    Error(MediaError),
}

/// Failure descriptor reported by the resource itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("Playback was aborted. Please try again.")]
    Aborted,
    #[error(
        "A network error prevented loading the podcast. Please check your connection and try again."
    )]
    Network { detail: String },
    #[error("The podcast file appears to be corrupted or in an unsupported format.")]
    Decode { detail: String },
    #[error("This podcast format is not supported or the source is unavailable.")]
    SrcNotSupported { detail: String },
    #[error("Error playing podcast: {detail}")]
    Unknown { code: u16, detail: String },
}

impl MediaError {
    pub const ABORTED: u16 = 1;
    pub const NETWORK: u16 = 2;
    pub const DECODE: u16 = 3;
    pub const SRC_NOT_SUPPORTED: u16 = 4;

    /// Build an error from a numeric media error code and optional message.
    pub fn from_code(code: u16, message: Option<String>) -> Self {
        let detail = message.unwrap_or_default();
        match code {
            Self::ABORTED => Self::Aborted,
            Self::NETWORK => Self::Network { detail },
            Self::DECODE => Self::Decode { detail },
            Self::SRC_NOT_SUPPORTED => Self::SrcNotSupported { detail },
            _ => Self::Unknown {
                code,
                detail: if detail.is_empty() {
                    format!("Unknown error (code {code})")
                } else {
                    detail
                },
            },
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            Self::Aborted => Self::ABORTED,
            Self::Network { .. } => Self::NETWORK,
            Self::Decode { .. } => Self::DECODE,
            Self::SrcNotSupported { .. } => Self::SRC_NOT_SUPPORTED,
            Self::Unknown { code, .. } => *code,
        }
    }

    /// Technical detail for logs; not shown to the user.
    pub fn detail(&self) -> &str {
        match self {
            Self::Aborted => "",
            Self::Network { detail }
            | Self::Decode { detail }
            | Self::SrcNotSupported { detail }
            | Self::Unknown { detail, .. } => detail,
        }
    }
}

/// Why a `play()` request was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayFailure {
    /// Playback must be started by an explicit user action.
    #[error("Autoplay is blocked by the playback policy. Press play to start listening.")]
    NotAllowed,
    /// A newer load or pause interrupted the request.
    #[error("Playback was interrupted. Please try again.")]
    Aborted,
    /// The resource rejected the request for a named reason.
    #[error("Playback issue: {name}. Please try again or use a different output device.")]
    Rejected { name: String },
    #[error("Play failed: {0}")]
    Unknown(String),
}
