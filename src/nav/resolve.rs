use thiserror::Error;
use tracing::{debug, info, warn};

use crate::library::{AudioTrack, public_tracks};

use super::fragment::{NavigationTarget, track_position};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("No track specified. Standalone links must name a track, e.g. #track=track-1;standalone=true")]
    NoTrackSpecified,
    #[error("Track not found: {0}")]
    TrackNotFound(String),
}

/// Pick the track `target` points at.
///
/// Returns `Ok(None)` only outside standalone mode when the list has no
/// public track to fall back on.
pub fn resolve_track<'a>(
    tracks: &'a [AudioTrack],
    target: &NavigationTarget,
) -> Result<Option<&'a AudioTrack>, NavigationError> {
    let explicit = target.track_id.as_deref().and_then(|id| {
        tracks.iter().find(|t| t.id == id).or_else(|| {
            let n = track_position(id)?;
            public_tracks(tracks).nth(n.checked_sub(1)?)
        })
    });

    if target.standalone {
        return match (explicit, &target.track_id) {
            (Some(track), _) => Ok(Some(track)),
            (None, None) => Err(NavigationError::NoTrackSpecified),
            (None, Some(id)) => Err(NavigationError::TrackNotFound(id.clone())),
        };
    }

    let resolved = explicit.or_else(|| public_tracks(tracks).next());
    match resolved {
        // Default navigation never lands on an unlisted track.
        Some(track) if track.unlisted && target.track_id.is_none() => {
            Ok(public_tracks(tracks).next())
        }
        other => Ok(other),
    }
}

/// Result of handling a fragment notification.
#[derive(Debug, PartialEq)]
pub enum NavigationOutcome<'a> {
    /// Nothing to do: a track is already loaded, the fragment was already
    /// handled, or no track list is available yet.
    Unchanged,
    Load(&'a AudioTrack),
    Failed(NavigationError),
    /// The list has no public track to default to.
    Empty,
}

/// One-shot-per-fragment navigation driver.
#[derive(Debug, Default)]
pub struct NavigationResolver {
    standalone: bool,
    last_fragment: Option<String>,
}

impl NavigationResolver {
    pub fn standalone(&self) -> bool {
        self.standalone
    }

    /// Forget which fragment was handled, e.g. after the track list is
    /// reloaded.
    pub fn reset(&mut self) {
        self.standalone = false;
        self.last_fragment = None;
    }

    /// Handle a fragment notification.
    ///
    /// The standalone flag is mirrored every time. Resolution itself runs at
    /// most once per distinct fragment, and never while `current` is set.
    pub fn on_fragment<'a>(
        &mut self,
        fragment: &str,
        tracks: &'a [AudioTrack],
        current: Option<&AudioTrack>,
    ) -> NavigationOutcome<'a> {
        let target = NavigationTarget::parse(fragment);
        self.standalone = target.standalone;

        if tracks.is_empty() || current.is_some() {
            return NavigationOutcome::Unchanged;
        }
        if self.last_fragment.as_deref() == Some(fragment) {
            return NavigationOutcome::Unchanged;
        }
        self.last_fragment = Some(fragment.to_string());

        match resolve_track(tracks, &target) {
            Ok(Some(track)) => {
                info!(fragment, id = %track.id, standalone = target.standalone, "navigation resolved");
                NavigationOutcome::Load(track)
            }
            Ok(None) => {
                debug!(fragment, "no public track to default to");
                NavigationOutcome::Empty
            }
            Err(err) => {
                warn!(fragment, error = %err, "navigation failed");
                NavigationOutcome::Failed(err)
            }
        }
    }
}
