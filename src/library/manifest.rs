//! Manifest loading: a single GET (or file read) returning a JSON array of
//! tracks.
//!
//! Every failure maps onto a [`ManifestError`] whose `Display` text is what
//! the UI shows next to its retry hint.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::{CACHE_CONTROL, PRAGMA};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use super::model::AudioTrack;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    #[error("Playlist not found (HTTP 404). Check the manifest URL.")]
    NotFound,
    #[error("The podcast server had a problem (HTTP {0}). Please try again later.")]
    Server(u16),
    #[error("Failed to load the playlist (HTTP {0}).")]
    Http(u16),
    #[error("Loading the playlist timed out after {0}s. Check your connection and try again.")]
    TimedOut(u64),
    #[error("The playlist is malformed: {0}")]
    Malformed(String),
    #[error("Could not reach the playlist server: {0}")]
    Transport(String),
    #[error("Could not read the playlist file: {0}")]
    Io(String),
}

/// Where the manifest lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    Remote(Url),
    Local(PathBuf),
}

impl ManifestSource {
    /// Resolve the configured manifest location.
    ///
    /// Absolute URLs are used as-is. Relative values are joined onto the page
    /// link when that link is http(s), and treated as file paths otherwise.
    pub fn resolve(configured: &str, page: Option<&Url>) -> Self {
        if let Ok(url) = Url::parse(configured) {
            match url.scheme() {
                "http" | "https" => return Self::Remote(url),
                "file" => {
                    if let Ok(path) = url.to_file_path() {
                        return Self::Local(path);
                    }
                }
                _ => {}
            }
        }

        if let Some(page) = page.filter(|p| matches!(p.scheme(), "http" | "https")) {
            if let Ok(joined) = page.join(configured) {
                return Self::Remote(joined);
            }
        }

        Self::Local(PathBuf::from(configured))
    }

    /// Resolve a track `src` relative to this manifest's location.
    fn resolve_src(&self, src: &str) -> String {
        if Url::parse(src).is_ok() {
            return src.to_string();
        }
        match self {
            Self::Remote(base) => base
                .join(src)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| src.to_string()),
            Self::Local(path) => {
                let src_path = Path::new(src);
                if src_path.is_absolute() {
                    return src.to_string();
                }
                path.parent()
                    .map(|dir| dir.join(src_path).display().to_string())
                    .unwrap_or_else(|| src.to_string())
            }
        }
    }
}

impl std::fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{url}"),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Map a non-success HTTP status onto its manifest error.
pub(super) fn status_error(status: u16) -> Option<ManifestError> {
    match status {
        200..=299 => None,
        404 => Some(ManifestError::NotFound),
        500.. => Some(ManifestError::Server(status)),
        _ => Some(ManifestError::Http(status)),
    }
}

/// Decode a manifest body. The payload must be a non-empty JSON array.
pub fn parse_manifest(body: &[u8], source: &ManifestSource) -> Result<Vec<AudioTrack>, ManifestError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| ManifestError::Malformed(e.to_string()))?;

    let Some(items) = value.as_array() else {
        return Err(ManifestError::Malformed(
            "expected a JSON array of tracks".to_string(),
        ));
    };
    if items.is_empty() {
        return Err(ManifestError::Malformed("the track list is empty".to_string()));
    }

    let tracks: Vec<AudioTrack> =
        serde_json::from_value(value).map_err(|e| ManifestError::Malformed(e.to_string()))?;

    Ok(tracks
        .into_iter()
        .map(|mut t| {
            t.src = source.resolve_src(&t.src);
            t
        })
        .collect())
}

/// Fetch and decode the manifest, giving up after `timeout`.
pub fn fetch_manifest(
    source: &ManifestSource,
    timeout: Duration,
) -> Result<Vec<AudioTrack>, ManifestError> {
    info!(%source, "loading manifest");

    let body = match source {
        ManifestSource::Remote(url) => fetch_remote(url, timeout)?,
        ManifestSource::Local(path) => {
            std::fs::read(path).map_err(|e| ManifestError::Io(e.to_string()))?
        }
    };

    let tracks = parse_manifest(&body, source);
    match &tracks {
        Ok(t) => info!(count = t.len(), "manifest loaded"),
        Err(e) => warn!(error = %e, "manifest rejected"),
    }
    tracks
}

fn fetch_remote(url: &Url, timeout: Duration) -> Result<Vec<u8>, ManifestError> {
    let timed_out = || ManifestError::TimedOut(timeout.as_secs());

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("podplay/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ManifestError::Transport(e.to_string()))?;

    let response = client
        .get(url.clone())
        .header(CACHE_CONTROL, "no-cache")
        .header(PRAGMA, "no-cache")
        .send()
        .map_err(|e| {
            if e.is_timeout() {
                timed_out()
            } else {
                ManifestError::Transport(e.to_string())
            }
        })?;

    let status = response.status().as_u16();
    debug!(status, "manifest response");
    if let Some(err) = status_error(status) {
        return Err(err);
    }

    response.bytes().map(|b| b.to_vec()).map_err(|e| {
        if e.is_timeout() {
            timed_out()
        } else {
            ManifestError::Transport(e.to_string())
        }
    })
}
