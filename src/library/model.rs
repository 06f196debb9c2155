use serde::Deserialize;

/// A single episode as listed in the manifest.
///
/// Identity is `id`; the manifest is trusted to keep ids unique.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AudioTrack {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    pub src: String,
    /// Known duration in seconds, if the manifest provides one.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Unlisted tracks are reachable by direct link only.
    #[serde(default)]
    pub unlisted: bool,
}

impl AudioTrack {
    /// Public tracks take part in default selection and next/previous.
    pub fn is_public(&self) -> bool {
        !self.unlisted
    }
}

/// Iterate over the public (non-unlisted) subsequence of `tracks`.
pub fn public_tracks(tracks: &[AudioTrack]) -> impl Iterator<Item = &AudioTrack> {
    tracks.iter().filter(|t| t.is_public())
}
