use crate::config::TrackDisplayField;

use super::model::AudioTrack;

/// Build a display string for a track according to the provided `fields` and separator.
///
/// Empty or whitespace-only metadata is skipped; when no field produced
/// anything the title is used as-is.
pub fn display_from_fields(track: &AudioTrack, fields: &[TrackDisplayField], sep: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        let value = match f {
            TrackDisplayField::Title => Some(track.title.as_str()),
            TrackDisplayField::Artist => track.artist.as_deref(),
            TrackDisplayField::Genre => track.genre.as_deref(),
            TrackDisplayField::Id => Some(track.id.as_str()),
        };
        if let Some(v) = value.map(str::trim).filter(|s| !s.is_empty()) {
            parts.push(v.to_string());
        }
    }

    if parts.is_empty() {
        track.title.clone()
    } else {
        parts.join(sep)
    }
}
