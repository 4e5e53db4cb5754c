use crate::config::TrackDisplayField;

use super::model::Track;

/// Build a display string for a track according to the provided `fields` and separator.
///
/// This composes metadata fields (artist, title, album, filename, id) in the
/// configured order and falls back to the filename stem when no parts were produced.
pub fn display_from_fields(track: &Track, fields: &[TrackDisplayField], sep: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for f in fields {
        let part = match f {
            TrackDisplayField::Title => track.title.as_deref().unwrap_or(track.stem()),
            TrackDisplayField::Artist => track.artist.as_str(),
            TrackDisplayField::Album => track.album.as_deref().unwrap_or(""),
            TrackDisplayField::Filename => track.stem(),
            TrackDisplayField::Id => track.id.as_str(),
        };
        let part = part.trim();
        if !part.is_empty() {
            parts.push(part);
        }
    }

    if parts.is_empty() {
        track.stem().to_string()
    } else {
        parts.join(sep)
    }
}
