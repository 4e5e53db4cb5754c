//! Guessing search terms from audio filenames.

fn strip_extension(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.trim().is_empty() => stem,
        _ => filename,
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Title and (maybe) artist from a filename.
///
/// `Title (Artist).mp3` and `Title - Artist.mp3` both name an artist;
/// anything else is taken as a bare title.
pub fn parse_title_artist(filename: &str) -> (String, Option<String>) {
    let stem = strip_extension(filename).trim();

    if let Some(inner) = stem.strip_suffix(')') {
        if let Some((title, artist)) = inner.rsplit_once('(') {
            if let Some(title) = non_empty(title) {
                return (title, non_empty(artist));
            }
        }
    }

    if let Some((title, artist)) = stem.split_once(" - ") {
        if let Some(title) = non_empty(title) {
            return (title, non_empty(artist));
        }
    }

    (stem.to_string(), None)
}

/// `(artist, title)` from an `Artist - Title` filename, the lyrics naming scheme.
pub fn split_artist_title(filename: &str) -> Option<(String, String)> {
    let (artist, title) = strip_extension(filename).split_once(" - ")?;
    Some((non_empty(artist)?, non_empty(title)?))
}

/// Lyrics cache suffix for a filename: its trimmed stem.
pub fn lyrics_stem(filename: &str) -> &str {
    strip_extension(filename).trim()
}
