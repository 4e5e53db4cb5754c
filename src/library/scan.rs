use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use lofty::prelude::*;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::display::display_from_fields;
use super::model::Track;

/// Which directory entries a scan keeps.
struct ScanFilter {
    extensions: Vec<String>,
    include_hidden: bool,
}

impl ScanFilter {
    fn new(settings: &LibrarySettings) -> Self {
        let extensions = settings
            .extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            extensions,
            include_hidden: settings.include_hidden,
        }
    }

    fn is_audio(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    }

    fn visible(&self, path: &Path) -> bool {
        self.include_hidden
            || !path
                .file_name()
                .and_then(|s| s.to_str())
                .is_some_and(|name| name.starts_with('.'))
    }
}

fn epoch_millis(time: std::io::Result<SystemTime>) -> u64 {
    time.ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// `/`-joined path of `path` relative to `root`.
fn relative_id(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn file_uri(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    url::Url::from_file_path(&absolute)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| absolute.display().to_string())
}

fn non_empty(value: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn read_track(root: &Path, path: &Path) -> Track {
    let mut track = Track::new(relative_id(root, path), file_uri(path));

    if let Ok(meta) = fs::metadata(path) {
        track.creation_time = epoch_millis(meta.created());
        track.modification_time = epoch_millis(meta.modified());
    }

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            track.duration = tagged.properties().duration().as_secs_f64();

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                track.title = non_empty(tag.title());
                track.album = non_empty(tag.album());
                if let Some(artist) = non_empty(tag.artist()) {
                    track.artist = artist;
                }
            }
        }
        Err(e) => tracing::debug!(path = %path.display(), error = %e, "no readable tags"),
    }

    track
}

/// Walk `dir` and build a [`Track`] for every audio file, sorted by display line.
///
/// Unreadable entries are skipped. Hidden directories are not descended into
/// unless `include_hidden` is set.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let filter = ScanFilter::new(settings);

    let max_depth = match (settings.recursive, settings.max_depth) {
        (false, _) => Some(1),
        (true, depth) => depth,
    };
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);
    if let Some(depth) = max_depth {
        walker = walker.max_depth(depth);
    }

    let mut tracks: Vec<Track> = walker
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || filter.visible(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file() && filter.is_audio(e.path()))
        .map(|e| read_track(dir, e.path()))
        .collect();

    tracks.sort_by_cached_key(|t| {
        display_from_fields(t, &settings.display_fields, &settings.display_separator)
            .to_lowercase()
    });
    tracing::info!(dir = %dir.display(), tracks = tracks.len(), "scanned music directory");
    tracks
}
