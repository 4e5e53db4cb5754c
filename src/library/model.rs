use serde::{Deserialize, Serialize};

/// A single audio file known to the library.
///
/// Serialized in camelCase; this is the shape of the per-track detail record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Path relative to the scanned root, `/`-separated.
    pub id: String,
    pub filename: String,
    /// `file://` URL of the audio file.
    pub uri: String,
    #[serde(default = "audio_media_type")]
    pub media_type: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    /// Seconds.
    #[serde(default)]
    pub duration: f64,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub creation_time: u64,
    #[serde(default)]
    pub modification_time: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub artist: String,
    /// Title from embedded tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Album from embedded tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
}

fn audio_media_type() -> String {
    "audio".to_string()
}

impl Track {
    /// A track with only identity fields set; the filename is the last path segment of `id`.
    pub fn new(id: impl Into<String>, uri: impl Into<String>) -> Self {
        let id = id.into();
        let filename = id.rsplit('/').next().unwrap_or(&id).to_string();
        Self {
            id,
            filename,
            uri: uri.into(),
            media_type: audio_media_type(),
            width: 0,
            height: 0,
            duration: 0.0,
            creation_time: 0,
            modification_time: 0,
            album_id: None,
            image_url: None,
            artist: String::new(),
            title: None,
            album: None,
        }
    }

    /// Enrichment already ran for this track.
    pub fn has_cached_metadata(&self) -> bool {
        self.image_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }

    /// Filename without its extension.
    pub fn stem(&self) -> &str {
        match self.filename.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.filename,
        }
    }
}
