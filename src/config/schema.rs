use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/cadenza/config.toml` or `~/.config/cadenza/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CADENZA__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub store: StoreSettings,
    pub enrichment: EnrichmentSettings,
    pub playback: PlaybackSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackDisplayField {
    Title,
    Artist,
    Album,
    Filename,
    Id,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Directory scanned for audio files. Falls back to the working directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_dir: Option<PathBuf>,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    /// Which fields make up a track's display line, and in what order.
    ///
    /// Example: ["artist", "title"] -> "Artist - Title"
    pub display_fields: Vec<TrackDisplayField>,
    /// Separator used to join `display_fields`.
    pub display_separator: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            music_dir: None,
            extensions: vec![
                "mp3".into(),
                "flac".into(),
                "wav".into(),
                "ogg".into(),
                "m4a".into(),
            ],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
            display_fields: vec![TrackDisplayField::Artist, TrackDisplayField::Title],
            display_separator: " - ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Location of the JSON store file.
    ///
    /// Defaults to `$XDG_DATA_HOME/cadenza/store.json` or `~/.local/share/cadenza/store.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EnrichmentSettings {
    /// Base URL of the song-search API (`GET {base_url}/search?q=...`).
    pub base_url: String,
    /// Base URL of the lyrics API (`GET {lyrics_base_url}/v1/{artist}/{title}`).
    pub lyrics_base_url: String,
    /// Artist written to a track when no search matched.
    pub placeholder_artist: String,
    /// Image URL written to a track when no search matched. An empty value
    /// means the track is looked up again on the next pass.
    pub placeholder_image_url: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.genius.com".to_string(),
            lyrics_base_url: "https://api.lyrics.ovh".to_string(),
            placeholder_artist: "Unknown Artist".to_string(),
            placeholder_image_url: String::new(),
            timeout_secs: 10,
            user_agent: concat!("cadenza/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Shuffle the queue every time it is rebuilt from a playlist or album.
    pub shuffle_on_load: bool,
    /// Move to the next track when the current one finishes.
    pub auto_advance: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            shuffle_on_load: false,
            auto_advance: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directives; `RUST_LOG` wins when set.
    pub filter: String,
    /// Write daily-rotated log files here instead of stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "cadenza=info,warn".to_string(),
            directory: None,
        }
    }
}
