//! Persisted entity shapes and the traits the generic manager works over.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Master index entry: enough to list an entity without loading its record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub name: String,
    pub id: String,
}

/// A record stored under its own id, and listed in its kind's master index.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Prefix of the master index key, e.g. `playlist` -> `playlistMasterList`.
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn name(&self) -> &str;

    fn summary(&self) -> Summary {
        Summary {
            name: self.name().to_string(),
            id: self.id().to_string(),
        }
    }
}

/// An entity that groups track ids (playlists, albums).
pub trait ItemCollection: Entity {
    /// Creation arguments beyond name and items.
    type Extra;

    fn build(id: String, name: String, items: Vec<String>, extra: Self::Extra) -> Self;
    fn items(&self) -> &[String];
    fn items_mut(&mut self) -> &mut Vec<String>;
    fn set_name(&mut self, name: String);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub music: Vec<String>,
}

impl Entity for Playlist {
    const KIND: &'static str = "playlist";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl ItemCollection for Playlist {
    type Extra = ();

    fn build(id: String, name: String, music: Vec<String>, _extra: ()) -> Self {
        Self { id, name, music }
    }

    fn items(&self) -> &[String] {
        &self.music
    }

    fn items_mut(&mut self) -> &mut Vec<String> {
        &mut self.music
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub cover_art: String,
    pub music: Vec<String>,
}

/// Extra creation arguments for an [`Album`].
#[derive(Debug, Clone, Default)]
pub struct AlbumInfo {
    pub artist: String,
    pub cover_art: String,
}

impl Entity for Album {
    const KIND: &'static str = "album";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl ItemCollection for Album {
    type Extra = AlbumInfo;

    fn build(id: String, name: String, music: Vec<String>, info: AlbumInfo) -> Self {
        Self {
            id,
            name,
            artist: info.artist,
            cover_art: info.cover_art,
            music,
        }
    }

    fn items(&self) -> &[String] {
        &self.music
    }

    fn items_mut(&mut self) -> &mut Vec<String> {
        &mut self.music
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

/// Base-36 millisecond timestamp followed by a base-36 random suffix.
pub fn generate_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    format!("{}{}", to_base36(millis), to_base36(rand::random::<u64>()))
}

pub(crate) fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
