//! Lyrics lookup, cached in the store under `lyrics_<stem>`.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use crate::collections::{Summary, TrackManager};
use crate::config::EnrichmentSettings;
use crate::store::{KvStore, StoreError};

use super::EnrichError;
use super::parse::{lyrics_stem, split_artist_title};

pub const LYRICS_KEY_PREFIX: &str = "lyrics_";

pub trait LyricsSource: Send + Sync {
    fn lyrics(
        &self,
        artist: &str,
        title: &str,
    ) -> impl Future<Output = Result<Option<String>, EnrichError>> + Send;
}

/// Client for `GET {base}/v1/{artist}/{title}` returning `{"lyrics": "..."}`.
#[derive(Debug, Clone)]
pub struct LyricsOvhClient {
    client: Client,
    base_url: url::Url,
}

#[derive(Debug, Deserialize)]
struct LyricsResponse {
    #[serde(default)]
    lyrics: String,
}

impl LyricsOvhClient {
    pub fn new(settings: &EnrichmentSettings) -> Result<Self, EnrichError> {
        let base_url = url::Url::parse(&settings.lyrics_base_url)
            .map_err(|e| EnrichError::InvalidUrl(format!("{}: {e}", settings.lyrics_base_url)))?;
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, artist: &str, title: &str) -> Result<url::Url, EnrichError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| EnrichError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["v1", artist, title]);
        Ok(url)
    }
}

impl LyricsSource for LyricsOvhClient {
    async fn lyrics(&self, artist: &str, title: &str) -> Result<Option<String>, EnrichError> {
        let url = self.endpoint(artist, title)?;
        debug!(%url, "lyrics request started");

        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: LyricsResponse = response.error_for_status()?.json().await?;
        Ok((!body.lyrics.trim().is_empty()).then_some(body.lyrics))
    }
}

/// Lyrics for an `Artist - Title` filename, from the cache or the source.
///
/// Fetched lyrics are cached; a miss is not.
pub async fn lyrics_for<S, L>(
    store: &S,
    source: &L,
    filename: &str,
) -> Result<Option<String>, EnrichError>
where
    S: KvStore,
    L: LyricsSource,
{
    let (artist, title) = split_artist_title(filename)
        .ok_or_else(|| EnrichError::InvalidFilename(filename.to_string()))?;
    let key = format!("{LYRICS_KEY_PREFIX}{}", lyrics_stem(filename));

    if let Some(cached) = store.get_json::<String>(&key).await? {
        debug!(key, "lyrics served from cache");
        return Ok(Some(cached));
    }

    let fetched = source.lyrics(&artist, &title).await?;
    if let Some(lyrics) = &fetched {
        store.set_json(&key, lyrics).await?;
        info!(key, "lyrics cached");
    }
    Ok(fetched)
}

/// Remove every cached lyrics entry. Returns how many were removed.
///
/// Track records live in the same key space, so keys that are indexed track
/// ids are left alone even when they carry the lyrics prefix.
pub async fn clear_lyrics<S: KvStore>(store: &S) -> Result<usize, StoreError> {
    let track_ids: HashSet<String> = store
        .get_json::<Vec<Summary>>(&TrackManager::<S>::index_key())
        .await?
        .unwrap_or_default()
        .into_iter()
        .map(|s| s.id)
        .collect();
    let keys: Vec<String> = store
        .keys()
        .await?
        .into_iter()
        .filter(|k| k.starts_with(LYRICS_KEY_PREFIX) && !track_ids.contains(k))
        .collect();
    for key in &keys {
        store.remove(key).await?;
    }
    info!(removed = keys.len(), "cleared lyrics cache");
    Ok(keys.len())
}
