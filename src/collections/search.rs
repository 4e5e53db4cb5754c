//! Recent search history, most recent first.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::library::Track;
use crate::store::{KvStore, StoreError};

use super::LibraryError;

pub const RECENT_SEARCHES_KEY: &str = "recentSearches";
pub const MAX_RECENT_SEARCHES: usize = 5;

pub struct SearchHistory<S> {
    store: Arc<S>,
    write_lock: Mutex<()>,
}

impl<S: KvStore> SearchHistory<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Stored queries; empty when none were saved or the entry is malformed.
    pub async fn recent(&self) -> Result<Vec<String>, LibraryError> {
        match self.store.get_json::<Vec<String>>(RECENT_SEARCHES_KEY).await {
            Ok(searches) => Ok(searches.unwrap_or_default()),
            Err(StoreError::Json(e)) => {
                error!(error = %e, "malformed recent searches, treating as empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Put `query` in front, dropping an older copy and anything past the cap.
    ///
    /// Blank queries are not recorded. Returns the updated list.
    pub async fn save(&self, query: &str) -> Result<Vec<String>, LibraryError> {
        let query = query.trim();
        let _guard = self.write_lock.lock().await;
        let mut searches = self.recent().await?;
        if query.is_empty() {
            return Ok(searches);
        }

        searches.retain(|q| q != query);
        searches.insert(0, query.to_string());
        searches.truncate(MAX_RECENT_SEARCHES);
        self.store.set_json(RECENT_SEARCHES_KEY, &searches).await?;
        debug!(query, "search saved");
        Ok(searches)
    }

    /// Drop `query` from the history. Returns the updated list.
    pub async fn forget(&self, query: &str) -> Result<Vec<String>, LibraryError> {
        let _guard = self.write_lock.lock().await;
        let mut searches = self.recent().await?;
        let before = searches.len();
        searches.retain(|q| q != query);
        if searches.len() != before {
            self.store.set_json(RECENT_SEARCHES_KEY, &searches).await?;
        }
        Ok(searches)
    }
}

/// Case-insensitive substring match on filename, title and artist.
pub fn matches_query(track: &Track, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }
    [Some(&track.filename), track.title.as_ref(), Some(&track.artist)]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}
