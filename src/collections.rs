//! Playlists, albums and tracks persisted in a [`KvStore`].
//!
//! [`Library`] is the single entry point: build it once over a store and pass
//! it by reference to whatever needs the collections.

mod albums;
mod entity;
mod manager;
mod playlists;
mod search;
mod tracks;

use std::sync::Arc;

use thiserror::Error;

use crate::library::Track;
use crate::store::{KvStore, StoreError};

pub use entity::{Album, AlbumInfo, Entity, ItemCollection, Playlist, Summary, generate_id};
pub use manager::Manager;
pub use playlists::FAVORITES_ID;
pub use search::{MAX_RECENT_SEARCHES, RECENT_SEARCHES_KEY, SearchHistory, matches_query};

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

pub type TrackManager<S> = Manager<S, Track>;
pub type PlaylistManager<S> = Manager<S, Playlist>;
pub type AlbumManager<S> = Manager<S, Album>;

/// The three entity managers and the search history over one shared store.
pub struct Library<S> {
    store: Arc<S>,
    pub tracks: TrackManager<S>,
    pub playlists: PlaylistManager<S>,
    pub albums: AlbumManager<S>,
    pub searches: SearchHistory<S>,
}

impl<S: KvStore> Library<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            tracks: Manager::new(Arc::clone(&store)),
            playlists: Manager::new(Arc::clone(&store)),
            albums: Manager::new(Arc::clone(&store)),
            searches: SearchHistory::new(Arc::clone(&store)),
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Make sure every master index exists and the favorites playlist is seeded.
    ///
    /// Never deletes anything; see [`reset`](Self::reset) for that.
    pub async fn initialize(&self) -> Result<(), LibraryError> {
        self.tracks.initialize().await?;
        self.playlists.initialize().await?;
        self.albums.initialize().await?;
        self.playlists.ensure_favorites().await?;
        Ok(())
    }

    /// Wipe every collection and re-initialize. Returns the number of records deleted.
    pub async fn reset(&self) -> Result<usize, LibraryError> {
        let removed = self.tracks.reset().await?
            + self.playlists.reset().await?
            + self.albums.reset().await?;
        self.initialize().await?;
        Ok(removed)
    }

    /// Tracks matching `query`, recording the query in the search history.
    pub async fn search(&self, query: &str) -> Result<Vec<Track>, LibraryError> {
        self.searches.save(query).await?;
        let mut tracks = self.tracks.all().await?;
        tracks.retain(|track| matches_query(track, query));
        Ok(tracks)
    }

    /// Drop dangling index entries in every collection.
    pub async fn reconcile(&self) -> Result<usize, LibraryError> {
        Ok(self.tracks.reconcile().await?
            + self.playlists.reconcile().await?
            + self.albums.reconcile().await?)
    }
}
