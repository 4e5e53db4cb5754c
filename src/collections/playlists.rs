use crate::store::KvStore;

use super::LibraryError;
use super::entity::Playlist;
use super::manager::Manager;

/// Id and name of the built-in favorites playlist.
pub const FAVORITES_ID: &str = "Favorites";

impl<S: KvStore> Manager<S, Playlist> {
    /// Seed the favorites playlist when it does not exist yet.
    ///
    /// Returns `true` when it was created.
    pub async fn ensure_favorites(&self) -> Result<bool, LibraryError> {
        if let Some(favorites) = self.get(FAVORITES_ID).await? {
            if !self.contains(FAVORITES_ID).await? {
                // Record survived without its index entry; re-index it.
                self.put(&favorites).await?;
            }
            return Ok(false);
        }
        self.create_with_id(FAVORITES_ID.to_string(), FAVORITES_ID, Vec::new(), ())
            .await?;
        Ok(true)
    }

    pub async fn favorites(&self) -> Result<Vec<String>, LibraryError> {
        self.get_items(FAVORITES_ID).await
    }

    pub async fn is_favorite(&self, track_id: &str) -> Result<bool, LibraryError> {
        Ok(self.favorites().await?.iter().any(|id| id == track_id))
    }

    pub async fn add_favorite(&self, track_id: &str) -> Result<(), LibraryError> {
        self.ensure_favorites().await?;
        self.add_items(FAVORITES_ID, &[track_id.to_string()]).await?;
        Ok(())
    }

    pub async fn remove_favorite(&self, track_id: &str) -> Result<(), LibraryError> {
        if !self.contains(FAVORITES_ID).await? {
            return Ok(());
        }
        self.remove_items(FAVORITES_ID, &[track_id.to_string()]).await?;
        Ok(())
    }
}
