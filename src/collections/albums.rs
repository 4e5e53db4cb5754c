use crate::store::KvStore;

use super::LibraryError;
use super::entity::Album;
use super::manager::Manager;

impl<S: KvStore> Manager<S, Album> {
    /// Every indexed album with a readable record, in index order.
    pub async fn all(&self) -> Result<Vec<Album>, LibraryError> {
        let mut albums = Vec::new();
        for summary in self.list().await? {
            if let Some(album) = self.get(&summary.id).await? {
                albums.push(album);
            }
        }
        Ok(albums)
    }

    /// Albums credited to exactly `artist`.
    pub async fn by_artist(&self, artist: &str) -> Result<Vec<Album>, LibraryError> {
        let mut albums = self.all().await?;
        albums.retain(|album| album.artist == artist);
        Ok(albums)
    }
}
