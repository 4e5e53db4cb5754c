use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::library::Track;
use crate::store::KvStore;

use super::LibraryError;
use super::entity::Entity;
use super::manager::Manager;

impl Entity for Track {
    const KIND: &'static str = "track";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.filename
    }
}

impl<S: KvStore> Manager<S, Track> {
    /// Record every scanned track that is not indexed yet.
    ///
    /// Known tracks keep their stored record, so cached enrichment survives a
    /// rescan. Returns the number of tracks added.
    pub async fn sync(&self, scanned: &[Track]) -> Result<usize, LibraryError> {
        let _guard = self.lock().await;
        let mut index = self.read_index().await?.unwrap_or_default();

        let mut added = 0;
        for track in scanned {
            if index.iter().any(|s| s.id == track.id) {
                continue;
            }
            self.write_record(track).await?;
            index.push(track.summary());
            added += 1;
        }

        if added > 0 {
            self.write_index(&index).await?;
        }
        info!(scanned = scanned.len(), added, "synced tracks");
        Ok(added)
    }

    pub async fn fetch(&self, id: &str) -> Result<Option<Track>, LibraryError> {
        self.get(id).await
    }

    pub async fn update(&self, track: &Track) -> Result<(), LibraryError> {
        self.put(track).await
    }

    /// Every indexed track, in index order.
    pub async fn all(&self) -> Result<Vec<Track>, LibraryError> {
        let ids: Vec<String> = self.list().await?.into_iter().map(|s| s.id).collect();
        self.hydrate(&ids).await
    }

    /// Full records for `ids`, in order. Ids without a record are skipped.
    pub async fn hydrate(&self, ids: &[String]) -> Result<Vec<Track>, LibraryError> {
        let mut tracks = Vec::with_capacity(ids.len());
        for id in ids {
            match self.get(id).await? {
                Some(track) => tracks.push(track),
                None => warn!(id = %id, "track record missing, skipping"),
            }
        }
        Ok(tracks)
    }

    /// Tracks credited to exactly `artist`, in index order.
    pub async fn by_artist(&self, artist: &str) -> Result<Vec<Track>, LibraryError> {
        let mut tracks = self.all().await?;
        tracks.retain(|track| track.artist == artist);
        Ok(tracks)
    }

    /// Every track keyed by artist. Untagged tracks sit under the empty name.
    pub async fn group_by_artist(&self) -> Result<BTreeMap<String, Vec<Track>>, LibraryError> {
        let mut groups: BTreeMap<String, Vec<Track>> = BTreeMap::new();
        for track in self.all().await? {
            groups.entry(track.artist.clone()).or_default().push(track);
        }
        Ok(groups)
    }
}
