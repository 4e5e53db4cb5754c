//! Generic CRUD over one entity kind.
//!
//! Each kind keeps a master index (`<kind>MasterList`, a list of
//! [`Summary`]) next to one detail record per entity stored under its id.
//! Writes are ordered so this process never leaves an index entry pointing
//! at a missing record: the record is written before it is indexed, and
//! unindexed before it is deleted. Every read-modify-write of the index runs
//! under the manager's write lock.
//!
//! All managers share one key space, so an id only counts as this kind's
//! entity when it is listed in this kind's index. Mutations and deletes of
//! anything else are refused.

use std::marker::PhantomData;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::store::{KvStore, StoreError};

use super::LibraryError;
use super::entity::{Entity, ItemCollection, Summary, generate_id};

pub struct Manager<S, E> {
    store: Arc<S>,
    write_lock: Mutex<()>,
    _entity: PhantomData<fn() -> E>,
}

impl<S: KvStore, E: Entity> Manager<S, E> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
            _entity: PhantomData,
        }
    }

    pub fn index_key() -> String {
        format!("{}MasterList", E::KIND)
    }

    pub(super) async fn lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Master index, or `None` when it was never written.
    pub(super) async fn read_index(&self) -> Result<Option<Vec<Summary>>, LibraryError> {
        match self.store.get_json::<Vec<Summary>>(&Self::index_key()).await {
            Ok(index) => Ok(index),
            Err(StoreError::Json(e)) => {
                error!(kind = E::KIND, error = %e, "malformed master index, treating as empty");
                Ok(Some(Vec::new()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub(super) async fn write_index(&self, index: &[Summary]) -> Result<(), LibraryError> {
        self.store.set_json(&Self::index_key(), index).await?;
        Ok(())
    }

    pub(super) async fn write_record(&self, entity: &E) -> Result<(), LibraryError> {
        self.store.set_json(entity.id(), entity).await?;
        Ok(())
    }

    /// Create an empty master index when none exists. Existing data is left alone.
    ///
    /// Returns `true` when the index was created.
    pub async fn initialize(&self) -> Result<bool, LibraryError> {
        let _guard = self.lock().await;
        if self.read_index().await?.is_some() {
            debug!(kind = E::KIND, "master index present");
            return Ok(false);
        }
        self.write_index(&[]).await?;
        info!(kind = E::KIND, "created empty master index");
        Ok(true)
    }

    /// Delete every indexed record and start over with an empty index.
    ///
    /// Returns the number of records deleted.
    pub async fn reset(&self) -> Result<usize, LibraryError> {
        let _guard = self.lock().await;
        let index = self.read_index().await?.unwrap_or_default();
        for summary in &index {
            self.store.remove(&summary.id).await?;
        }
        self.store.remove(&Self::index_key()).await?;
        self.write_index(&[]).await?;
        warn!(kind = E::KIND, removed = index.len(), "reset collection");
        Ok(index.len())
    }

    /// The master index; empty when none exists.
    pub async fn list(&self) -> Result<Vec<Summary>, LibraryError> {
        Ok(self.read_index().await?.unwrap_or_default())
    }

    pub async fn contains(&self, id: &str) -> Result<bool, LibraryError> {
        Ok(self.list().await?.iter().any(|s| s.id == id))
    }

    /// Detail record for `id`. A malformed record is logged and reported as missing.
    pub async fn get(&self, id: &str) -> Result<Option<E>, LibraryError> {
        match self.store.get_json::<E>(id).await {
            Ok(record) => Ok(record),
            Err(StoreError::Json(e)) => {
                error!(kind = E::KIND, id, error = %e, "malformed record, treating as missing");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Like [`get`](Self::get), but the id must be indexed under this kind
    /// and its record readable.
    pub async fn require(&self, id: &str) -> Result<E, LibraryError> {
        let not_found = || LibraryError::NotFound {
            kind: E::KIND,
            id: id.to_string(),
        };
        if !self.contains(id).await? {
            return Err(not_found());
        }
        self.get(id).await?.ok_or_else(not_found)
    }

    /// Write `entity`, indexing it if needed and keeping its summary current.
    pub async fn put(&self, entity: &E) -> Result<(), LibraryError> {
        let _guard = self.lock().await;
        self.put_locked(entity).await
    }

    /// [`put`](Self::put) for callers already holding the write lock.
    pub(super) async fn put_locked(&self, entity: &E) -> Result<(), LibraryError> {
        self.write_record(entity).await?;

        let mut index = self.read_index().await?.unwrap_or_default();
        let summary = entity.summary();
        match index.iter_mut().find(|s| s.id == summary.id) {
            Some(existing) if *existing == summary => return Ok(()),
            Some(existing) => *existing = summary,
            None => index.push(summary),
        }
        self.write_index(&index).await
    }

    /// Unindex and delete `id`. Returns whether it was indexed.
    pub async fn remove(&self, id: &str) -> Result<bool, LibraryError> {
        let _guard = self.lock().await;
        let mut index = self.read_index().await?.unwrap_or_default();
        let before = index.len();
        index.retain(|s| s.id != id);
        if index.len() == before {
            debug!(kind = E::KIND, id, "not indexed, nothing removed");
            return Ok(false);
        }

        self.write_index(&index).await?;
        self.store.remove(id).await?;
        debug!(kind = E::KIND, id, "removed");
        Ok(true)
    }

    /// Drop index entries whose detail record is missing or unreadable.
    ///
    /// Returns the number of entries dropped.
    pub async fn reconcile(&self) -> Result<usize, LibraryError> {
        let _guard = self.lock().await;
        let index = self.read_index().await?.unwrap_or_default();

        let mut kept = Vec::with_capacity(index.len());
        for summary in index.iter() {
            if self.get(&summary.id).await?.is_some() {
                kept.push(summary.clone());
            } else {
                warn!(kind = E::KIND, id = %summary.id, "dropping dangling index entry");
            }
        }

        let dropped = index.len() - kept.len();
        if dropped > 0 {
            self.write_index(&kept).await?;
        }
        Ok(dropped)
    }
}

impl<S: KvStore, E: ItemCollection> Manager<S, E> {
    /// Create a new entity with a fresh id and add it to the master index.
    pub async fn create(
        &self,
        name: &str,
        items: Vec<String>,
        extra: E::Extra,
    ) -> Result<E, LibraryError> {
        self.create_with_id(generate_id(), name, items, extra).await
    }

    pub(super) async fn create_with_id(
        &self,
        id: String,
        name: &str,
        items: Vec<String>,
        extra: E::Extra,
    ) -> Result<E, LibraryError> {
        let entity = E::build(id, name.to_string(), dedup(items), extra);

        let _guard = self.lock().await;
        self.write_record(&entity).await?;
        let mut index = self.read_index().await?.unwrap_or_default();
        index.retain(|s| s.id != entity.id());
        index.push(entity.summary());
        self.write_index(&index).await?;

        info!(kind = E::KIND, id = entity.id(), name, "created");
        Ok(entity)
    }

    /// Append every item not already present. Returns the updated entity.
    pub async fn add_items(&self, id: &str, items: &[String]) -> Result<E, LibraryError> {
        let _guard = self.lock().await;
        let mut entity = self.require(id).await?;
        let list = entity.items_mut();
        for item in items {
            if !list.contains(item) {
                list.push(item.clone());
            }
        }
        self.write_record(&entity).await?;
        Ok(entity)
    }

    /// Drop the given items, keeping the order of the rest.
    pub async fn remove_items(&self, id: &str, items: &[String]) -> Result<E, LibraryError> {
        let _guard = self.lock().await;
        let mut entity = self.require(id).await?;
        entity.items_mut().retain(|item| !items.contains(item));
        self.write_record(&entity).await?;
        Ok(entity)
    }

    /// Item ids of `id`; empty when it is not indexed, missing or malformed.
    pub async fn get_items(&self, id: &str) -> Result<Vec<String>, LibraryError> {
        match self.require(id).await {
            Ok(entity) => Ok(entity.items().to_vec()),
            Err(LibraryError::NotFound { .. }) => {
                error!(kind = E::KIND, id, "not found or invalid structure");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Rename both the record and its index entry.
    pub async fn rename(&self, id: &str, name: &str) -> Result<E, LibraryError> {
        let _guard = self.lock().await;
        let mut entity = self.require(id).await?;
        entity.set_name(name.to_string());
        self.put_locked(&entity).await?;
        Ok(entity)
    }
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
