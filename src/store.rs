//! Key-value persistence.
//!
//! Every record lives under a plain string key and is stored as JSON text.
//! The entity managers only talk to the [`KvStore`] trait, so the backing
//! implementation can be swapped: [`JsonFileStore`] keeps everything in one
//! JSON object on disk, [`MemoryStore`] is used by tests.

mod file;
mod memory;

use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Async string-keyed storage.
pub trait KvStore: Send + Sync {
    /// Raw value stored under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn keys(&self) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send;

    /// Read and decode the JSON value under `key`.
    fn get_json<T>(&self, key: &str) -> impl Future<Output = Result<Option<T>, StoreError>> + Send
    where
        T: DeserializeOwned + Send,
    {
        async move {
            match self.get(key).await? {
                Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
                None => Ok(None),
            }
        }
    }

    /// Encode `value` as JSON and store it under `key`.
    fn set_json<T>(&self, key: &str, value: &T) -> impl Future<Output = Result<(), StoreError>> + Send
    where
        T: Serialize + ?Sized,
    {
        let encoded = serde_json::to_string(value);
        async move { self.set(key, encoded?).await }
    }
}

#[cfg(test)]
mod tests;
