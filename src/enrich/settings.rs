use tracing::warn;

use crate::store::{KvStore, StoreError};

pub const API_ENABLED_KEY: &str = "apiEnabled";
pub const API_TOKEN_KEY: &str = "apiCode";

/// User-controlled switch and bearer token for the metadata API.
///
/// Persisted in the store next to the library, not in the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiSettings {
    pub enabled: bool,
    pub token: String,
}

impl ApiSettings {
    pub async fn load<S: KvStore>(store: &S) -> Result<Self, StoreError> {
        let enabled = read_string(store, API_ENABLED_KEY).await?;
        let token = read_string(store, API_TOKEN_KEY).await?;
        Ok(Self {
            enabled: enabled.as_deref() == Some("1"),
            token: token.unwrap_or_default(),
        })
    }

    pub async fn save<S: KvStore>(&self, store: &S) -> Result<(), StoreError> {
        let flag = if self.enabled { "1" } else { "0" };
        store.set_json(API_ENABLED_KEY, flag).await?;
        store.set_json(API_TOKEN_KEY, &self.token).await
    }

    /// The token, when the API is switched on and a token is set.
    pub fn usable_token(&self) -> Option<&str> {
        let token = self.token.trim();
        (self.enabled && !token.is_empty()).then_some(token)
    }
}

async fn read_string<S: KvStore>(store: &S, key: &str) -> Result<Option<String>, StoreError> {
    match store.get_json::<String>(key).await {
        Ok(value) => Ok(value),
        Err(StoreError::Json(e)) => {
            warn!(key, error = %e, "ignoring malformed API setting");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
