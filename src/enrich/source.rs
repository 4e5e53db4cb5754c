//! Remote song-search API.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::config::EnrichmentSettings;

use super::EnrichError;

/// Primary artist of the first search hit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArtistHit {
    pub name: String,
    #[serde(default)]
    pub image_url: String,
}

/// Something that can answer "who performs this?" for a free-text query.
pub trait MetadataSource: Send + Sync {
    /// First matching artist for `query`, or `None` when nothing matched.
    fn search(
        &self,
        query: &str,
        token: &str,
    ) -> impl Future<Output = Result<Option<ArtistHit>, EnrichError>> + Send;
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    response: SearchBody,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    result: SearchResult,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    primary_artist: ArtistHit,
}

impl SearchResponse {
    pub(crate) fn into_first_artist(self) -> Option<ArtistHit> {
        self.response
            .hits
            .into_iter()
            .next()
            .map(|hit| hit.result.primary_artist)
    }
}

/// Bearer-authenticated `GET {base_url}/search?q=...` client.
#[derive(Debug, Clone)]
pub struct GeniusClient {
    client: Client,
    base_url: String,
}

impl GeniusClient {
    pub fn new(settings: &EnrichmentSettings) -> Result<Self, EnrichError> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl MetadataSource for GeniusClient {
    async fn search(&self, query: &str, token: &str) -> Result<Option<ArtistHit>, EnrichError> {
        let url = format!("{}/search", self.base_url);
        tracing::debug!(query, "metadata search started");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?;
        let body: SearchResponse = response.json().await?;

        let hit = body.into_first_artist();
        tracing::debug!(query, found = hit.is_some(), "metadata search finished");
        Ok(hit)
    }
}
