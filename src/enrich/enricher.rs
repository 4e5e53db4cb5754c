use tracing::{debug, info, warn};

use crate::collections::{Library, LibraryError};
use crate::config::EnrichmentSettings;
use crate::library::Track;
use crate::store::KvStore;

use super::parse::parse_title_artist;
use super::settings::ApiSettings;
use super::source::{ArtistHit, MetadataSource};

/// Artist and image written back into a track record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMetadata {
    pub artist: String,
    pub image_url: String,
}

impl From<ArtistHit> for TrackMetadata {
    fn from(hit: ArtistHit) -> Self {
        Self {
            artist: hit.name,
            image_url: hit.image_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// A search returned a hit.
    Found(TrackMetadata),
    /// Every search came back empty; carries the placeholder.
    Missed(TrackMetadata),
    /// A search failed (network, status, parse); carries the placeholder.
    Failed(TrackMetadata),
}

impl LookupOutcome {
    pub fn metadata(&self) -> &TrackMetadata {
        match self {
            Self::Found(m) | Self::Missed(m) | Self::Failed(m) => m,
        }
    }
}

/// Title/artist lookups against one [`MetadataSource`] with one token.
pub struct Enricher<'a, M> {
    source: &'a M,
    token: String,
    placeholder: TrackMetadata,
}

impl<'a, M: MetadataSource> Enricher<'a, M> {
    pub fn new(source: &'a M, token: impl Into<String>, settings: &EnrichmentSettings) -> Self {
        Self {
            source,
            token: token.into(),
            placeholder: TrackMetadata {
                artist: settings.placeholder_artist.clone(),
                image_url: settings.placeholder_image_url.clone(),
            },
        }
    }

    /// Search by title, then by artist; the first hit wins.
    pub async fn lookup(&self, title: &str, artist: &str) -> LookupOutcome {
        let title = title.trim();
        let artist = artist.trim();

        let mut queries = Vec::with_capacity(2);
        if !title.is_empty() {
            queries.push(title);
        }
        if !artist.is_empty() && artist != title {
            queries.push(artist);
        }

        for query in queries {
            match self.source.search(query, &self.token).await {
                Ok(Some(hit)) => {
                    debug!(query, artist = %hit.name, "metadata hit");
                    return LookupOutcome::Found(hit.into());
                }
                Ok(None) => debug!(query, "no metadata hit"),
                Err(e) => {
                    warn!(query, error = %e, "metadata lookup failed");
                    return LookupOutcome::Failed(self.placeholder.clone());
                }
            }
        }

        warn!(title, artist, "no track found");
        LookupOutcome::Missed(self.placeholder.clone())
    }
}

/// Counters from one [`enrich_library`] pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EnrichReport {
    pub enriched: usize,
    /// Tracks skipped because they already carry an image URL.
    pub cached: usize,
    pub failed: usize,
    /// The pass did nothing because the API is off or has no token.
    pub api_disabled: bool,
}

/// Search terms for a track: tags first, then the filename.
///
/// A stored artist equal to `placeholder_artist` was written by an earlier
/// miss, so it is never searched for.
pub fn query_terms(track: &Track, placeholder_artist: &str) -> (String, String) {
    let (parsed_title, parsed_artist) = parse_title_artist(&track.filename);
    let title = track
        .title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(parsed_title);
    let stored = track.artist.trim();
    let artist = if stored.is_empty() || stored == placeholder_artist.trim() {
        parsed_artist.unwrap_or_default()
    } else {
        track.artist.clone()
    };
    (title, artist)
}

/// Fill artist and image for every track that has no cached metadata yet.
pub async fn enrich_library<S, M>(
    library: &Library<S>,
    source: &M,
    settings: &EnrichmentSettings,
) -> Result<EnrichReport, LibraryError>
where
    S: KvStore,
    M: MetadataSource,
{
    let mut report = EnrichReport::default();

    let api = ApiSettings::load(library.store()).await?;
    let Some(token) = api.usable_token() else {
        info!(enabled = api.enabled, "metadata API disabled or missing token, skipping enrichment");
        report.api_disabled = true;
        return Ok(report);
    };
    let enricher = Enricher::new(source, token, settings);

    for mut track in library.tracks.all().await? {
        if track.has_cached_metadata() {
            report.cached += 1;
            continue;
        }

        let (title, artist) = query_terms(&track, &settings.placeholder_artist);
        let metadata = match enricher.lookup(&title, &artist).await {
            LookupOutcome::Failed(_) => {
                report.failed += 1;
                continue;
            }
            LookupOutcome::Found(found) => found,
            LookupOutcome::Missed(placeholder) => TrackMetadata {
                // a tagged artist beats the placeholder
                artist: if track.artist.trim().is_empty() {
                    placeholder.artist
                } else {
                    track.artist.clone()
                },
                image_url: placeholder.image_url,
            },
        };

        track.artist = metadata.artist;
        track.image_url = Some(metadata.image_url);
        library.tracks.update(&track).await?;
        report.enriched += 1;
    }

    info!(
        enriched = report.enriched,
        cached = report.cached,
        failed = report.failed,
        "enrichment finished"
    );
    Ok(report)
}
