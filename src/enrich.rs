//! Metadata enrichment.
//!
//! Tracks start out with whatever the scan found. Enrichment asks a remote
//! song-search API for the performing artist and an artist image, and writes
//! the answer back into the track record. A non-empty `imageUrl` marks a track
//! as done, so each track is looked up at most once.

mod enricher;
mod lyrics;
mod parse;
mod settings;
mod source;

use thiserror::Error;

use crate::store::StoreError;

pub use enricher::{
    EnrichReport, Enricher, LookupOutcome, TrackMetadata, enrich_library, query_terms,
};
pub use lyrics::{LYRICS_KEY_PREFIX, LyricsOvhClient, LyricsSource, clear_lyrics, lyrics_for};
pub use parse::{parse_title_artist, split_artist_title};
pub use settings::{API_ENABLED_KEY, API_TOKEN_KEY, ApiSettings};
pub use source::{ArtistHit, GeniusClient, MetadataSource};

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("invalid filename {0:?}: expected \"Artist - Title\"")]
    InvalidFilename(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}
