//! Local music library: scanned tracks, playlists and albums persisted in a
//! key-value store, artist metadata from a remote search API, and a playback
//! queue over rodio.

pub mod audio;
pub mod collections;
pub mod config;
pub mod enrich;
pub mod library;
pub mod store;
