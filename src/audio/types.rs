//! Small audio types: playback state, queue sources and errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing loaded.
    #[default]
    Idle,
    /// A track is loaded but has not started.
    Loaded,
    Playing,
    Paused,
}

impl PlaybackState {
    /// Whether a track is held by the backend.
    pub fn is_loaded(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Where [`QueueController::set_queue_from`](super::QueueController::set_queue_from)
/// takes its tracks from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueSource {
    /// Every indexed track.
    All,
    Playlist(String),
    Album(String),
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    Device(String),

    #[error("track URI is not a local file: {0}")]
    InvalidUri(String),

    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("queue index {index} out of range (queue has {len} tracks)")]
    IndexOutOfRange { index: usize, len: usize },
}
