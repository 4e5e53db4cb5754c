//! Playback queue and audio output.
//!
//! [`QueueController`] owns the queue and the playback state machine; it
//! drives a [`PlaybackBackend`], which is [`RodioBackend`] at runtime and a
//! recording fake in tests.

mod backend;
mod queue;
mod types;

pub use backend::{PlaybackBackend, RodioBackend};
pub use queue::QueueController;
pub use types::{AudioError, PlaybackState, QueueSource};

#[cfg(test)]
mod tests;
