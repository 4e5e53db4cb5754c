use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::collections::{Library, LibraryError};
use crate::library::Track;
use crate::store::KvStore;

use super::backend::PlaybackBackend;
use super::types::{AudioError, PlaybackState, QueueSource};

/// Ordered play queue plus the playback state machine.
///
/// ```text
/// Idle --load--> Loaded --toggle--> Playing <--toggle--> Paused
///   ^                                  |
///   +------ stop / queue emptied ------+
/// ```
///
/// The backend never holds more than one track: the previous one is always
/// released before the next is loaded.
pub struct QueueController<B> {
    backend: B,
    queue: Vec<Track>,
    current: usize,
    state: PlaybackState,
}

impl<B: PlaybackBackend> QueueController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            queue: Vec::new(),
            current: 0,
            state: PlaybackState::Idle,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.queue.get(self.current)
    }

    fn release(&mut self) {
        if let Err(e) = self.backend.unload() {
            warn!(error = %e, "failed to release track, dropping it anyway");
        }
        self.state = PlaybackState::Idle;
    }

    fn check_index(&self, index: usize) -> Result<(), AudioError> {
        if index < self.queue.len() {
            Ok(())
        } else {
            Err(AudioError::IndexOutOfRange {
                index,
                len: self.queue.len(),
            })
        }
    }

    /// Release the current track and load the one at `index`, paused.
    fn load(&mut self, index: usize) -> Result<(), AudioError> {
        self.check_index(index)?;
        self.release();
        self.current = index;
        self.backend.load(&self.queue[index])?;
        self.state = PlaybackState::Loaded;
        Ok(())
    }

    /// Start playing the track at `index`.
    ///
    /// An out-of-range index is an error and leaves the state untouched.
    pub fn play(&mut self, index: usize) -> Result<(), AudioError> {
        self.load(index)?;
        self.backend.play();
        self.state = PlaybackState::Playing;
        info!(index, id = %self.queue[index].id, "playing");
        Ok(())
    }

    /// Playing and Paused swap; Loaded starts playing. Returns the new state.
    pub fn toggle_playback(&mut self) -> PlaybackState {
        match self.state {
            PlaybackState::Playing => {
                self.backend.pause();
                self.state = PlaybackState::Paused;
            }
            PlaybackState::Paused | PlaybackState::Loaded => {
                self.backend.play();
                self.state = PlaybackState::Playing;
            }
            PlaybackState::Idle => debug!("toggle ignored, nothing loaded"),
        }
        self.state
    }

    /// Play the next track, wrapping to the start.
    pub fn skip(&mut self) -> Result<(), AudioError> {
        let len = self.queue.len();
        if len == 0 {
            return Ok(());
        }
        self.play((self.current + 1) % len)
    }

    /// Play the previous track, wrapping to the end.
    pub fn previous(&mut self) -> Result<(), AudioError> {
        let len = self.queue.len();
        if len == 0 {
            return Ok(());
        }
        self.play((self.current + len - 1) % len)
    }

    /// Shuffle the queue in place. The current index is kept as is.
    pub fn shuffle(&mut self) {
        self.queue.shuffle(&mut rand::rng());
        debug!(len = self.queue.len(), "queue shuffled");
    }

    /// Replace the queue, stopping playback. Index goes back to 0.
    pub fn set_queue(&mut self, tracks: Vec<Track>) {
        self.release();
        self.queue = tracks;
        self.current = 0;
        info!(len = self.queue.len(), "queue replaced");
    }

    /// Replace the queue with the tracks of a playlist, an album, or the whole library.
    ///
    /// Ids without a track record are skipped. Returns the new queue length.
    pub async fn set_queue_from<S: KvStore>(
        &mut self,
        library: &Library<S>,
        source: &QueueSource,
    ) -> Result<usize, LibraryError> {
        let tracks = match source {
            QueueSource::All => library.tracks.all().await?,
            QueueSource::Playlist(id) => {
                let ids = library.playlists.get_items(id).await?;
                library.tracks.hydrate(&ids).await?
            }
            QueueSource::Album(id) => {
                let ids = library.albums.get_items(id).await?;
                library.tracks.hydrate(&ids).await?
            }
        };
        self.set_queue(tracks);
        Ok(self.queue.len())
    }

    pub fn add_to_queue(&mut self, track: Track) {
        debug!(id = %track.id, "track queued");
        self.queue.push(track);
    }

    /// Move the entry at `from` to `to`. The index keeps following the current track.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), AudioError> {
        self.check_index(from)?;
        self.check_index(to)?;
        let track = self.queue.remove(from);
        self.queue.insert(to, track);

        if self.current == from {
            self.current = to;
        } else if from < self.current && to >= self.current {
            self.current -= 1;
        } else if from > self.current && to <= self.current {
            self.current += 1;
        }
        Ok(())
    }

    /// Remove every queue entry for `id`. Returns how many were removed.
    ///
    /// Entries before the current one shift the index down. Removing the
    /// current entry moves on to the track that takes its place (wrapping to
    /// the start): a playing queue keeps playing, a paused one is left
    /// loaded. An emptied queue releases the backend and goes idle.
    pub fn remove_from_queue(&mut self, id: &str) -> Result<usize, AudioError> {
        let removed_current = self.current_track().is_some_and(|t| t.id == id);
        let before = self.queue[..self.current.min(self.queue.len())]
            .iter()
            .filter(|t| t.id == id)
            .count();

        let old_len = self.queue.len();
        self.queue.retain(|t| t.id != id);
        let removed = old_len - self.queue.len();
        if removed == 0 {
            return Ok(0);
        }

        if self.queue.is_empty() {
            self.release();
            self.current = 0;
            info!(id, "queue emptied");
            return Ok(removed);
        }

        self.current -= before;
        if !removed_current {
            return Ok(removed);
        }

        if self.current >= self.queue.len() {
            self.current = 0;
        }
        match self.state {
            PlaybackState::Idle => {}
            PlaybackState::Playing => self.play(self.current)?,
            PlaybackState::Loaded | PlaybackState::Paused => self.load(self.current)?,
        }
        Ok(removed)
    }

    /// Stop and release the backend. The index is kept.
    pub fn stop(&mut self) {
        self.release();
        debug!(index = self.current, "stopped");
    }

    /// Auto-advance after the current track ran out.
    pub fn on_track_finished(&mut self) -> Result<(), AudioError> {
        if self.state != PlaybackState::Playing {
            return Ok(());
        }
        debug!(index = self.current, "track finished");
        self.skip()
    }

    /// Ask the backend whether the playing track ran out and advance if so.
    ///
    /// Returns `true` when the queue advanced.
    pub fn tick(&mut self) -> Result<bool, AudioError> {
        if self.state == PlaybackState::Playing && self.backend.is_finished() {
            self.on_track_finished()?;
            return Ok(true);
        }
        Ok(false)
    }
}
