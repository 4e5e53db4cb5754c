//! Audio output behind a small trait.
//!
//! The rodio implementation opens the file behind a `file://` URI, decodes it
//! and prepares a paused `Sink` on the default output stream.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
use tracing::debug;
use url::Url;

use crate::library::Track;

use super::types::AudioError;

/// One loaded track at a time.
pub trait PlaybackBackend {
    /// Load `track` paused. Any previous track must have been unloaded.
    fn load(&mut self, track: &Track) -> Result<(), AudioError>;

    fn play(&mut self);

    fn pause(&mut self);

    /// Release the loaded track. Unloading with nothing loaded is a no-op.
    fn unload(&mut self) -> Result<(), AudioError>;

    /// The loaded track has played to the end.
    fn is_finished(&self) -> bool;
}

pub struct RodioBackend {
    stream: OutputStream,
    sink: Option<Sink>,
}

impl RodioBackend {
    pub fn open_default() -> Result<Self, AudioError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| AudioError::Device(e.to_string()))?;
        // rodio prints to stderr when the stream is dropped
        stream.log_on_drop(false);
        Ok(Self { stream, sink: None })
    }
}

fn track_path(track: &Track) -> Result<PathBuf, AudioError> {
    Url::parse(&track.uri)
        .ok()
        .filter(|url| url.scheme() == "file")
        .and_then(|url| url.to_file_path().ok())
        .ok_or_else(|| AudioError::InvalidUri(track.uri.clone()))
}

fn create_sink(stream: &OutputStream, path: &Path) -> Result<Sink, AudioError> {
    let file = File::open(path).map_err(|source| AudioError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let source = Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}

impl PlaybackBackend for RodioBackend {
    fn load(&mut self, track: &Track) -> Result<(), AudioError> {
        let path = track_path(track)?;
        let sink = create_sink(&self.stream, &path)?;
        debug!(id = %track.id, path = %path.display(), "track loaded");
        if let Some(old) = self.sink.replace(sink) {
            old.stop();
        }
        Ok(())
    }

    fn play(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn unload(&mut self) -> Result<(), AudioError> {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.sink.as_ref().is_some_and(Sink::empty)
    }
}
