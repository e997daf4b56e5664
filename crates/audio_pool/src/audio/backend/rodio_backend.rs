//! Rodio audio backend implementation
//!
//! Uses the Rodio library for cross-platform audio playback.
//! Rodio is pure Rust and supports WAV, OGG Vorbis, MP3, and FLAC formats.
//! Each sound gets its own [`Sink`] so slots can fade independently.
//!
//! # Example
//!
//! ```no_run
//! use audio_pool::audio::{AudioBackend, AudioBackendConfig, AudioClip};
//! use audio_pool::audio::backend::RodioBackend;
//!
//! let mut backend = RodioBackend::new();
//! backend.initialize(&AudioBackendConfig::default()).unwrap();
//!
//! let clip = AudioClip::from_file("resources/audio/theme.ogg").unwrap();
//! let handle = backend.play_clip(&clip, 0.8).unwrap();
//!
//! if backend.is_playing(handle) {
//!     println!("Sound is playing!");
//! }
//! backend.shutdown();
//! ```

use super::{AudioBackend, AudioBackendConfig, SoundHandle};
use crate::audio::{AudioClip, AudioError};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::collections::HashMap;
use std::io::Cursor;

/// Rodio-based audio backend
pub struct RodioBackend {
    /// Audio output stream (must be kept alive)
    _output_stream: Option<OutputStream>,
    /// Output stream handle for creating sinks
    stream_handle: Option<OutputStreamHandle>,
    /// Active sound sinks
    active_sounds: HashMap<SoundHandle, Sink>,
    /// Next sound ID to hand out
    next_id: u32,
    /// Initialization state
    initialized: bool,
}

impl RodioBackend {
    /// Create a new Rodio backend
    pub fn new() -> Self {
        Self {
            _output_stream: None,
            stream_handle: None,
            active_sounds: HashMap::new(),
            next_id: 0,
            initialized: false,
        }
    }

    fn next_handle(&mut self) -> SoundHandle {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        SoundHandle::new(id)
    }
}

impl AudioBackend for RodioBackend {
    fn initialize(&mut self, config: &AudioBackendConfig) -> Result<(), AudioError> {
        if self.initialized {
            return Ok(());
        }

        // Rodio negotiates the device format itself; the config is advisory
        let (stream, stream_handle) = OutputStream::try_default().map_err(|e| {
            AudioError::BackendInitFailed(format!("Failed to create audio output: {e}"))
        })?;

        self._output_stream = Some(stream);
        self.stream_handle = Some(stream_handle);
        self.initialized = true;

        log::info!(
            "Rodio audio backend initialized (requested {} Hz, {} channels)",
            config.sample_rate,
            config.channels
        );
        Ok(())
    }

    fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }

        self.stop_all();
        self.stream_handle = None;
        self._output_stream = None;
        self.initialized = false;

        log::info!("Rodio audio backend shutdown");
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn update(&mut self, _delta_time: f32) {
        self.active_sounds.retain(|_handle, sink| !sink.empty());
    }

    fn stop_all(&mut self) {
        for (_handle, sink) in self.active_sounds.drain() {
            sink.stop();
        }
    }

    fn play_clip(&mut self, clip: &AudioClip, volume: f32) -> Result<SoundHandle, AudioError> {
        let stream_handle = self.stream_handle.as_ref().ok_or(AudioError::BackendNotInitialized)?;

        let sink = Sink::try_new(stream_handle)
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to create sink: {e}")))?;

        let source = Decoder::new(Cursor::new(clip.shared_data())).map_err(|e| {
            AudioError::PlaybackFailed(format!("Failed to decode '{}': {e}", clip.name()))
        })?;

        sink.set_volume(volume);
        sink.append(source);

        let handle = self.next_handle();
        self.active_sounds.insert(handle, sink);
        Ok(handle)
    }

    fn stop(&mut self, handle: SoundHandle) -> Result<(), AudioError> {
        if let Some(sink) = self.active_sounds.remove(&handle) {
            sink.stop();
        }
        Ok(())
    }

    fn set_volume(&mut self, handle: SoundHandle, volume: f32) -> Result<(), AudioError> {
        let sink = self.active_sounds.get(&handle).ok_or(AudioError::InvalidHandle)?;
        sink.set_volume(volume);
        Ok(())
    }

    fn get_volume(&self, handle: SoundHandle) -> Result<f32, AudioError> {
        let sink = self.active_sounds.get(&handle).ok_or(AudioError::InvalidHandle)?;
        Ok(sink.volume())
    }

    fn is_playing(&self, handle: SoundHandle) -> bool {
        self.active_sounds.get(&handle).is_some_and(|sink| !sink.empty())
    }
}

impl Default for RodioBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        self.shutdown();
    }
}
