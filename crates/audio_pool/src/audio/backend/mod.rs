//! Audio backend implementations
//!
//! Platform-independent abstraction over audio output. Slots only ever talk
//! to an [`AudioBackend`]; decoding and mixing stay on the backend side.

pub mod headless;
#[cfg(feature = "rodio")]
pub mod rodio_backend;

pub use headless::HeadlessBackend;
#[cfg(feature = "rodio")]
pub use rodio_backend::RodioBackend;

use crate::audio::{AudioClip, AudioError};
use serde::{Deserialize, Serialize};

/// Sound handle for tracking active sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle {
    /// Unique identifier for the sound
    pub id: u32,
}

impl SoundHandle {
    /// Create a new sound handle
    pub fn new(id: u32) -> Self {
        Self { id }
    }
}

/// Audio backend trait for platform abstraction
///
/// Not `Send + Sync`: the pool and its backend live on the frame thread.
pub trait AudioBackend {
    /// Initialize the audio backend
    fn initialize(&mut self, config: &AudioBackendConfig) -> Result<(), AudioError>;

    /// Shutdown the audio backend
    fn shutdown(&mut self);

    /// Check if backend is initialized
    fn is_initialized(&self) -> bool;

    /// Advance one frame (cleanup finished sounds, etc.)
    fn update(&mut self, delta_time: f32);

    /// Stop all playing sounds
    fn stop_all(&mut self);

    /// Start playing a clip at the given volume
    fn play_clip(&mut self, clip: &AudioClip, volume: f32) -> Result<SoundHandle, AudioError>;

    /// Stop a sound. Succeeds for handles that already finished.
    fn stop(&mut self, handle: SoundHandle) -> Result<(), AudioError>;

    /// Set volume of a sound
    fn set_volume(&mut self, handle: SoundHandle, volume: f32) -> Result<(), AudioError>;

    /// Get volume of a sound
    fn get_volume(&self, handle: SoundHandle) -> Result<f32, AudioError>;

    /// Check if a sound is still producing output
    fn is_playing(&self, handle: SoundHandle) -> bool;
}

/// Configuration for audio backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioBackendConfig {
    /// Sample rate (e.g., 44100, 48000)
    pub sample_rate: u32,
    /// Number of output channels (1=mono, 2=stereo)
    pub channels: u16,
}

impl Default for AudioBackendConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 2,
        }
    }
}
