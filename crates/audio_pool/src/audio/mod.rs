//! Audio playback
//!
//! Slots play single clips through an [`AudioBackend`](backend::AudioBackend);
//! the [`PlaybackPool`] spawns them, deduplicates background music and
//! reclaims finished slots on a fixed sweep interval.

pub mod backend;
pub mod clip;
pub mod fade;
pub mod pool;
pub mod slot;

pub use backend::{AudioBackend, AudioBackendConfig, SoundHandle};
pub use clip::{AudioClip, AudioFormat, ClipId};
pub use fade::FadeCurve;
pub use pool::{LoggingHost, PlaybackPool, SlotHandle, SlotHost};
pub use slot::{PlaybackSlot, SlotState, SlotTemplate, IDLE_LABEL};

/// Category tag given to background music slots
pub const BGM_CATEGORY: &str = "BGM";

/// Category tag given to sound effect slots
pub const EFFECT_CATEGORY: &str = "SoundEffect";

/// Audio errors
#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    /// `play` was called on a slot that is still playing
    #[error("Slot is already playing a clip")]
    AlreadyPlaying,

    /// Backend used before `initialize`
    #[error("Audio backend not initialized")]
    BackendNotInitialized,

    /// Backend could not open an output device
    #[error("Audio backend initialization failed: {0}")]
    BackendInitFailed(String),

    /// Backend failed to start a sound
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    /// Handle does not refer to a live sound or slot
    #[error("Invalid handle")]
    InvalidHandle,

    /// Clip data could not be recognised
    #[error("Invalid audio clip: {0}")]
    InvalidClip(String),

    /// IO error while loading a clip
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
