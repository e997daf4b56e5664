//! # Audio Pool
//!
//! Pooled audio playback for frame-driven game engines.
//!
//! ## Features
//!
//! - **Playback slots**: one clip per slot, with optional fade-out on stop
//! - **Background music dedup**: asking for a clip that is already playing
//!   as music returns the existing slot
//! - **Sound effects**: fire-and-forget slots, reclaimed by the pool
//! - **Sweeping**: finished slots are destroyed once per sweep interval
//! - **Backends**: rodio output (feature `rodio`) or a headless backend
//!
//! ## Quick Start
//!
//! ```rust
//! use audio_pool::prelude::*;
//!
//! let mut backend = HeadlessBackend::new();
//! backend.initialize(&AudioBackendConfig::default())?;
//! let mut pool = PlaybackPool::new(&PoolConfig::default(), backend);
//!
//! let theme = AudioClip::from_bytes("theme", b"RIFF....WAVE")?;
//! let music = pool.play_background_music(&theme)?;
//! assert_eq!(pool.play_background_music(&theme)?, music);
//!
//! pool.stop(music, 0.0)?;
//! pool.update(1.0 / 60.0);
//! assert!(!pool.is_playing(music));
//! # Ok::<(), AudioError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod audio;
pub mod config;
pub mod foundation;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        audio::{
            AudioBackend, AudioBackendConfig, AudioClip, AudioError, FadeCurve, PlaybackPool,
            PlaybackSlot, SlotHandle, SlotHost, SlotTemplate,
            backend::HeadlessBackend,
        },
        config::{Config, ConfigError, PoolConfig},
        foundation::time::FrameClock,
    };
}
