//! Headless audio backend
//!
//! Tracks sounds without an output device. Playback time advances on
//! [`AudioBackend::update`]; a sound whose clip has a known duration finishes
//! once that much time has passed. Clips without a duration play until stopped.

use super::{AudioBackend, AudioBackendConfig, SoundHandle};
use crate::audio::{AudioClip, AudioError};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct HeadlessSound {
    clip_name: String,
    position: f32,
    duration: Option<f32>,
    volume: f32,
}

impl HeadlessSound {
    fn finished(&self) -> bool {
        self.duration.is_some_and(|duration| self.position >= duration)
    }
}

/// Device-free backend
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    sounds: HashMap<SoundHandle, HeadlessSound>,
    next_id: u32,
    started: usize,
    initialized: bool,
}

impl HeadlessBackend {
    /// Create a new headless backend
    pub fn new() -> Self {
        Self::default()
    }

    fn next_handle(&mut self) -> SoundHandle {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        SoundHandle::new(id)
    }

    /// Total number of sounds started since creation
    pub fn started_count(&self) -> usize {
        self.started
    }

    /// Number of sounds currently tracked
    pub fn active_count(&self) -> usize {
        self.sounds.len()
    }

    /// Seconds a sound has been playing
    pub fn position(&self, handle: SoundHandle) -> Option<f32> {
        self.sounds.get(&handle).map(|sound| sound.position)
    }

    /// Name of the clip behind a sound
    pub fn clip_name(&self, handle: SoundHandle) -> Option<&str> {
        self.sounds.get(&handle).map(|sound| sound.clip_name.as_str())
    }

    /// End a sound as if its clip ran out
    pub fn finish(&mut self, handle: SoundHandle) {
        if let Some(sound) = self.sounds.get_mut(&handle) {
            sound.duration = Some(sound.position);
        }
    }
}

impl AudioBackend for HeadlessBackend {
    fn initialize(&mut self, config: &AudioBackendConfig) -> Result<(), AudioError> {
        if self.initialized {
            return Ok(());
        }
        self.initialized = true;
        log::info!(
            "Headless audio backend initialized ({} Hz, {} channels)",
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
        self.initialized = false;
        log::info!("Headless audio backend shutdown");
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn update(&mut self, delta_time: f32) {
        for sound in self.sounds.values_mut() {
            sound.position += delta_time;
        }
        self.sounds.retain(|_handle, sound| !sound.finished());
    }

    fn stop_all(&mut self) {
        self.sounds.clear();
    }

    fn play_clip(&mut self, clip: &AudioClip, volume: f32) -> Result<SoundHandle, AudioError> {
        if !self.initialized {
            return Err(AudioError::BackendNotInitialized);
        }

        let handle = self.next_handle();
        self.sounds.insert(
            handle,
            HeadlessSound {
                clip_name: clip.name().to_owned(),
                position: 0.0,
                duration: clip.duration(),
                volume,
            },
        );
        self.started += 1;
        Ok(handle)
    }

    fn stop(&mut self, handle: SoundHandle) -> Result<(), AudioError> {
        self.sounds.remove(&handle);
        Ok(())
    }

    fn set_volume(&mut self, handle: SoundHandle, volume: f32) -> Result<(), AudioError> {
        let sound = self.sounds.get_mut(&handle).ok_or(AudioError::InvalidHandle)?;
        sound.volume = volume;
        Ok(())
    }

    fn get_volume(&self, handle: SoundHandle) -> Result<f32, AudioError> {
        self.sounds
            .get(&handle)
            .map(|sound| sound.volume)
            .ok_or(AudioError::InvalidHandle)
    }

    fn is_playing(&self, handle: SoundHandle) -> bool {
        self.sounds.get(&handle).is_some_and(|sound| !sound.finished())
    }
}
