//! Playback pool
//!
//! Owns every slot it spawns. Background music is deduplicated by clip and
//! tracked in spawn order; effects are fire-and-forget for callers. Finished
//! slots are reclaimed by a sweep that runs once per sweep interval, so a slot
//! that stops lingers (idle) until the next sweep.

use crate::audio::backend::AudioBackend;
use crate::audio::slot::{PlaybackSlot, SlotTemplate};
use crate::audio::{AudioClip, AudioError, FadeCurve, BGM_CATEGORY, EFFECT_CATEGORY};
use crate::config::PoolConfig;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Handle to a slot owned by a [`PlaybackPool`]
    pub struct SlotHandle;
}

/// Engine integration for slot objects
///
/// The pool asks the host to build new slots and hands finished ones back
/// for destruction.
pub trait SlotHost {
    /// Build a new idle slot from the pool's template
    fn instantiate(&mut self, template: &SlotTemplate) -> PlaybackSlot {
        PlaybackSlot::from_template(template)
    }

    /// Dispose of a slot the pool no longer owns
    fn destroy(&mut self, handle: SlotHandle, slot: PlaybackSlot);
}

/// Default host: builds slots from the template and logs their destruction
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHost;

impl SlotHost for LoggingHost {
    fn destroy(&mut self, handle: SlotHandle, slot: PlaybackSlot) {
        log::trace!("Destroyed slot {:?} ({:?})", handle, slot.category());
    }
}

/// Pool of playback slots
pub struct PlaybackPool<B: AudioBackend, H: SlotHost = LoggingHost> {
    backend: B,
    host: H,
    template: SlotTemplate,
    slots: SlotMap<SlotHandle, PlaybackSlot>,
    /// Tracked background music, in spawn order
    music: Vec<SlotHandle>,
    effects: Vec<SlotHandle>,
    sweep_interval: f32,
    since_sweep: f32,
}

impl<B: AudioBackend> PlaybackPool<B, LoggingHost> {
    /// Create a pool with the default host
    pub fn new(config: &PoolConfig, backend: B) -> Self {
        Self::with_host(config, backend, LoggingHost)
    }
}

impl<B: AudioBackend, H: SlotHost> PlaybackPool<B, H> {
    /// Create a pool with a custom host
    pub fn with_host(config: &PoolConfig, backend: B, host: H) -> Self {
        let template = config.slot_template();
        if template.fade_curve == FadeCurve::Legacy {
            log::warn!(
                "Playback pool using legacy fade curve: fades are silent from their first frame"
            );
        }

        Self {
            backend,
            host,
            template,
            slots: SlotMap::with_key(),
            music: Vec::new(),
            effects: Vec::new(),
            sweep_interval: config.sweep_interval(),
            since_sweep: 0.0,
        }
    }

    /// Play a clip as background music
    ///
    /// Returns the tracked slot already holding this clip if there is one;
    /// no new playback is started in that case.
    ///
    /// # Errors
    /// Any backend error from starting output. The new slot is handed back
    /// to the host and nothing is tracked.
    pub fn play_background_music(&mut self, clip: &AudioClip) -> Result<SlotHandle, AudioError> {
        if let Some(handle) = self.find_music(clip) {
            log::debug!("Background music '{}' already playing", clip.name());
            return Ok(handle);
        }

        let handle = self.spawn(clip, BGM_CATEGORY)?;
        self.music.push(handle);
        Ok(handle)
    }

    /// Play a clip as a sound effect
    ///
    /// Always starts a new slot. The slot is never part of
    /// [`music_slots`](Self::music_slots); the pool still reclaims it.
    ///
    /// # Errors
    /// Any backend error from starting output. The new slot is handed back
    /// to the host and nothing is tracked.
    pub fn play_effect(&mut self, clip: &AudioClip) -> Result<SlotHandle, AudioError> {
        let handle = self.spawn(clip, EFFECT_CATEGORY)?;
        self.effects.push(handle);
        Ok(handle)
    }

    fn find_music(&self, clip: &AudioClip) -> Option<SlotHandle> {
        self.music.iter().copied().find(|&handle| {
            self.slots.get(handle).is_some_and(|slot| {
                slot.clip() == Some(clip) && slot.category() == Some(BGM_CATEGORY)
            })
        })
    }

    fn spawn(&mut self, clip: &AudioClip, category: &str) -> Result<SlotHandle, AudioError> {
        let slot = self.host.instantiate(&self.template);
        let handle = self.slots.insert(slot);

        if let Err(e) = self.slots[handle].play(clip, Some(category), &mut self.backend) {
            log::warn!("Failed to play '{}' as {}: {}", clip.name(), category, e);
            if let Some(slot) = self.slots.remove(handle) {
                self.host.destroy(handle, slot);
            }
            return Err(e);
        }

        Ok(handle)
    }

    /// Request a stop on a slot, fading over `fade_secs`
    ///
    /// # Errors
    /// `InvalidHandle` if the slot has already been reclaimed.
    pub fn stop(&mut self, handle: SlotHandle, fade_secs: f32) -> Result<(), AudioError> {
        let slot = self.slots.get_mut(handle).ok_or(AudioError::InvalidHandle)?;
        slot.stop(fade_secs);
        Ok(())
    }

    /// Request a stop on every slot
    pub fn stop_all(&mut self, fade_secs: f32) {
        for (_, slot) in &mut self.slots {
            slot.stop(fade_secs);
        }
    }

    /// Advance all slots by one frame and run the sweep when it is due
    pub fn update(&mut self, delta_time: f32) {
        self.backend.update(delta_time);

        for (_, slot) in &mut self.slots {
            slot.tick(delta_time, &mut self.backend);
        }

        self.since_sweep += delta_time;
        if self.since_sweep >= self.sweep_interval {
            self.sweep();
            self.since_sweep = 0.0;
        }
    }

    /// Reclaim every slot that has stopped playing
    ///
    /// Returns the number of slots destroyed.
    pub fn sweep(&mut self) -> usize {
        let garbage: Vec<SlotHandle> = self
            .music
            .iter()
            .chain(&self.effects)
            .copied()
            .filter(|&handle| self.slots.get(handle).map_or(true, |slot| !slot.is_playing()))
            .collect();

        if garbage.is_empty() {
            return 0;
        }

        self.music.retain(|handle| !garbage.contains(handle));
        self.effects.retain(|handle| !garbage.contains(handle));

        for &handle in &garbage {
            if let Some(slot) = self.slots.remove(handle) {
                self.host.destroy(handle, slot);
            }
        }

        log::debug!("Swept {} finished slot(s)", garbage.len());
        garbage.len()
    }

    /// Slot behind a handle, until it is swept
    pub fn slot(&self, handle: SlotHandle) -> Option<&PlaybackSlot> {
        self.slots.get(handle)
    }

    /// Whether a slot exists and is still playing
    pub fn is_playing(&self, handle: SlotHandle) -> bool {
        self.slots.get(handle).is_some_and(PlaybackSlot::is_playing)
    }

    /// Tracked background music slots, in spawn order
    pub fn music_slots(&self) -> impl Iterator<Item = (SlotHandle, &PlaybackSlot)> + '_ {
        self.music
            .iter()
            .filter_map(|&handle| self.slots.get(handle).map(|slot| (handle, slot)))
    }

    /// Handles of tracked background music slots
    pub fn music_handles(&self) -> &[SlotHandle] {
        &self.music
    }

    /// Number of slots owned by the pool, finished or not
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots still playing
    pub fn active_count(&self) -> usize {
        self.slots.values().filter(|slot| slot.is_playing()).count()
    }

    /// Seconds between sweeps
    pub fn sweep_interval(&self) -> f32 {
        self.sweep_interval
    }

    /// Template new slots are built from
    pub fn template(&self) -> &SlotTemplate {
        &self.template
    }

    /// Audio backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable audio backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Slot host
    pub fn host(&self) -> &H {
        &self.host
    }
}
