//! Playback slots
//!
//! A [`PlaybackSlot`] plays one clip at a time. Playback is advanced once per
//! frame by [`PlaybackSlot::tick`]; a stop request is only acted on at the
//! next tick, after which the slot either finishes at once or fades out over
//! the requested number of seconds.

use crate::audio::backend::{AudioBackend, SoundHandle};
use crate::audio::{AudioClip, AudioError, FadeCurve};

/// Label carried by a slot with nothing loaded
pub const IDLE_LABEL: &str = "None";

/// Clamp a start volume into the output range; NaN means full volume
fn start_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        1.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

/// Playback state of a slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlotState {
    /// Nothing playing
    Idle,
    /// Clip is playing and no stop has been observed yet
    Playing {
        /// Backend sound driving the output
        sound: SoundHandle,
    },
    /// Stop observed, output is fading
    Terminating {
        /// Backend sound driving the output
        sound: SoundHandle,
        /// Seconds spent fading so far
        elapsed: f32,
        /// Output volume when the fade began
        start_volume: f32,
    },
}

/// Template new slots are instantiated from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotTemplate {
    /// Volume clips start at (0.0 to 1.0)
    pub volume: f32,
    /// Curve used when stopping with a fade
    pub fade_curve: FadeCurve,
}

impl SlotTemplate {
    /// Set the starting volume
    #[must_use]
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = start_volume(volume);
        self
    }

    /// Set the fade-out curve
    #[must_use]
    pub fn with_fade_curve(mut self, fade_curve: FadeCurve) -> Self {
        self.fade_curve = fade_curve;
        self
    }
}

impl Default for SlotTemplate {
    fn default() -> Self {
        Self {
            volume: 1.0,
            fade_curve: FadeCurve::default(),
        }
    }
}

/// Single-clip playback unit
#[derive(Debug, Clone)]
pub struct PlaybackSlot {
    clip: Option<AudioClip>,
    category: Option<String>,
    label: String,
    state: SlotState,
    stop_requested: bool,
    fade_out_secs: f32,
    base_volume: f32,
    fade_curve: FadeCurve,
}

impl PlaybackSlot {
    /// Create an idle slot with default settings
    pub fn new() -> Self {
        Self::from_template(&SlotTemplate::default())
    }

    /// Create an idle slot from a template
    pub fn from_template(template: &SlotTemplate) -> Self {
        Self {
            clip: None,
            category: None,
            label: IDLE_LABEL.to_owned(),
            state: SlotState::Idle,
            stop_requested: false,
            fade_out_secs: 0.0,
            base_volume: start_volume(template.volume),
            fade_curve: template.fade_curve,
        }
    }

    /// Start playing a clip
    ///
    /// # Errors
    /// - `AlreadyPlaying` if the slot has not finished its previous clip
    /// - any backend error from starting output; the slot stays idle
    pub fn play(
        &mut self,
        clip: &AudioClip,
        category: Option<&str>,
        backend: &mut dyn AudioBackend,
    ) -> Result<(), AudioError> {
        if self.is_playing() {
            return Err(AudioError::AlreadyPlaying);
        }

        let sound = backend.play_clip(clip, self.base_volume)?;

        self.clip = Some(clip.clone());
        self.category = category.map(str::to_owned);
        self.label = clip.name().to_owned();
        self.stop_requested = false;
        self.fade_out_secs = 0.0;
        self.state = SlotState::Playing { sound };

        log::debug!("Slot playing '{}' (category {:?})", self.label, self.category);
        Ok(())
    }

    /// Request a stop, fading out over `fade_secs` (0 = immediately)
    ///
    /// Takes effect at the next tick. Ignored when the slot is idle.
    /// A negative or non-finite fade stops immediately.
    pub fn stop(&mut self, fade_secs: f32) {
        if !self.is_playing() {
            return;
        }
        self.fade_out_secs = if fade_secs.is_finite() {
            fade_secs.max(0.0)
        } else {
            0.0
        };
        self.stop_requested = true;
    }

    /// Request a stop without fade
    pub fn stop_now(&mut self) {
        self.stop(0.0);
    }

    /// Advance playback by one frame
    pub fn tick(&mut self, delta_time: f32, backend: &mut dyn AudioBackend) {
        match self.state {
            SlotState::Idle => {}
            SlotState::Playing { sound } => {
                if !self.stop_requested && backend.is_playing(sound) {
                    return;
                }

                if self.fade_out_secs <= 0.0 {
                    self.finish(sound, backend);
                    return;
                }

                let start_volume = backend.get_volume(sound).unwrap_or(self.base_volume);
                self.fade_step(sound, 0.0, start_volume, delta_time, backend);
            }
            SlotState::Terminating {
                sound,
                elapsed,
                start_volume,
            } => {
                if elapsed >= self.fade_out_secs {
                    self.finish(sound, backend);
                } else {
                    self.fade_step(sound, elapsed, start_volume, delta_time, backend);
                }
            }
        }
    }

    fn fade_step(
        &mut self,
        sound: SoundHandle,
        elapsed: f32,
        start_volume: f32,
        delta_time: f32,
        backend: &mut dyn AudioBackend,
    ) {
        let multiplier = self.fade_curve.multiplier(elapsed, self.fade_out_secs);
        let volume = start_volume * multiplier;
        let volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        // The sound may already have run out; the fade still runs its course
        let _ = backend.set_volume(sound, volume);

        self.state = SlotState::Terminating {
            sound,
            elapsed: elapsed + delta_time,
            start_volume,
        };
    }

    fn finish(&mut self, sound: SoundHandle, backend: &mut dyn AudioBackend) {
        if let Err(e) = backend.stop(sound) {
            log::warn!("Failed to stop sound for '{}': {}", self.label, e);
        }

        log::debug!("Slot finished '{}'", self.label);
        self.clip = None;
        self.label = IDLE_LABEL.to_owned();
        self.stop_requested = false;
        self.state = SlotState::Idle;
    }

    /// True from `play` until playback, including any fade, has ended
    pub fn is_playing(&self) -> bool {
        !matches!(self.state, SlotState::Idle)
    }

    /// True while a fade-out is in progress
    pub fn is_fading(&self) -> bool {
        matches!(self.state, SlotState::Terminating { .. })
    }

    /// Clip currently loaded
    pub fn clip(&self) -> Option<&AudioClip> {
        self.clip.as_ref()
    }

    /// Category given to the last `play`
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Clip name while playing, [`IDLE_LABEL`] otherwise
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether a stop is pending or in progress
    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    /// Fade duration of the pending stop
    pub fn fade_out_secs(&self) -> f32 {
        self.fade_out_secs
    }

    /// Current playback state
    pub fn state(&self) -> SlotState {
        self.state
    }

    /// Volume clips start at
    pub fn base_volume(&self) -> f32 {
        self.base_volume
    }
}

impl Default for PlaybackSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::backend::{AudioBackendConfig, HeadlessBackend};
    use approx::assert_relative_eq;

    fn backend() -> HeadlessBackend {
        let mut backend = HeadlessBackend::new();
        backend.initialize(&AudioBackendConfig::default()).unwrap();
        backend
    }

    fn clip(name: &str) -> AudioClip {
        AudioClip::from_bytes(name, b"RIFF....WAVE").unwrap()
    }

    fn sound_of(slot: &PlaybackSlot) -> SoundHandle {
        match slot.state() {
            SlotState::Playing { sound } | SlotState::Terminating { sound, .. } => sound,
            SlotState::Idle => panic!("slot is idle"),
        }
    }

    #[test]
    fn test_new_slot_is_idle() {
        let slot = PlaybackSlot::new();
        assert!(!slot.is_playing());
        assert!(slot.clip().is_none());
        assert_eq!(slot.label(), IDLE_LABEL);
        assert_eq!(slot.state(), SlotState::Idle);
    }

    #[test]
    fn test_play_starts_output() {
        let mut backend = backend();
        let mut slot = PlaybackSlot::new();
        let theme = clip("theme");

        slot.play(&theme, Some("BGM"), &mut backend).unwrap();

        assert!(slot.is_playing());
        assert_eq!(slot.clip(), Some(&theme));
        assert_eq!(slot.category(), Some("BGM"));
        assert_eq!(slot.label(), "theme");
        assert_eq!(backend.started_count(), 1);
        assert!(backend.is_playing(sound_of(&slot)));
    }

    #[test]
    fn test_play_while_playing_fails() {
        let mut backend = backend();
        let mut slot = PlaybackSlot::new();
        slot.play(&clip("a"), None, &mut backend).unwrap();

        let result = slot.play(&clip("b"), None, &mut backend);
        assert!(matches!(result, Err(AudioError::AlreadyPlaying)));
        assert_eq!(slot.label(), "a");
        assert_eq!(backend.started_count(), 1);
    }

    #[test]
    fn test_play_fails_on_uninitialized_backend() {
        let mut backend = HeadlessBackend::new();
        let mut slot = PlaybackSlot::new();

        let result = slot.play(&clip("a"), None, &mut backend);
        assert!(matches!(result, Err(AudioError::BackendNotInitialized)));
        assert!(!slot.is_playing());
    }

    #[test]
    fn test_stop_without_fade_ends_in_one_tick() {
        let mut backend = backend();
        let mut slot = PlaybackSlot::new();
        slot.play(&clip("a"), None, &mut backend).unwrap();
        let sound = sound_of(&slot);

        slot.stop(0.0);
        assert!(slot.is_playing(), "stop is only observed on the next tick");

        slot.tick(0.016, &mut backend);
        assert!(!slot.is_playing());
        assert!(!slot.is_fading());
        assert!(slot.clip().is_none());
        assert_eq!(slot.label(), IDLE_LABEL);
        assert!(!backend.is_playing(sound));
    }

    #[test]
    fn test_stop_with_fade_waits_for_fade_time() {
        let mut backend = backend();
        let mut slot = PlaybackSlot::new();
        slot.play(&clip("a"), None, &mut backend).unwrap();

        slot.stop(1.0);
        for _ in 0..4 {
            slot.tick(0.25, &mut backend);
            assert!(slot.is_playing());
            assert!(slot.is_fading());
        }

        slot.tick(0.25, &mut backend);
        assert!(!slot.is_playing());
    }

    #[test]
    fn test_linear_fade_lowers_volume() {
        let mut backend = backend();
        let template = SlotTemplate::default().with_fade_curve(FadeCurve::Linear);
        let mut slot = PlaybackSlot::from_template(&template);
        slot.play(&clip("a"), None, &mut backend).unwrap();
        let sound = sound_of(&slot);

        slot.stop(1.0);
        slot.tick(0.25, &mut backend);
        assert_relative_eq!(backend.get_volume(sound).unwrap(), 1.0);

        slot.tick(0.25, &mut backend);
        assert_relative_eq!(backend.get_volume(sound).unwrap(), 0.75);

        slot.tick(0.25, &mut backend);
        assert_relative_eq!(backend.get_volume(sound).unwrap(), 0.5);
    }

    #[test]
    fn test_legacy_fade_is_clamped_to_silence() {
        let mut backend = backend();
        let mut slot = PlaybackSlot::new();
        slot.play(&clip("a"), None, &mut backend).unwrap();
        let sound = sound_of(&slot);

        slot.stop(1.0);
        slot.tick(0.25, &mut backend);
        slot.tick(0.25, &mut backend);
        assert_relative_eq!(backend.get_volume(sound).unwrap(), 0.0);
        assert!(slot.is_playing());
    }

    #[test]
    fn test_natural_completion_ends_in_one_tick() {
        let mut backend = backend();
        let mut slot = PlaybackSlot::new();
        slot.play(&clip("a"), None, &mut backend).unwrap();

        slot.tick(0.016, &mut backend);
        assert!(slot.is_playing());

        backend.finish(sound_of(&slot));
        slot.tick(0.016, &mut backend);
        assert!(!slot.is_playing());
    }

    #[test]
    fn test_stop_on_idle_slot_is_ignored() {
        let mut backend = backend();
        let mut slot = PlaybackSlot::new();

        slot.stop(2.0);
        assert!(!slot.stop_requested());
        assert_eq!(slot.fade_out_secs(), 0.0);

        slot.tick(0.016, &mut backend);
        assert_eq!(slot.state(), SlotState::Idle);
    }

    #[test]
    fn test_slot_can_replay_after_finishing() {
        let mut backend = backend();
        let mut slot = PlaybackSlot::new();
        slot.play(&clip("a"), Some("BGM"), &mut backend).unwrap();
        slot.stop(3.0);
        slot.tick(0.016, &mut backend);
        slot.stop_now();
        slot.tick(0.016, &mut backend);
        slot.tick(3.0, &mut backend);
        assert!(!slot.is_playing());

        slot.play(&clip("b"), None, &mut backend).unwrap();
        assert!(slot.is_playing());
        assert!(!slot.stop_requested());
        assert_eq!(slot.fade_out_secs(), 0.0);
        assert_eq!(slot.category(), None);

        // A fresh play must not inherit the earlier stop
        slot.tick(0.016, &mut backend);
        assert!(slot.is_playing());
    }

    #[test]
    fn test_negative_fade_means_immediate() {
        let mut backend = backend();
        let mut slot = PlaybackSlot::new();
        slot.play(&clip("a"), None, &mut backend).unwrap();

        slot.stop(-5.0);
        assert_eq!(slot.fade_out_secs(), 0.0);
        slot.tick(0.016, &mut backend);
        assert!(!slot.is_playing());
    }

    #[test]
    fn test_infinite_fade_means_immediate() {
        let mut backend = backend();
        let mut slot = PlaybackSlot::new();
        slot.play(&clip("a"), None, &mut backend).unwrap();
        let sound = sound_of(&slot);

        slot.stop(f32::INFINITY);
        assert_eq!(slot.fade_out_secs(), 0.0);
        slot.tick(0.016, &mut backend);
        assert!(!slot.is_playing());
        assert!(!backend.is_playing(sound));
    }

    #[test]
    fn test_fade_volume_is_always_in_range() {
        for curve in [FadeCurve::Legacy, FadeCurve::Linear] {
            let mut backend = backend();
            let template = SlotTemplate::default().with_fade_curve(curve);
            let mut slot = PlaybackSlot::from_template(&template);
            slot.play(&clip("a"), None, &mut backend).unwrap();
            let sound = sound_of(&slot);

            slot.stop(0.3);
            while slot.is_playing() {
                slot.tick(0.1, &mut backend);
                if let Ok(volume) = backend.get_volume(sound) {
                    assert!((0.0..=1.0).contains(&volume), "{curve:?} produced {volume}");
                }
            }
        }
    }

    #[test]
    fn test_nan_volume_falls_back_to_full() {
        assert_eq!(SlotTemplate::default().with_volume(f32::NAN).volume, 1.0);

        let mut backend = backend();
        let template = SlotTemplate {
            volume: f32::NAN,
            fade_curve: FadeCurve::Linear,
        };
        let mut slot = PlaybackSlot::from_template(&template);
        slot.play(&clip("a"), None, &mut backend).unwrap();
        let sound = sound_of(&slot);
        assert_relative_eq!(backend.get_volume(sound).unwrap(), 1.0);

        slot.stop(1.0);
        slot.tick(0.25, &mut backend);
        slot.tick(0.25, &mut backend);
        assert_relative_eq!(backend.get_volume(sound).unwrap(), 0.75);
    }

    #[test]
    fn test_template_volume_is_used() {
        let mut backend = backend();
        let template = SlotTemplate::default().with_volume(0.4);
        let mut slot = PlaybackSlot::from_template(&template);
        slot.play(&clip("a"), None, &mut backend).unwrap();

        assert_relative_eq!(backend.get_volume(sound_of(&slot)).unwrap(), 0.4);
    }
}
