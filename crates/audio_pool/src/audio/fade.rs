//! Fade-out curves

use serde::{Deserialize, Serialize};

/// Volume curve applied while a slot fades out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FadeCurve {
    /// Historical curve `1 - duration / (duration - t)`.
    ///
    /// Non-positive over the whole fade window, so once clamped by the output
    /// the sound is silent from the first fade frame until the fade time ends.
    #[default]
    Legacy,
    /// Straight ramp `1 - t / duration` from full volume to silence
    Linear,
}

impl FadeCurve {
    /// Volume multiplier after `elapsed` seconds of a fade lasting `duration`
    ///
    /// Unclamped; callers clamp the resulting volume to the output range.
    /// A result that is not finite counts as silence.
    pub fn multiplier(self, elapsed: f32, duration: f32) -> f32 {
        if duration <= 0.0 {
            return 0.0;
        }

        let multiplier = match self {
            Self::Legacy => 1.0 - duration / (duration - elapsed),
            Self::Linear => 1.0 - (elapsed / duration).clamp(0.0, 1.0),
        };

        if multiplier.is_finite() {
            multiplier
        } else {
            0.0
        }
    }
}
