//! Frame timing

use std::time::{Duration, Instant};

/// Longest frame step handed to the pool, in seconds
///
/// A stall (debugger break, window drag) would otherwise skip whole fades.
pub const DEFAULT_MAX_DELTA: f32 = 0.25;

/// Measures the time between frames
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
    max_delta: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a clock starting now
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a clock whose first frame starts at `start`
    pub fn starting_at(start: Instant) -> Self {
        Self {
            last_frame: start,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
            max_delta: DEFAULT_MAX_DELTA,
        }
    }

    /// Set the largest delta a single frame may report
    #[must_use]
    pub fn with_max_delta(mut self, max_delta: f32) -> Self {
        self.max_delta = max_delta.max(0.0);
        self
    }

    /// Start a new frame and return its delta in seconds
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Start a new frame at `now`
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.last_frame);
        self.delta_time = elapsed.as_secs_f32().min(self.max_delta);
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
        self.delta_time
    }

    /// Delta of the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Sum of all frame deltas
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Frames ticked so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Time left until `frame_length` has passed since the last tick
    pub fn remaining_in_frame(&self, frame_length: Duration) -> Duration {
        frame_length.saturating_sub(self.last_frame.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tick_measures_delta() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);

        let delta = clock.tick_at(start + Duration::from_millis(100));
        assert_relative_eq!(delta, 0.1, epsilon = 1e-6);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start).with_max_delta(0.05);

        let delta = clock.tick_at(start + Duration::from_secs(3));
        assert_relative_eq!(delta, 0.05);
        assert_relative_eq!(clock.total_time(), 0.05);
    }

    #[test]
    fn test_time_never_runs_backwards() {
        let start = Instant::now() + Duration::from_secs(1);
        let mut clock = FrameClock::starting_at(start);

        assert_eq!(clock.tick_at(start - Duration::from_millis(500)), 0.0);
    }
}
