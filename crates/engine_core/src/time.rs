//! Frame clock.

use std::time::{Duration, Instant};

/// Per-frame timing: last step, running total and frame counter.
///
/// A frame driver calls either [`Time::update`] (wall clock) or
/// [`Time::tick`] (scripted / fixed step) once per rendered frame.
#[derive(Debug)]
pub struct Time {
    last_frame: Instant,
    delta: Duration,
    elapsed: Duration,
    frame_count: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Step by however long it has been since the previous frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;
        self.step(delta);
    }

    /// Step by a fixed amount, ignoring the wall clock.
    pub fn tick(&mut self, delta: Duration) {
        self.last_frame = Instant::now();
        self.step(delta);
    }

    fn step(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.frame_count += 1;
    }

    /// Length of the last frame in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Sum of all frame steps so far.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Instantaneous frame rate from the last step; 0 before the first frame.
    pub fn fps(&self) -> f32 {
        match self.delta_seconds() {
            dt if dt > 0.0 => 1.0 / dt,
            _ => 0.0,
        }
    }
}
