//! Frame clock for host render loops.
//!
//! The engine itself only ever sees a `dt`. [`FrameClock`] is the piece a
//! host loop uses to produce it: measured from wall time, or fixed for
//! deterministic, headless runs.
//!
//! # Example
//!
//! ```ignore
//! use billow::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//! loop {
//!     let dt = clock.tick();
//!     smoke.update(dt);
//! }
//! ```

use std::time::Instant;

/// Produces per-frame deltas for the particle system.
#[derive(Debug)]
pub struct FrameClock {
    /// When the last frame occurred.
    last_frame: Instant,
    /// Simulated seconds since start (after scaling and pauses).
    elapsed_secs: f64,
    /// Delta handed out by the last tick.
    delta_secs: f32,
    /// Total frames ticked.
    frame_count: u64,
    /// Whether time is paused.
    paused: bool,
    /// Fixed delta for deterministic updates.
    fixed_delta: Option<f32>,
    /// Time scale multiplier (1.0 = normal speed).
    time_scale: f32,
}

impl FrameClock {
    /// Clock measuring wall time from now.
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            paused: false,
            fixed_delta: None,
            time_scale: 1.0,
        }
    }

    /// Clock that advances by exactly `delta` seconds per tick.
    pub fn fixed(delta: f32) -> Self {
        let mut clock = Self::new();
        clock.set_fixed_delta(Some(delta));
        clock
    }

    /// Advance one frame and return the delta to simulate.
    ///
    /// Returns 0 while paused, which the particle system treats as a no-op.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let raw = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;

        self.delta_secs = if self.paused {
            0.0
        } else {
            self.fixed_delta.unwrap_or(raw) * self.time_scale
        };
        self.elapsed_secs += f64::from(self.delta_secs);
        self.delta_secs
    }

    /// Simulated seconds since start.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed_secs
    }

    /// Delta handed out by the last tick.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Frames ticked so far, paused ones included.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Whether time is currently paused.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Current time scale multiplier.
    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Stop handing out time, e.g. while the page is hidden.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume after pausing. Wall time spent paused is not replayed.
    pub fn resume(&mut self) {
        if self.paused {
            self.last_frame = Instant::now();
            self.paused = false;
        }
    }

    /// Set a fixed delta time for deterministic updates.
    ///
    /// Pass `None` to use real frame timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Set time scale multiplier. Negative values clamp to 0.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
