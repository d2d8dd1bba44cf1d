//! Spawn timing and randomness.
//!
//! [`SpawnAccumulator`] turns a continuous rate into whole spawn events.
//! Each tick adds `dt * rate` to a fractional counter and every whole unit
//! becomes one particle, so the number spawned depends only on total
//! elapsed time, never on how that time was sliced into frames.
//!
//! [`SpawnRng`] wraps a seedable RNG with the sampling helpers the engine
//! needs when placing and launching a particle.

use crate::emitter::Span;
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::{PI, TAU};

/// Fractional spawn counter.
///
/// Kept in `f64` so that summing many small frame deltas does not lose the
/// fractional remainder.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpawnAccumulator {
    pending: f64,
}

impl SpawnAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `dt * rate` worth of spawns.
    pub fn accumulate(&mut self, dt: f32, rate: f32) {
        self.pending += f64::from(dt) * f64::from(rate);
    }

    /// Consume every whole spawn at once, leaving only the fraction.
    ///
    /// Counts beyond `u64::MAX` saturate.
    #[inline]
    pub fn drain(&mut self) -> u64 {
        let whole = self.pending.floor();
        self.pending -= whole;
        whole as u64
    }

    /// Fractional spawns carried to the next tick.
    #[inline]
    pub fn pending(&self) -> f64 {
        self.pending
    }

    /// Drop any carried fraction.
    pub fn reset(&mut self) {
        self.pending = 0.0;
    }
}

/// Seedable RNG with spawn sampling helpers.
#[derive(Debug, Clone)]
pub struct SpawnRng {
    rng: SmallRng,
}

impl SpawnRng {
    /// Deterministic RNG for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// RNG seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Uniform sample from a span. Degenerate spans return `min`.
    #[inline]
    pub fn span(&mut self, span: Span) -> f32 {
        if span.max > span.min {
            self.rng.gen_range(span.min..=span.max)
        } else {
            span.min
        }
    }

    /// Uniform index below `len`. `len` must be non-zero.
    #[inline]
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Random point inside a sphere of given radius, centered at origin.
    ///
    /// Distribution is uniform throughout the volume.
    pub fn random_in_sphere(&mut self, radius: f32) -> Vec3 {
        if radius <= 0.0 {
            return Vec3::ZERO;
        }
        let dir = self.random_direction();
        // Cube root for uniform volume distribution
        let r = radius * self.rng.gen::<f32>().cbrt();
        dir * r
    }

    /// Random unit vector (uniformly distributed on unit sphere).
    pub fn random_direction(&mut self) -> Vec3 {
        let theta = self.rng.gen_range(0.0..TAU);
        let z: f32 = self.rng.gen_range(-1.0..=1.0);
        let ring = (1.0 - z * z).max(0.0).sqrt();
        Vec3::new(ring * theta.cos(), ring * theta.sin(), z)
    }

    /// Random unit vector within `spread` radians of `axis`.
    pub fn cone_direction(&mut self, axis: Vec3, spread: f32) -> Vec3 {
        let base = axis.normalize_or_zero();
        if base == Vec3::ZERO {
            return Vec3::Y;
        }
        let spread = spread.clamp(0.0, PI);
        if spread == 0.0 {
            return base;
        }
        // Perpendicular basis around the cone axis.
        let up = if base.y.abs() > 0.9 { Vec3::X } else { Vec3::Y };
        let right = up.cross(base).normalize();
        let forward = base.cross(right);

        let angle = self.rng.gen_range(0.0..TAU);
        let tilt = self.rng.gen_range(0.0..=spread);
        let dir = right * (tilt.sin() * angle.cos())
            + forward * (tilt.sin() * angle.sin())
            + base * tilt.cos();
        dir.normalize()
    }
}
