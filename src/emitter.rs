//! Emitter anchors and emission shape.
//!
//! An emitter is anything with a world position. The engine reads the
//! position at the moment a particle is spawned and never writes to it, so
//! hosts are free to move anchors between frames (a debug panel dragging a
//! chimney around, a timeline sliding it along a path).
//!
//! # Anchor Types
//!
//! | Type | Use |
//! |------|-----|
//! | `Vec3` | Fixed point |
//! | [`SharedAnchor`] | Point the host keeps a handle to and moves |
//! | `Rc<T>`, `&T`, `RefCell<T>`, `Cell<Vec3>` | Wrappers around host objects |
//!
//! # Emission
//!
//! [`Emission`] describes how a particle leaves its anchor:
//! - `direction` - The primary direction of emission (normalized)
//! - `speed` - Speed range, sampled per particle
//! - `spread` - Cone half-angle in radians (0 = laser, PI/2 = hemisphere)
//! - `jitter` - Radius of the sphere spawn positions are scattered in
//! - `drift` - Strength of the random walk applied every tick

use crate::error::ConfigError;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Something particles can originate from.
pub trait Anchor {
    /// Current world-space position.
    fn world_position(&self) -> Vec3;
}

impl Anchor for Vec3 {
    fn world_position(&self) -> Vec3 {
        *self
    }
}

impl Anchor for Cell<Vec3> {
    fn world_position(&self) -> Vec3 {
        self.get()
    }
}

impl<T: Anchor + ?Sized> Anchor for RefCell<T> {
    fn world_position(&self) -> Vec3 {
        self.borrow().world_position()
    }
}

impl<T: Anchor + ?Sized> Anchor for Rc<T> {
    fn world_position(&self) -> Vec3 {
        (**self).world_position()
    }
}

impl<T: Anchor + ?Sized> Anchor for &T {
    fn world_position(&self) -> Vec3 {
        (**self).world_position()
    }
}

/// Movable anchor shared between the host and the engine.
///
/// # Example
///
/// ```ignore
/// let chimney = SharedAnchor::new(Vec3::new(-70.0, 11.0, -210.0));
/// builder.emitter(chimney.clone());
/// // later, from a debug panel:
/// chimney.set(Vec3::new(-72.0, 11.0, -210.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedAnchor(Rc<Cell<Vec3>>);

impl SharedAnchor {
    /// Create an anchor at `position`.
    pub fn new(position: Vec3) -> Self {
        Self(Rc::new(Cell::new(position)))
    }

    /// Move the anchor. Affects particles spawned from now on.
    pub fn set(&self, position: Vec3) {
        self.0.set(position);
    }

    /// Current position.
    pub fn get(&self) -> Vec3 {
        self.0.get()
    }
}

impl Anchor for SharedAnchor {
    fn world_position(&self) -> Vec3 {
        self.get()
    }
}

/// Policy for choosing which emitter a new particle comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmitterSelection {
    /// Cycle through emitters in order, so each gets an equal share.
    #[default]
    RoundRobin,
    /// Pick uniformly at random for every particle.
    Random,
}

/// Closed range of `f32` values sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

impl Span {
    /// Range from `min` to `max`.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Degenerate range containing only `value`.
    pub const fn fixed(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Whether both ends are finite and `min <= max`.
    pub fn is_ordered(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// How particles leave their anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Emission {
    /// Primary emission direction.
    pub direction: Vec3,
    /// Initial speed range in units per second.
    pub speed: Span,
    /// Cone half-angle in radians.
    pub spread: f32,
    /// Radius of the spawn sphere around the anchor.
    pub jitter: f32,
    /// Random walk strength in units per second squared.
    pub drift: f32,
}

impl Default for Emission {
    fn default() -> Self {
        Self {
            direction: Vec3::Y,
            speed: Span::new(0.6, 1.2),
            spread: 0.35,
            jitter: 0.25,
            drift: 0.4,
        }
    }
}

impl Emission {
    /// Check the emission parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEmission`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.direction.is_finite() || self.direction.length_squared() <= f32::EPSILON {
            return Err(ConfigError::InvalidEmission(format!(
                "direction must be a non-zero vector (got {})",
                self.direction
            )));
        }
        if !self.speed.is_ordered() || self.speed.min < 0.0 {
            return Err(ConfigError::InvalidEmission(format!(
                "speed must satisfy 0 <= min <= max (got {}..={})",
                self.speed.min, self.speed.max
            )));
        }
        for (name, value) in [
            ("spread", self.spread),
            ("jitter", self.jitter),
            ("drift", self.drift),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidEmission(format!(
                    "{name} must be finite and non-negative (got {value})"
                )));
            }
        }
        Ok(())
    }

    /// A motionless emission: particles appear exactly on the anchor and stay put.
    pub fn still() -> Self {
        Self {
            direction: Vec3::Y,
            speed: Span::fixed(0.0),
            spread: 0.0,
            jitter: 0.0,
            drift: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_anchor_moves() {
        let anchor = SharedAnchor::new(Vec3::ONE);
        let engine_side: Box<dyn Anchor> = Box::new(anchor.clone());
        anchor.set(Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(engine_side.world_position(), Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_wrapped_anchors() {
        let cell = Rc::new(Cell::new(Vec3::X));
        let boxed: Box<dyn Anchor> = Box::new(Rc::clone(&cell));
        cell.set(Vec3::Z);
        assert_eq!(boxed.world_position(), Vec3::Z);

        let fixed = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!((&fixed).world_position(), fixed);
        assert_eq!(RefCell::new(fixed).world_position(), fixed);
    }

    #[test]
    fn test_default_emission_is_valid() {
        assert!(Emission::default().validate().is_ok());
        assert!(Emission::still().validate().is_ok());
    }

    #[test]
    fn test_emission_rejects_bad_values() {
        let zero_dir = Emission {
            direction: Vec3::ZERO,
            ..Default::default()
        };
        assert!(zero_dir.validate().is_err());

        let reversed = Emission {
            speed: Span::new(2.0, 1.0),
            ..Default::default()
        };
        assert!(reversed.validate().is_err());

        let negative_jitter = Emission {
            jitter: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            negative_jitter.validate(),
            Err(ConfigError::InvalidEmission(msg)) if msg.contains("jitter")
        ));
    }
}
