//! Particle records.

use crate::scene::{Billboard, NodeId};
use glam::{Quat, Vec3};

/// One live smoke puff.
///
/// Particles are created and destroyed only by
/// [`ParticleSystem`](crate::ParticleSystem); hosts can inspect them between
/// ticks through [`ParticleSystem::particles`](crate::ParticleSystem::particles).
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// World-space position.
    pub position: Vec3,
    /// Units per second, set at spawn and nudged by drift.
    pub velocity: Vec3,
    /// Where the particle appeared (anchor position plus jitter).
    pub origin: Vec3,
    /// Seconds since spawn.
    pub age: f32,
    /// Age at which the particle expires.
    pub lifetime: f32,
    /// Current size.
    pub scale: f32,
    /// Current alpha.
    pub opacity: f32,
    /// Orientation from the last billboard pass.
    pub rotation: Quat,
    /// Index of the emitter this particle came from.
    pub emitter: usize,
    /// Handle of the sprite in the parent container.
    pub(crate) node: NodeId,
}

impl Particle {
    /// Fraction of life used, `age / lifetime`, clamped to `[0, 1]`.
    #[inline]
    pub fn life_ratio(&self) -> f32 {
        (self.age / self.lifetime).clamp(0.0, 1.0)
    }

    /// The one alive/expired discriminant.
    #[inline]
    pub fn is_expired(&self) -> bool {
        is_expired(self.age, self.lifetime)
    }

    /// Handle of this particle's sprite in the parent container.
    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Visual state pushed to the parent container.
    #[inline]
    pub(crate) fn billboard(&self) -> Billboard {
        Billboard {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
            opacity: self.opacity,
        }
    }
}

/// Expired once age reaches lifetime.
#[inline]
pub(crate) fn is_expired(age: f32, lifetime: f32) -> bool {
    age >= lifetime
}
