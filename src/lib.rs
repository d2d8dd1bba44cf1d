//! # billow - billboarded smoke particles
//!
//! A small, frame-rate independent particle engine for smoke, steam and
//! similar puffs. It spawns textured billboards from a set of anchor points
//! at a fixed rate, ages them, fades them out, and removes them from your
//! scene when they expire.
//!
//! billow does not render anything. It drives sprites in a container you
//! hand it (anything implementing [`SceneGraph`]) and turns them toward a
//! camera you hand it (anything implementing [`Viewpoint`]).
//!
//! ## Quick Start
//!
//! ```ignore
//! use billow::prelude::*;
//!
//! let scene = Rc::new(RefCell::new(Scene::new()));
//! let camera = Rc::new(RefCell::new(OrbitCamera::new()));
//!
//! let mut smoke = ParticleSystem::builder()
//!     .camera(Rc::clone(&camera))
//!     .parent(Rc::clone(&scene))
//!     .emitters([Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)])
//!     .rate(15.0)
//!     .texture(Texture::soft_puff(64))
//!     .build()?;
//!
//! let mut clock = FrameClock::new();
//! loop {
//!     smoke.update(clock.tick());
//!     renderer.draw(&scene.borrow().instances());
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Spawning
//!
//! Spawning is driven by a fractional accumulator: each update adds
//! `dt * rate`, and every whole unit becomes one particle. Ten particles per
//! second means ten particles per second whether the host runs at 30 or
//! 144 frames per second. Emitters are picked round-robin by default; see
//! [`EmitterSelection`].
//!
//! ### Lifecycle
//!
//! A particle's size and opacity are pure functions of its life ratio
//! `age / lifetime` (see [`Lifecycle`]). Size never shrinks; opacity never
//! increases and reaches zero exactly at expiry, at which point the particle
//! and its sprite are removed in the same update.
//!
//! ### Billboards
//!
//! Every update re-orients each sprite toward the camera, so the output is
//! fully determined by the inputs regardless of what renderer draws it. See
//! [`BillboardMode`].
//!
//! ## Feature Overview
//!
//! | Area | Types |
//! |------|-------|
//! | Engine | [`ParticleSystem`], [`ParticleSystemBuilder`], [`SystemStats`] |
//! | Collaborators | [`SceneGraph`], [`Viewpoint`], [`Anchor`] |
//! | Ready-made hosts | [`Scene`], [`OrbitCamera`], [`FixedCamera`], [`SharedAnchor`] |
//! | Look | [`Lifecycle`], [`Emission`], [`Texture`] |
//! | Config files | [`SmokeSettings`], [`SceneFile`] |

pub mod camera;
pub mod config;
pub mod emitter;
pub mod error;
pub mod lifecycle;
mod particle;
pub mod scene;
pub mod spawn;
mod system;
pub mod textures;
pub mod time;

pub use bytemuck;
pub use camera::{face_camera, BillboardMode, CameraPose, FixedCamera, OrbitCamera, Viewpoint};
pub use config::{SceneFile, SmokeSettings, MAX_RATE};
pub use emitter::{Anchor, Emission, EmitterSelection, SharedAnchor, Span};
pub use error::{ConfigError, TextureError};
pub use glam::{Quat, Vec3};
pub use lifecycle::{Fade, FadeCurve, Growth, Lifecycle, ScaleCurve};
pub use particle::Particle;
pub use scene::{Billboard, NodeId, Scene, SceneGraph, Sprite, SpriteInstance};
pub use system::{ParticleSystem, ParticleSystemBuilder, SystemStats, TickReport};
pub use textures::{AddressMode, FilterMode, Texture};
pub use time::FrameClock;

/// Convenient imports for hosts.
///
/// ```ignore
/// use billow::prelude::*;
/// ```
///
/// This imports the engine and builder, the collaborator traits and their
/// ready-made implementations, the look types, [`Vec3`], and `Rc`/`RefCell`
/// for sharing the scene and camera with the engine.
pub mod prelude {
    pub use crate::camera::{BillboardMode, FixedCamera, OrbitCamera, Viewpoint};
    pub use crate::config::SmokeSettings;
    pub use crate::emitter::{Anchor, Emission, EmitterSelection, SharedAnchor, Span};
    pub use crate::lifecycle::{Fade, Growth, Lifecycle};
    pub use crate::scene::{Scene, SceneGraph};
    pub use crate::system::ParticleSystem;
    pub use crate::textures::Texture;
    pub use crate::time::FrameClock;
    pub use glam::Vec3;
    pub use std::cell::RefCell;
    pub use std::rc::Rc;
}
