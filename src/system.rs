//! The particle system engine.
//!
//! [`ParticleSystem`] owns a pool of smoke puffs. Each call to
//! [`update`](ParticleSystem::update) runs four steps in order:
//!
//! 1. **Spawn** - `dt * rate` is added to a fractional accumulator and each
//!    whole unit becomes one particle at the next emitter.
//! 2. **Age & animate** - every particle ages by `dt`, drifts, moves, grows
//!    and fades according to its life ratio.
//! 3. **Expire & sweep** - particles whose age reached their lifetime are
//!    dropped and their sprites detached from the parent in the same pass.
//! 4. **Orient** - survivors are turned toward the camera and their sprites
//!    updated in the parent container.
//!
//! # Example
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
//!     .emitter(Vec3::new(-70.0, 11.0, -210.0))
//!     .emitter(Vec3::new(-77.0, 11.0, -210.0))
//!     .rate(15.0)
//!     .texture(Texture::from_file("smoke.png")?)
//!     .build()?;
//!
//! // once per animation frame
//! smoke.update(dt);
//! ```

use crate::camera::{face_camera, BillboardMode, CameraPose, Viewpoint};
use crate::config::{validate_rate, SmokeSettings};
use crate::emitter::{Anchor, Emission, EmitterSelection};
use crate::error::ConfigError;
use crate::lifecycle::Lifecycle;
use crate::particle::Particle;
use crate::scene::{NodeId, SceneGraph, Sprite};
use crate::spawn::{SpawnAccumulator, SpawnRng};
use crate::textures::Texture;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info, trace};

/// Running counters for a particle system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemStats {
    /// Particles alive right now.
    pub live: usize,
    /// Particles spawned since construction.
    pub spawned_total: u64,
    /// Particles removed on expiry since construction.
    pub expired_total: u64,
    /// Spawn events dropped because `max_particles` was reached.
    pub capped_total: u64,
}

/// What a single [`ParticleSystem::update`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Particles created this tick.
    pub spawned: usize,
    /// Particles removed this tick.
    pub expired: usize,
}

/// Rate-limited smoke emitter drawing billboards into a parent container.
///
/// `S` is the parent container and `C` the camera, typically
/// `Rc<RefCell<_>>` handles shared with the host.
pub struct ParticleSystem<S: SceneGraph, C: Viewpoint> {
    camera: C,
    emitters: Vec<Box<dyn Anchor>>,
    parent: S,
    texture: Rc<Texture>,
    settings: SmokeSettings,
    particles: Vec<Particle>,
    accumulator: SpawnAccumulator,
    rng: SpawnRng,
    next_emitter: usize,
    stats: SystemStats,
}

impl<S: SceneGraph, C: Viewpoint> ParticleSystem<S, C> {
    /// Start configuring a particle system.
    pub fn builder() -> ParticleSystemBuilder<S, C> {
        ParticleSystemBuilder::new()
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Zero, negative, NaN and infinite deltas are ignored entirely: nothing
    /// spawns, nothing ages, and the accumulator is left untouched.
    pub fn update(&mut self, dt: f32) -> TickReport {
        if !(dt > 0.0 && dt.is_finite()) {
            return TickReport::default();
        }
        let dt = match self.settings.max_delta {
            Some(max) => dt.min(max),
            None => dt,
        };
        let pose = CameraPose::of(&self.camera);

        let spawned = self.spawn(dt, &pose);
        self.advance(dt);
        let expired = self.sweep();
        self.orient(&pose);

        self.stats.live = self.particles.len();
        trace!(dt, spawned, expired, live = self.stats.live, "smoke tick");
        TickReport { spawned, expired }
    }

    /// Immediately spawn up to `count` particles through the normal spawn
    /// path, ignoring the rate. Returns how many were created.
    ///
    /// Burst particles start at age zero and are aged by the next `update`.
    pub fn burst(&mut self, count: usize) -> usize {
        let pose = CameraPose::of(&self.camera);
        let mut spawned = 0;
        for _ in 0..count {
            if self.try_spawn(&pose) {
                spawned += 1;
            }
        }
        self.stats.live = self.particles.len();
        debug!(requested = count, spawned, "smoke burst");
        spawned
    }

    /// Detach every live sprite from the parent and drop all particles.
    ///
    /// This is the host's teardown hook; the engine never does it on its own.
    /// Returns the number of sprites removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.particles.len();
        for particle in self.particles.drain(..) {
            self.parent.remove_child(particle.node);
        }
        self.stats.live = 0;
        debug!(removed, "cleared smoke particles");
        removed
    }

    /// Current spawn rate in particles per second.
    pub fn rate(&self) -> f32 {
        self.settings.rate
    }

    /// Change the spawn rate. Zero stops spawning while existing particles
    /// keep aging out.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRate`] for rates outside
    /// `0..=`[`MAX_RATE`](crate::config::MAX_RATE); the previous rate is kept.
    pub fn set_rate(&mut self, rate: f32) -> Result<(), ConfigError> {
        validate_rate(rate)?;
        debug!(from = self.settings.rate, to = rate, "smoke rate changed");
        self.settings.rate = rate;
        Ok(())
    }

    /// Active settings.
    pub fn settings(&self) -> &SmokeSettings {
        &self.settings
    }

    /// Live particles, oldest first.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of live particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether no particles are alive.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Running counters.
    pub fn stats(&self) -> SystemStats {
        self.stats
    }

    /// Fractional spawns carried into the next tick.
    pub fn pending_spawns(&self) -> f64 {
        self.accumulator.pending()
    }

    /// Number of emitter anchors.
    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }

    /// Shared texture handed to every sprite.
    pub fn texture(&self) -> &Rc<Texture> {
        &self.texture
    }

    /// The parent container.
    pub fn parent(&self) -> &S {
        &self.parent
    }

    /// Mutable access to the parent container, for hosts that hand it over.
    pub fn parent_mut(&mut self) -> &mut S {
        &mut self.parent
    }

    /// The camera.
    pub fn camera(&self) -> &C {
        &self.camera
    }

    /// Mutable access to the camera.
    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    // =========================================================================
    // TICK STEPS
    // =========================================================================

    fn spawn(&mut self, dt: f32, pose: &CameraPose) -> usize {
        self.accumulator.accumulate(dt, self.settings.rate);
        let due = self.accumulator.drain();
        let room = match self.settings.max_particles {
            Some(max) => max.saturating_sub(self.particles.len()),
            None => usize::MAX,
        };
        let count = usize::try_from(due).unwrap_or(usize::MAX).min(room);

        let dropped = due - count as u64;
        if dropped > 0 {
            self.stats.capped_total = self.stats.capped_total.saturating_add(dropped);
            trace!(dropped, "smoke spawns dropped at particle cap");
        }
        for _ in 0..count {
            self.spawn_one(pose);
        }
        count
    }

    fn advance(&mut self, dt: f32) {
        let Lifecycle { scale, opacity, .. } = self.settings.lifecycle;
        let drift = self.settings.emission.drift;
        for particle in &mut self.particles {
            particle.age = (particle.age + dt).min(particle.lifetime);
            if drift > 0.0 {
                particle.velocity += self.rng.random_in_sphere(1.0) * drift * dt;
            }
            particle.position += particle.velocity * dt;

            let ratio = particle.life_ratio();
            particle.scale = scale.at(ratio);
            particle.opacity = opacity.at(ratio);
        }
    }

    fn sweep(&mut self) -> usize {
        let before = self.particles.len();
        let parent = &mut self.parent;
        self.particles.retain(|particle| {
            if particle.is_expired() {
                parent.remove_child(particle.node);
                false
            } else {
                true
            }
        });
        let expired = before - self.particles.len();
        self.stats.expired_total += expired as u64;
        expired
    }

    fn orient(&mut self, pose: &CameraPose) {
        let mode = self.settings.billboard;
        for particle in &mut self.particles {
            particle.rotation = face_camera(mode, particle.position, pose);
            self.parent.update_child(particle.node, particle.billboard());
        }
    }

    // =========================================================================
    // SPAWNING
    // =========================================================================

    fn try_spawn(&mut self, pose: &CameraPose) -> bool {
        if let Some(max) = self.settings.max_particles {
            if self.particles.len() >= max {
                self.stats.capped_total += 1;
                trace!(max, "smoke spawn dropped at particle cap");
                return false;
            }
        }
        self.spawn_one(pose);
        true
    }

    fn spawn_one(&mut self, pose: &CameraPose) {
        let emitter = self.next_emitter_index();
        let anchor = self.emitters[emitter].world_position();
        let Emission {
            direction,
            speed,
            spread,
            jitter,
            ..
        } = self.settings.emission;
        let life = self.settings.lifecycle;

        let origin = anchor + self.rng.random_in_sphere(jitter);
        let velocity = self.rng.cone_direction(direction, spread) * self.rng.span(speed);
        let lifetime = self.rng.span(life.lifetime);

        let mut particle = Particle {
            position: origin,
            velocity,
            origin,
            age: 0.0,
            lifetime,
            scale: life.scale_at(0.0),
            opacity: life.opacity_at(0.0),
            rotation: face_camera(self.settings.billboard, origin, pose),
            emitter,
            node: NodeId(0),
        };
        particle.node = self
            .parent
            .add_child(Sprite::new(particle.billboard(), Rc::clone(&self.texture)));
        self.particles.push(particle);
        self.stats.spawned_total += 1;
    }

    fn next_emitter_index(&mut self) -> usize {
        let len = self.emitters.len();
        match self.settings.selection {
            EmitterSelection::RoundRobin => {
                let index = self.next_emitter % len;
                self.next_emitter = (index + 1) % len;
                index
            }
            EmitterSelection::Random => self.rng.index(len),
        }
    }
}

impl<S: SceneGraph, C: Viewpoint> fmt::Debug for ParticleSystem<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParticleSystem")
            .field("emitters", &self.emitters.len())
            .field("settings", &self.settings)
            .field("live", &self.particles.len())
            .field("pending", &self.accumulator.pending())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ParticleSystem`].
///
/// `camera`, `parent`, `texture` and at least one emitter are required;
/// everything else defaults to [`SmokeSettings::default`].
///
/// [`settings`](Self::settings) replaces the whole settings block, so call it
/// before the finer-grained setters. [`rate`](Self::rate) always wins.
pub struct ParticleSystemBuilder<S, C> {
    camera: Option<C>,
    parent: Option<S>,
    texture: Option<Rc<Texture>>,
    emitters: Vec<Box<dyn Anchor>>,
    settings: SmokeSettings,
    rate: Option<f32>,
}

impl<S: SceneGraph, C: Viewpoint> ParticleSystemBuilder<S, C> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            camera: None,
            parent: None,
            texture: None,
            emitters: Vec::new(),
            settings: SmokeSettings::default(),
            rate: None,
        }
    }

    /// Camera the billboards face.
    pub fn camera(mut self, camera: C) -> Self {
        self.camera = Some(camera);
        self
    }

    /// Container that receives the sprites.
    pub fn parent(mut self, parent: S) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Texture shared by every sprite.
    pub fn texture(mut self, texture: impl Into<Rc<Texture>>) -> Self {
        self.texture = Some(texture.into());
        self
    }

    /// Add one emitter anchor.
    pub fn emitter(mut self, anchor: impl Anchor + 'static) -> Self {
        self.emitters.push(Box::new(anchor));
        self
    }

    /// Add several emitter anchors, in order.
    pub fn emitters<A, I>(mut self, anchors: I) -> Self
    where
        A: Anchor + 'static,
        I: IntoIterator<Item = A>,
    {
        self.emitters
            .extend(anchors.into_iter().map(|a| Box::new(a) as Box<dyn Anchor>));
        self
    }

    /// Spawn rate in particles per second.
    pub fn rate(mut self, rate: f32) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Replace all settings.
    pub fn settings(mut self, settings: SmokeSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Emitter selection policy.
    pub fn selection(mut self, selection: EmitterSelection) -> Self {
        self.settings.selection = selection;
        self
    }

    /// Lifetime range and curves.
    pub fn lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.settings.lifecycle = lifecycle;
        self
    }

    /// Launch parameters.
    pub fn emission(mut self, emission: Emission) -> Self {
        self.settings.emission = emission;
        self
    }

    /// Billboard orientation policy.
    pub fn billboard(mut self, mode: BillboardMode) -> Self {
        self.settings.billboard = mode;
        self
    }

    /// Cap on live particles.
    pub fn max_particles(mut self, max: usize) -> Self {
        self.settings.max_particles = Some(max);
        self
    }

    /// Clamp on the simulated `dt` per update.
    pub fn max_delta(mut self, seconds: f32) -> Self {
        self.settings.max_delta = Some(seconds);
        self
    }

    /// Seed the RNG for reproducible runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.settings.seed = Some(seed);
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingCamera`], [`ConfigError::MissingParent`],
    ///   [`ConfigError::MissingTexture`] for absent collaborators
    /// - [`ConfigError::NoEmitters`] for an empty emitter list
    /// - any error from [`SmokeSettings::validate`]
    pub fn build(self) -> Result<ParticleSystem<S, C>, ConfigError> {
        let camera = self.camera.ok_or(ConfigError::MissingCamera)?;
        let parent = self.parent.ok_or(ConfigError::MissingParent)?;
        let texture = self.texture.ok_or(ConfigError::MissingTexture)?;
        if self.emitters.is_empty() {
            return Err(ConfigError::NoEmitters);
        }

        let mut settings = self.settings;
        if let Some(rate) = self.rate {
            settings.rate = rate;
        }
        settings.validate()?;

        let rng = match settings.seed {
            Some(seed) => SpawnRng::seeded(seed),
            None => SpawnRng::from_entropy(),
        };

        info!(
            emitters = self.emitters.len(),
            rate = settings.rate,
            selection = ?settings.selection,
            billboard = ?settings.billboard,
            "smoke particle system ready"
        );

        Ok(ParticleSystem {
            camera,
            emitters: self.emitters,
            parent,
            texture,
            settings,
            particles: Vec::new(),
            accumulator: SpawnAccumulator::new(),
            rng,
            next_emitter: 0,
            stats: SystemStats::default(),
        })
    }
}

impl<S: SceneGraph, C: Viewpoint> Default for ParticleSystemBuilder<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::FixedCamera;
    use crate::config::MAX_RATE;
    use crate::emitter::Span;
    use crate::scene::Billboard;
    use glam::Vec3;
    use std::collections::BTreeMap;

    /// Container that records every call made on it.
    #[derive(Default)]
    struct RecordingScene {
        live: BTreeMap<NodeId, Sprite>,
        next: u64,
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
        updates: usize,
    }

    impl SceneGraph for RecordingScene {
        fn add_child(&mut self, sprite: Sprite) -> NodeId {
            let id = NodeId(self.next);
            self.next += 1;
            self.live.insert(id, sprite);
            self.added.push(id);
            id
        }

        fn remove_child(&mut self, node: NodeId) -> Option<Sprite> {
            self.removed.push(node);
            self.live.remove(&node)
        }

        fn update_child(&mut self, node: NodeId, billboard: Billboard) {
            assert!(self.live.contains_key(&node), "update on detached {node:?}");
            self.updates += 1;
            if let Some(sprite) = self.live.get_mut(&node) {
                sprite.billboard = billboard;
            }
        }
    }

    fn builder() -> ParticleSystemBuilder<RecordingScene, FixedCamera> {
        ParticleSystem::builder()
            .camera(FixedCamera::default())
            .parent(RecordingScene::default())
            .texture(Texture::solid(255, 255, 255, 255))
            .seed(1)
    }

    #[test]
    fn test_missing_collaborators() {
        let no_camera = ParticleSystem::<RecordingScene, FixedCamera>::builder()
            .parent(RecordingScene::default())
            .texture(Texture::solid(0, 0, 0, 0))
            .emitter(Vec3::ZERO)
            .build();
        assert!(matches!(no_camera, Err(ConfigError::MissingCamera)));

        let no_texture = ParticleSystem::<RecordingScene, FixedCamera>::builder()
            .camera(FixedCamera::default())
            .parent(RecordingScene::default())
            .emitter(Vec3::ZERO)
            .build();
        assert!(matches!(no_texture, Err(ConfigError::MissingTexture)));
    }

    #[test]
    fn test_empty_emitters_rejected() {
        assert!(matches!(builder().build(), Err(ConfigError::NoEmitters)));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let result = builder().emitter(Vec3::ZERO).rate(-3.0).build();
        assert!(matches!(result, Err(ConfigError::InvalidRate(_))));
    }

    #[test]
    fn test_rate_overrides_settings_block() {
        let system = builder()
            .emitter(Vec3::ZERO)
            .rate(3.0)
            .settings(SmokeSettings {
                rate: 99.0,
                ..Default::default()
            })
            .build()
            .unwrap();
        assert_eq!(system.rate(), 3.0);
    }

    #[test]
    fn test_round_robin_cycles_emitters() {
        let mut system = builder()
            .emitters([Vec3::X, Vec3::Y, Vec3::Z])
            .emission(Emission::still())
            .rate(0.0)
            .build()
            .unwrap();
        system.burst(7);
        let order: Vec<usize> = system.particles().iter().map(|p| p.emitter).collect();
        assert_eq!(order, vec![0, 1, 2, 0, 1, 2, 0]);
        assert_eq!(system.particles()[1].origin, Vec3::Y);
    }

    #[test]
    fn test_random_selection_stays_in_range() {
        let mut system = builder()
            .emitters([Vec3::X, Vec3::Y])
            .selection(EmitterSelection::Random)
            .rate(0.0)
            .build()
            .unwrap();
        system.burst(50);
        assert!(system.particles().iter().all(|p| p.emitter < 2));
        assert!(system.particles().iter().any(|p| p.emitter == 0));
        assert!(system.particles().iter().any(|p| p.emitter == 1));
    }

    #[test]
    fn test_expiry_removes_every_handle_exactly_once() {
        let mut system = builder()
            .emitter(Vec3::ZERO)
            .rate(20.0)
            .lifecycle(Lifecycle::steam().lifetime(0.3, 0.9))
            .build()
            .unwrap();
        for _ in 0..120 {
            system.update(1.0 / 30.0);
        }
        system.set_rate(0.0).unwrap();
        for _ in 0..60 {
            system.update(1.0 / 30.0);
        }

        assert!(system.is_empty());
        let scene = system.parent();
        assert!(scene.live.is_empty());
        let mut removed = scene.removed.clone();
        removed.sort();
        removed.dedup();
        assert_eq!(removed.len(), scene.removed.len(), "handle removed twice");
        assert_eq!(removed, scene.added);
        assert_eq!(system.stats().expired_total, scene.added.len() as u64);
    }

    #[test]
    fn test_adjacent_expiries_not_skipped() {
        // Every particle shares one lifetime, so a whole run of neighbours
        // expires in the same tick.
        let mut system = builder()
            .emitter(Vec3::ZERO)
            .rate(0.0)
            .lifecycle(Lifecycle::smoke().fixed_lifetime(1.0))
            .build()
            .unwrap();
        system.burst(5);
        let report = system.update(1.0);
        assert_eq!(report.expired, 5);
        assert!(system.is_empty());
        assert!(system.parent().live.is_empty());
    }

    #[test]
    fn test_sprites_share_texture() {
        let mut system = builder().emitter(Vec3::ZERO).rate(0.0).build().unwrap();
        system.burst(10);
        let texture = Rc::clone(system.texture());
        for sprite in system.parent().live.values() {
            assert!(Rc::ptr_eq(&sprite.texture, &texture));
        }
        // engine + ours + one per sprite
        assert_eq!(Rc::strong_count(&texture), 12);
    }

    #[test]
    fn test_parent_mirrors_particle_state() {
        let mut system = builder()
            .emitter(Vec3::new(0.0, 0.0, -5.0))
            .rate(10.0)
            .build()
            .unwrap();
        for _ in 0..10 {
            system.update(0.1);
        }
        let scene = system.parent();
        assert_eq!(scene.live.len(), system.len());
        for particle in system.particles() {
            let sprite = &scene.live[&particle.node()];
            assert_eq!(sprite.billboard.position, particle.position);
            assert_eq!(sprite.billboard.scale, particle.scale);
            assert_eq!(sprite.billboard.opacity, particle.opacity);
        }
        assert!(scene.updates > 0);
    }

    #[test]
    fn test_max_particles_caps_pool() {
        let mut system = builder()
            .emitter(Vec3::ZERO)
            .rate(100.0)
            .max_particles(5)
            .build()
            .unwrap();
        system.update(0.5);
        assert_eq!(system.len(), 5);
        assert_eq!(system.stats().capped_total, 45);
    }

    #[test]
    fn test_cap_drops_whole_backlog_at_once() {
        let mut system = builder()
            .emitter(Vec3::ZERO)
            .rate(MAX_RATE)
            .max_particles(3)
            .build()
            .unwrap();
        let report = system.update(1.0);
        assert_eq!(report.spawned, 3);
        assert_eq!(system.len(), 3);
        assert_eq!(system.stats().capped_total, 1_000_000 - 3);
        assert!(system.pending_spawns() < 1.0);
    }

    #[test]
    fn test_huge_frame_returns() {
        let mut system = builder()
            .emitter(Vec3::ZERO)
            .rate(MAX_RATE)
            .max_particles(4)
            .build()
            .unwrap();
        // No max_delta: the whole frame is simulated and everything expires.
        let report = system.update(1.0e12);
        assert_eq!(report.spawned, 4);
        assert_eq!(report.expired, 4);
        assert!(system.is_empty());
        assert!(system.stats().capped_total > 1_000_000_000_000);
        assert!(system.pending_spawns() < 1.0);
    }

    #[test]
    fn test_absurd_rate_rejected() {
        let mut system = builder().emitter(Vec3::ZERO).rate(2.0).build().unwrap();
        assert!(matches!(system.set_rate(1.0e16), Err(ConfigError::InvalidRate(_))));
        assert_eq!(system.rate(), 2.0);
        let result = builder().emitter(Vec3::ZERO).rate(1.0e16).build();
        assert!(matches!(result, Err(ConfigError::InvalidRate(_))));
    }

    #[test]
    fn test_max_delta_clamps_large_frames() {
        let mut system = builder()
            .emitter(Vec3::ZERO)
            .rate(10.0)
            .max_delta(0.1)
            .build()
            .unwrap();
        // A tab coming back after a minute simulates only 0.1s.
        let report = system.update(60.0);
        assert_eq!(report.spawned, 1);
        assert!(system.particles()[0].age <= 0.1 + 1e-6);
    }

    #[test]
    fn test_clear_detaches_everything() {
        let mut system = builder().emitter(Vec3::ZERO).rate(0.0).build().unwrap();
        system.burst(4);
        assert_eq!(system.clear(), 4);
        assert!(system.is_empty());
        assert!(system.parent().live.is_empty());
        assert_eq!(system.parent().removed.len(), 4);
        assert_eq!(system.clear(), 0);
    }

    #[test]
    fn test_owned_parent_reachable() {
        let mut system = builder().emitter(Vec3::ZERO).rate(0.0).build().unwrap();
        system.burst(2);
        let texture = Rc::new(Texture::solid(0, 0, 0, 0));
        let extra = system
            .parent_mut()
            .add_child(Sprite::new(Billboard::default(), texture));
        system.clear();
        // Only the engine's own sprites are detached.
        assert_eq!(system.parent().live.len(), 1);
        assert!(system.parent().live.contains_key(&extra));
    }

    #[test]
    fn test_set_rate_rejects_nan() {
        let mut system = builder().emitter(Vec3::ZERO).rate(2.0).build().unwrap();
        assert!(system.set_rate(f32::NAN).is_err());
        assert_eq!(system.rate(), 2.0);
    }

    #[test]
    fn test_speed_span_respected() {
        let mut system = builder()
            .emitter(Vec3::ZERO)
            .emission(Emission {
                speed: Span::new(1.0, 2.0),
                drift: 0.0,
                ..Default::default()
            })
            .rate(0.0)
            .build()
            .unwrap();
        system.burst(50);
        for particle in system.particles() {
            let speed = particle.velocity.length();
            assert!((1.0 - 1e-4..=2.0 + 1e-4).contains(&speed), "speed {speed}");
        }
    }
}
