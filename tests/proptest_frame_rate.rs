//! Property-based tests for spawn timing and particle lifecycles.
//!
//! Validates invariants that must hold for any frame pacing:
//! - Spawn count depends on total elapsed time, not on how it is sliced
//! - No observable particle is at or past its lifetime
//! - Each particle only ever grows and only ever fades

use billow::prelude::*;
use billow::NodeId;
use proptest::prelude::*;
use std::collections::HashMap;

fn system(rate: f32, lifecycle: Lifecycle, seed: u64) -> ParticleSystem<Scene, FixedCamera> {
    ParticleSystem::builder()
        .camera(FixedCamera::default())
        .parent(Scene::new())
        .emitters([Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0)])
        .rate(rate)
        .lifecycle(lifecycle)
        .texture(Texture::soft_puff(4))
        .seed(seed)
        .build()
        .unwrap()
}

fn lifecycle_strategy() -> impl Strategy<Value = Lifecycle> {
    (
        0.1f32..3.0,
        0.0f32..2.0,
        prop_oneof![Just(Fade::Linear), Just(Fade::Quadratic), Just(Fade::Smooth)],
        prop_oneof![Just(Growth::Linear), Just(Growth::EaseOut)],
    )
        .prop_map(|(min, extra, fade, growth)| {
            Lifecycle::smoke()
                .lifetime(min, min + extra)
                .fade(0.8, fade)
                .growth(growth)
        })
}

proptest! {
    /// Property: total spawns track floor(rate * elapsed) within one
    #[test]
    fn spawn_count_matches_elapsed_time(
        rate in 0.0f32..60.0,
        dts in prop::collection::vec(0.001f32..0.25, 1..200),
    ) {
        let mut smoke = system(rate, Lifecycle::smoke(), 1);
        for &dt in &dts {
            smoke.update(dt);
        }

        let elapsed: f64 = dts.iter().map(|&dt| f64::from(dt)).sum();
        let expected = (f64::from(rate) * elapsed).floor() as i64;
        let spawned = smoke.stats().spawned_total as i64;
        prop_assert!(
            (spawned - expected).abs() <= 1,
            "spawned {} but rate {} over {}s expects {}",
            spawned, rate, elapsed, expected
        );
    }

    /// Property: one big step and many small steps spawn the same amount
    #[test]
    fn spawn_count_independent_of_slicing(
        rate in 0.0f32..40.0,
        frames in 1usize..240,
        dt in 0.002f32..0.1,
    ) {
        let mut sliced = system(rate, Lifecycle::smoke(), 2);
        let mut whole = system(rate, Lifecycle::smoke(), 2);
        for _ in 0..frames {
            sliced.update(dt);
        }
        whole.update(dt * frames as f32);

        let a = sliced.stats().spawned_total as i64;
        let b = whole.stats().spawned_total as i64;
        prop_assert!((a - b).abs() <= 1, "sliced {} vs whole {}", a, b);
    }

    /// Property: after every update all particles are strictly alive and
    /// the scene holds exactly one sprite per particle
    #[test]
    fn observable_particles_are_alive(
        life in lifecycle_strategy(),
        dts in prop::collection::vec(0.0f32..0.5, 1..150),
        seed in any::<u64>(),
    ) {
        let mut smoke = system(20.0, life, seed);
        for &dt in &dts {
            smoke.update(dt);
            prop_assert_eq!(smoke.parent().len(), smoke.len());
            for particle in smoke.particles() {
                prop_assert!(particle.age < particle.lifetime);
                prop_assert!(smoke.parent().contains(particle.node()));
            }
        }
    }

    /// Property: scale never decreases and opacity never increases for
    /// a given particle, and both stay within the curve's bounds
    #[test]
    fn particles_grow_and_fade_monotonically(
        life in lifecycle_strategy(),
        dts in prop::collection::vec(0.001f32..0.3, 1..150),
    ) {
        let mut smoke = system(15.0, life, 3);
        let mut seen: HashMap<NodeId, (f32, f32)> = HashMap::new();
        for &dt in &dts {
            smoke.update(dt);
            let mut current = HashMap::new();
            for particle in smoke.particles() {
                prop_assert!(
                    particle.scale >= life.scale.start && particle.scale <= life.scale.end
                );
                prop_assert!(particle.opacity >= 0.0 && particle.opacity <= life.opacity.start);
                if let Some(&(scale, opacity)) = seen.get(&particle.node()) {
                    prop_assert!(particle.scale >= scale);
                    prop_assert!(particle.opacity <= opacity);
                }
                current.insert(particle.node(), (particle.scale, particle.opacity));
            }
            seen = current;
        }
    }
}
