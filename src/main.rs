//! Headless smoke driver.
//!
//! Runs a scene through the particle system at a fixed frame rate and logs
//! what happens, without opening a window. Useful for tuning settings files
//! and for checking that a long run stays bounded.
//!
//! ```text
//! billow [--scene scene.json] [--frames N] [--fps F] [--texture smoke.png]
//! ```

use anyhow::{bail, Context, Result};
use billow::prelude::*;
use billow::SceneFile;
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let options = CliOptions::parse(env::args().skip(1))?;
    let scene_file = options.load_scene()?;
    run(&scene_file, options.frames)
}

#[derive(Debug, Default)]
struct CliOptions {
    scene: Option<PathBuf>,
    frames: Option<u64>,
    fps: Option<f32>,
    texture: Option<PathBuf>,
}

impl CliOptions {
    fn parse<I>(mut args: I) -> Result<Self>
    where
        I: Iterator<Item = String>,
    {
        let mut options = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--scene" => options.scene = args.next().map(PathBuf::from),
                "--texture" => options.texture = args.next().map(PathBuf::from),
                "--frames" => {
                    let value = args.next().context("--frames needs a value")?;
                    let frames = value
                        .parse()
                        .with_context(|| format!("bad frame count '{value}'"))?;
                    options.frames = Some(frames);
                }
                "--fps" => {
                    let value = args.next().context("--fps needs a value")?;
                    let fps = value
                        .parse()
                        .with_context(|| format!("bad fps '{value}'"))?;
                    options.fps = Some(fps);
                }
                other => bail!("unknown argument '{other}'"),
            }
        }
        Ok(options)
    }

    fn load_scene(&self) -> Result<SceneFile> {
        let mut scene = match &self.scene {
            Some(path) => SceneFile::from_path(path)
                .with_context(|| format!("failed to load scene from {}", path.display()))?,
            None => SceneFile::default(),
        };
        if let Some(fps) = self.fps {
            scene.fps = fps;
        }
        if let Some(texture) = &self.texture {
            scene.texture = Some(texture.clone());
        }
        scene.validate().context("invalid scene")?;
        Ok(scene)
    }
}

fn run(scene_file: &SceneFile, frames: Option<u64>) -> Result<()> {
    let texture = match &scene_file.texture {
        Some(path) => Texture::from_file(path)
            .with_context(|| format!("failed to load texture {}", path.display()))?,
        None => Texture::soft_puff(64),
    };

    let scene = Rc::new(RefCell::new(Scene::new()));
    let camera = Rc::new(scene_file.camera);
    let mut smoke = ParticleSystem::builder()
        .settings(scene_file.settings.clone())
        .camera(camera)
        .parent(Rc::clone(&scene))
        .emitters(scene_file.emitters.iter().copied())
        .texture(texture)
        .build()
        .context("failed to build particle system")?;

    let frames = frames.unwrap_or_else(|| scene_file.frame_count());
    let per_second = scene_file.fps.round().max(1.0) as u64;
    let mut clock = FrameClock::fixed(1.0 / scene_file.fps);
    info!(
        frames,
        fps = scene_file.fps,
        emitters = smoke.emitter_count(),
        "running smoke scene"
    );

    let mut peak = 0;
    for frame in 1..=frames {
        smoke.update(clock.tick());
        peak = peak.max(smoke.len());
        if frame % per_second == 0 {
            let stats = smoke.stats();
            info!(
                elapsed = clock.elapsed(),
                dt = clock.delta(),
                live = stats.live,
                spawned = stats.spawned_total,
                expired = stats.expired_total,
                sprites = scene.borrow().len(),
                "smoke"
            );
        }
    }

    let stats = smoke.stats();
    let removed = smoke.clear();
    let leftover = scene.borrow().len();
    info!(
        spawned = stats.spawned_total,
        expired = stats.expired_total,
        capped = stats.capped_total,
        peak,
        removed,
        "teardown complete"
    );
    if leftover != 0 {
        warn!(leftover, "sprites left in scene after teardown");
        bail!("{leftover} sprites leaked into the scene");
    }
    Ok(())
}
