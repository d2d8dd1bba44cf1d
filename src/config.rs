//! Serializable engine settings.
//!
//! Everything about a smoke effect except its collaborators (camera,
//! anchors, parent, texture) lives in [`SmokeSettings`], which can be built
//! in code or read from JSON. Missing keys fall back to the defaults:
//!
//! ```json
//! {
//!   "rate": 15.0,
//!   "selection": "round_robin",
//!   "lifecycle": {
//!     "lifetime": { "min": 4.0, "max": 6.0 },
//!     "scale": { "start": 1.0, "end": 8.0, "growth": "ease_out" },
//!     "opacity": { "start": 0.5, "fade": "smooth" }
//!   },
//!   "emission": { "direction": [0.0, 1.0, 0.0], "spread": 0.35 },
//!   "billboard": "view_plane",
//!   "max_particles": 2000,
//!   "seed": 7
//! }
//! ```

use crate::camera::{BillboardMode, FixedCamera};
use crate::emitter::{Emission, EmitterSelection};
use crate::error::ConfigError;
use crate::lifecycle::Lifecycle;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tunables for one particle system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokeSettings {
    /// Target spawn rate in particles per second. Zero stops spawning.
    pub rate: f32,
    /// Which emitter each new particle comes from.
    pub selection: EmitterSelection,
    /// Lifetime range and size/opacity curves.
    pub lifecycle: Lifecycle,
    /// Launch direction, speed, spread, jitter and drift.
    pub emission: Emission,
    /// Billboard orientation policy.
    pub billboard: BillboardMode,
    /// Hard cap on live particles. Spawns beyond it are dropped.
    pub max_particles: Option<usize>,
    /// Largest `dt` a single update will simulate.
    pub max_delta: Option<f32>,
    /// RNG seed for reproducible runs; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SmokeSettings {
    fn default() -> Self {
        Self {
            rate: 15.0,
            selection: EmitterSelection::RoundRobin,
            lifecycle: Lifecycle::smoke(),
            emission: Emission::default(),
            billboard: BillboardMode::ViewPlane,
            max_particles: None,
            max_delta: None,
            seed: None,
        }
    }
}

impl SmokeSettings {
    /// Parse settings from a JSON string and validate them.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(input)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file and validate them.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_rate(self.rate)?;
        self.lifecycle.validate()?;
        self.emission.validate()?;
        if self.max_particles == Some(0) {
            return Err(ConfigError::InvalidLimit(
                "max_particles must be at least 1".to_string(),
            ));
        }
        if let Some(max) = self.max_delta {
            if !(max.is_finite() && max > 0.0) {
                return Err(ConfigError::InvalidLimit(format!(
                    "max_delta must be a positive number of seconds (got {max})"
                )));
            }
        }
        Ok(())
    }
}

/// Highest accepted spawn rate in particles per second.
pub const MAX_RATE: f32 = 1.0e6;

/// Rates must lie within `0..=MAX_RATE`.
pub(crate) fn validate_rate(rate: f32) -> Result<(), ConfigError> {
    if (0.0..=MAX_RATE).contains(&rate) {
        Ok(())
    } else {
        Err(ConfigError::InvalidRate(rate))
    }
}

/// Scene description consumed by the `billow` demo binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneFile {
    /// Anchor positions.
    pub emitters: Vec<Vec3>,
    /// Viewer placement.
    pub camera: FixedCamera,
    /// Optional PNG/JPEG for the puffs; a procedural puff is used otherwise.
    pub texture: Option<PathBuf>,
    /// Engine settings.
    pub settings: SmokeSettings,
    /// Seconds to simulate.
    pub duration: f32,
    /// Simulated frames per second.
    pub fps: f32,
}

impl Default for SceneFile {
    fn default() -> Self {
        Self {
            emitters: vec![
                Vec3::new(-8.0, 1.0, -20.0),
                Vec3::new(-4.0, 1.0, -20.0),
                Vec3::new(0.0, 1.0, -20.0),
                Vec3::new(4.0, 1.0, -20.0),
                Vec3::new(12.0, 3.0, -20.0),
            ],
            camera: FixedCamera::new(
                Vec3::new(0.0, 5.0, 10.0),
                Vec3::new(0.0, 3.0, -20.0),
            ),
            texture: None,
            settings: SmokeSettings::default(),
            duration: 10.0,
            fps: 60.0,
        }
    }
}

impl SceneFile {
    /// Read a scene from a JSON file and validate it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let scene: Self = serde_json::from_str(&text)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Check the settings plus the run length.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.emitters.is_empty() {
            return Err(ConfigError::NoEmitters);
        }
        self.settings.validate()?;
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(ConfigError::InvalidLimit(format!(
                "fps must be positive (got {})",
                self.fps
            )));
        }
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err(ConfigError::InvalidLimit(format!(
                "duration must be non-negative (got {})",
                self.duration
            )));
        }
        Ok(())
    }

    /// Number of fixed-delta frames needed to cover `duration`.
    pub fn frame_count(&self) -> u64 {
        (self.duration * self.fps).ceil() as u64
    }
}
