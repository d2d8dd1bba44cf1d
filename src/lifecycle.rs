//! Particle lifecycle curves.
//!
//! A particle's look is a pure function of its life ratio
//! `age / lifetime`: it grows as it ages and fades out as it nears expiry.
//!
//! | Curve | Shape | Guarantee |
//! |-------|-------|-----------|
//! | [`ScaleCurve`] | `start` → `end` | never shrinks |
//! | [`FadeCurve`] | `start` → `0` | never brightens, exactly 0 at expiry |
//!
//! # Quick Start
//!
//! ```ignore
//! let life = Lifecycle::smoke()
//!     .lifetime(3.0, 5.0)
//!     .grow(1.0, 6.0)
//!     .fade(0.6, Fade::Smooth);
//! ```

use crate::emitter::Span;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Easing applied to size growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Growth {
    /// Constant growth rate.
    #[default]
    Linear,
    /// Fast initial billow that settles toward the end size.
    EaseOut,
}

/// Easing applied to opacity decay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fade {
    /// Constant fade rate.
    Linear,
    /// Drops quickly, lingers faintly.
    Quadratic,
    /// Holds near full opacity, then eases out.
    #[default]
    Smooth,
}

/// Size over life.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleCurve {
    /// Size at birth.
    pub start: f32,
    /// Size at expiry.
    pub end: f32,
    /// Easing.
    #[serde(default)]
    pub growth: Growth,
}

impl ScaleCurve {
    /// Size at `ratio` in `[0, 1]`.
    pub fn at(&self, ratio: f32) -> f32 {
        let t = clamp_ratio(ratio);
        let eased = match self.growth {
            Growth::Linear => t,
            Growth::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
        };
        self.start + (self.end - self.start) * eased.clamp(0.0, 1.0)
    }
}

/// Opacity over life.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FadeCurve {
    /// Opacity at birth.
    pub start: f32,
    /// Easing.
    #[serde(default)]
    pub fade: Fade,
}

impl FadeCurve {
    /// Opacity at `ratio` in `[0, 1]`.
    pub fn at(&self, ratio: f32) -> f32 {
        let remaining = 1.0 - clamp_ratio(ratio);
        let eased = match self.fade {
            Fade::Linear => remaining,
            Fade::Quadratic => remaining * remaining,
            Fade::Smooth => remaining * remaining * (3.0 - 2.0 * remaining),
        };
        self.start * eased.clamp(0.0, 1.0)
    }
}

/// Lifetime range plus the curves driving size and opacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lifecycle {
    /// Per-particle lifetime in seconds, sampled at spawn.
    pub lifetime: Span,
    /// Size over life.
    pub scale: ScaleCurve,
    /// Opacity over life.
    pub opacity: FadeCurve,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::smoke()
    }
}

impl Lifecycle {
    // =========================================================================
    // PRESETS
    // =========================================================================

    /// Smoke preset: long-lived puffs that billow out and thin away.
    pub fn smoke() -> Self {
        Self {
            lifetime: Span::new(4.0, 6.0),
            scale: ScaleCurve {
                start: 1.0,
                end: 8.0,
                growth: Growth::EaseOut,
            },
            opacity: FadeCurve {
                start: 0.5,
                fade: Fade::Smooth,
            },
        }
    }

    /// Steam preset: short, bright wisps that vanish quickly.
    pub fn steam() -> Self {
        Self {
            lifetime: Span::new(1.0, 1.8),
            scale: ScaleCurve {
                start: 0.4,
                end: 2.0,
                growth: Growth::Linear,
            },
            opacity: FadeCurve {
                start: 0.8,
                fade: Fade::Quadratic,
            },
        }
    }

    // =========================================================================
    // BUILDER METHODS
    // =========================================================================

    /// Set a random lifetime range in seconds.
    pub fn lifetime(mut self, min: f32, max: f32) -> Self {
        self.lifetime = Span::new(min, max);
        self
    }

    /// Set a fixed lifetime for all particles.
    pub fn fixed_lifetime(mut self, seconds: f32) -> Self {
        self.lifetime = Span::fixed(seconds);
        self
    }

    /// Grow linearly from `start` to `end`.
    pub fn grow(mut self, start: f32, end: f32) -> Self {
        self.scale.start = start;
        self.scale.end = end;
        self
    }

    /// Set the growth easing.
    pub fn growth(mut self, growth: Growth) -> Self {
        self.scale.growth = growth;
        self
    }

    /// Fade from `start` opacity with the given easing.
    pub fn fade(mut self, start: f32, fade: Fade) -> Self {
        self.opacity = FadeCurve { start, fade };
        self
    }

    // =========================================================================
    // EVALUATION
    // =========================================================================

    /// Size at `ratio`.
    #[inline]
    pub fn scale_at(&self, ratio: f32) -> f32 {
        self.scale.at(ratio)
    }

    /// Opacity at `ratio`.
    #[inline]
    pub fn opacity_at(&self, ratio: f32) -> f32 {
        self.opacity.at(ratio)
    }

    /// Check the lifetime range and curves.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidLifetime`] unless `0 < min <= max`
    /// - [`ConfigError::InvalidScale`] if the curve would shrink or starts non-positive
    /// - [`ConfigError::InvalidOpacity`] if the start opacity is outside `0..=1`
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Span { min, max } = self.lifetime;
        if !self.lifetime.is_ordered() || min <= 0.0 {
            return Err(ConfigError::InvalidLifetime { min, max });
        }
        let ScaleCurve { start, end, .. } = self.scale;
        if !(start.is_finite() && end.is_finite() && start > 0.0 && end >= start) {
            return Err(ConfigError::InvalidScale { start, end });
        }
        if !(0.0..=1.0).contains(&self.opacity.start) {
            return Err(ConfigError::InvalidOpacity(self.opacity.start));
        }
        Ok(())
    }
}

/// Clamp into `[0, 1]`, mapping NaN to 0.
#[inline]
fn clamp_ratio(ratio: f32) -> f32 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FADES: [Fade; 3] = [Fade::Linear, Fade::Quadratic, Fade::Smooth];
    const GROWTHS: [Growth; 2] = [Growth::Linear, Growth::EaseOut];

    #[test]
    fn test_presets_valid() {
        assert!(Lifecycle::smoke().validate().is_ok());
        assert!(Lifecycle::steam().validate().is_ok());
    }

    #[test]
    fn test_opacity_endpoints() {
        for fade in FADES {
            let curve = FadeCurve { start: 0.7, fade };
            assert!((curve.at(0.0) - 0.7).abs() < 1e-6);
            assert_eq!(curve.at(1.0), 0.0);
            assert_eq!(curve.at(1.5), 0.0);
        }
    }

    #[test]
    fn test_scale_endpoints() {
        for growth in GROWTHS {
            let curve = ScaleCurve {
                start: 1.0,
                end: 3.0,
                growth,
            };
            assert_eq!(curve.at(0.0), 1.0);
            assert_eq!(curve.at(1.0), 3.0);
            assert_eq!(curve.at(-1.0), 1.0);
        }
    }

    #[test]
    fn test_monotonic_over_samples() {
        let life = Lifecycle::smoke();
        for fade in FADES {
            for growth in GROWTHS {
                let life = life.fade(0.9, fade).growth(growth);
                let mut last_scale = f32::MIN;
                let mut last_opacity = f32::MAX;
                for i in 0..=100 {
                    let r = i as f32 / 100.0;
                    let s = life.scale_at(r);
                    let o = life.opacity_at(r);
                    assert!(s >= last_scale, "{growth:?} shrank at {r}");
                    assert!(o <= last_opacity, "{fade:?} brightened at {r}");
                    last_scale = s;
                    last_opacity = o;
                }
            }
        }
    }

    #[test]
    fn test_nan_ratio_treated_as_birth() {
        let life = Lifecycle::steam();
        assert_eq!(life.scale_at(f32::NAN), life.scale.start);
        assert_eq!(life.opacity_at(f32::NAN), life.opacity.start);
    }

    #[test]
    fn test_validate_rejects() {
        assert!(matches!(
            Lifecycle::smoke().lifetime(0.0, 1.0).validate(),
            Err(ConfigError::InvalidLifetime { .. })
        ));
        assert!(matches!(
            Lifecycle::smoke().lifetime(3.0, 2.0).validate(),
            Err(ConfigError::InvalidLifetime { .. })
        ));
        assert!(matches!(
            Lifecycle::smoke().grow(2.0, 1.0).validate(),
            Err(ConfigError::InvalidScale { .. })
        ));
        assert!(matches!(
            Lifecycle::smoke().fade(1.5, Fade::Linear).validate(),
            Err(ConfigError::InvalidOpacity(_))
        ));
    }
}
