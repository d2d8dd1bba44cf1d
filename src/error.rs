//! Error types for billow.
//!
//! Construction-time validation fails fast with [`ConfigError`]; texture
//! loading reports [`TextureError`]. The per-frame `update` path has no
//! error type at all.

use thiserror::Error;

/// Errors raised while validating engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The emitter list was empty.
    #[error("at least one emitter is required")]
    NoEmitters,
    /// Spawn rate was negative, not a number, or above
    /// [`MAX_RATE`](crate::config::MAX_RATE).
    #[error("spawn rate must lie within 0..=1000000 particles per second (got {0})")]
    InvalidRate(f32),
    /// Lifetime range was empty, reversed, or non-positive.
    #[error("lifetime range must satisfy 0 < min <= max (got {min}..={max})")]
    InvalidLifetime {
        /// Shortest lifetime in seconds.
        min: f32,
        /// Longest lifetime in seconds.
        max: f32,
    },
    /// Scale curve would shrink particles or used a non-positive start size.
    #[error("scale must start positive and never shrink (got {start} -> {end})")]
    InvalidScale {
        /// Scale at birth.
        start: f32,
        /// Scale at expiry.
        end: f32,
    },
    /// Starting opacity outside `0.0..=1.0`.
    #[error("opacity must lie within 0.0..=1.0 (got {0})")]
    InvalidOpacity(f32),
    /// Emission parameters were malformed.
    #[error("invalid emission settings: {0}")]
    InvalidEmission(String),
    /// A particle cap or delta clamp was zero, negative, or not finite.
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Builder finished without a camera.
    #[error("no camera provided, use .camera() to set one")]
    MissingCamera,
    /// Builder finished without a parent container.
    #[error("no parent container provided, use .parent() to set one")]
    MissingParent,
    /// Builder finished without a texture.
    #[error("no texture provided, use .texture() to set one")]
    MissingTexture,
    /// Settings file could not be parsed.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    /// Settings file could not be read.
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during texture loading.
#[derive(Debug, Error)]
pub enum TextureError {
    /// Failed to decode the image file.
    #[error("failed to load image: {0}")]
    Image(#[from] image::ImageError),
    /// Failed to read the file from disk.
    #[error("failed to read texture file: {0}")]
    Io(#[from] std::io::Error),
    /// Pixel buffer length does not match `width * height * 4`.
    #[error("RGBA data size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Byte count implied by the dimensions.
        expected: usize,
        /// Byte count actually supplied.
        actual: usize,
    },
}
