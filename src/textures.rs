//! Billboard textures.
//!
//! A [`Texture`] is loaded once by the host and handed to the engine wrapped
//! in an `Rc`. Every sprite the engine creates clones the `Rc`, never the
//! pixels, so a thousand live particles still share one image.
//!
//! # Quick Start
//!
//! ```ignore
//! use billow::prelude::*;
//!
//! let smoke = Rc::new(Texture::from_file("assets/smoke.png")?);
//! // or, without an asset on disk:
//! let smoke = Rc::new(Texture::soft_puff(64));
//! ```
//!
//! # Supported Formats
//!
//! - PNG (recommended, keeps the alpha channel)
//! - JPEG

use crate::error::TextureError;
use std::path::Path;

/// Filter mode for texture sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Smooth linear filtering (default). Good for soft puffs.
    #[default]
    Linear,
    /// Sharp nearest-neighbor filtering. Good for pixel art.
    Nearest,
}

/// Address mode for texture wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressMode {
    /// Clamp to edge color (default). Coordinates outside 0-1 use edge pixels.
    #[default]
    ClampToEdge,
    /// Repeat/tile the texture. Coordinates wrap around.
    Repeat,
    /// Mirror the texture at boundaries.
    MirrorRepeat,
}

/// RGBA8 image shared read-only by every sprite of a particle system.
#[derive(Debug, Clone)]
pub struct Texture {
    /// Raw RGBA pixel data (width * height * 4 bytes).
    data: Vec<u8>,
    /// Texture width in pixels.
    width: u32,
    /// Texture height in pixels.
    height: u32,
    /// Filter mode for magnification/minification.
    pub filter: FilterMode,
    /// Address mode for UV coordinates outside 0-1.
    pub address_mode: AddressMode,
}

impl Texture {
    /// Create a texture from raw RGBA data.
    ///
    /// # Errors
    ///
    /// Returns [`TextureError::SizeMismatch`] if `data` is not exactly
    /// `width * height * 4` bytes long.
    ///
    /// # Example
    ///
    /// ```ignore
    /// // 2x1 texture: opaque white, transparent white
    /// let data = vec![255, 255, 255, 255, 255, 255, 255, 0];
    /// let tex = Texture::from_rgba(data, 2, 1)?;
    /// ```
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<Self, TextureError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(TextureError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            filter: FilterMode::Linear,
            address_mode: AddressMode::ClampToEdge,
        })
    }

    /// Load a texture from an image file.
    ///
    /// # Errors
    ///
    /// Returns [`TextureError::Io`] if the file cannot be read and
    /// [`TextureError::Image`] if it is not a decodable PNG or JPEG.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let bytes = std::fs::read(path.as_ref())?;
        let img = image::load_from_memory(&bytes)?.into_rgba8();
        let (width, height) = img.dimensions();
        tracing::debug!(
            path = %path.as_ref().display(),
            width,
            height,
            "loaded billboard texture"
        );
        Ok(Self {
            data: img.into_raw(),
            width,
            height,
            filter: FilterMode::Linear,
            address_mode: AddressMode::ClampToEdge,
        })
    }

    /// Set the filter mode.
    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    /// Set the address mode for UV wrapping.
    pub fn with_address_mode(mut self, mode: AddressMode) -> Self {
        self.address_mode = mode;
        self
    }

    /// Create a solid color texture (1x1 pixel).
    pub fn solid(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            data: vec![r, g, b, a],
            width: 1,
            height: 1,
            filter: FilterMode::Nearest,
            address_mode: AddressMode::ClampToEdge,
        }
    }

    /// Procedural smoke puff: white disc whose alpha falls off smoothly
    /// from the center to fully transparent at the rim.
    ///
    /// Handy when no smoke image is shipped with the host.
    pub fn soft_puff(size: u32) -> Self {
        let size = size.max(2);
        let mut data = Vec::with_capacity(size as usize * size as usize * 4);
        let half = (size - 1) as f32 / 2.0;
        for y in 0..size {
            for x in 0..size {
                let dx = (x as f32 - half) / half;
                let dy = (y as f32 - half) / half;
                let d = (dx * dx + dy * dy).sqrt().min(1.0);
                let falloff = 1.0 - d * d * (3.0 - 2.0 * d);
                data.extend_from_slice(&[255, 255, 255, (falloff * 255.0).round() as u8]);
            }
        }
        Self {
            data,
            width: size,
            height: size,
            filter: FilterMode::Linear,
            address_mode: AddressMode::ClampToEdge,
        }
    }

    /// Texture width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Texture height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    /// RGBA value at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = pixel_offset(self.width, x, y);
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }
}

/// Byte offset of pixel `(x, y)` in a row-major RGBA8 buffer.
#[inline]
fn pixel_offset(width: u32, x: u32, y: u32) -> usize {
    (y as usize * width as usize + x as usize) * 4
}
