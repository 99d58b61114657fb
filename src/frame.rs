//! Frame container handed to the detector.
//!
//! - `Frame`: width, height and a flat RGBA buffer. Immutable once built.
//! - `Rgba`: one decoded sample.
//!
//! The detector only reads through `Frame::pixel`, which bounds-checks the
//! RGBA offset instead of indexing, so a short or corrupt buffer surfaces as
//! `DetectError::PixelAccessFailure` rather than a panic.

use sha2::{Digest, Sha256};

use crate::error::DetectError;

/// Bytes per RGBA sample.
pub const BYTES_PER_PIXEL: usize = 4;

/// Default intensity floor for the "camera is delivering something" check.
pub const DEFAULT_CONTENT_FLOOR: u8 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque pixel.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Mean of the three colour channels.
    pub fn intensity(&self) -> f32 {
        (self.r as f32 + self.g as f32 + self.b as f32) / 3.0
    }
}

/// Rasterized frame. No interior mutability, no pixel setters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Frame {
    /// Wrap an RGBA buffer. The buffer length is not checked here; pixel reads
    /// report any shortfall.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    /// Frame filled with a single colour.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * BYTES_PER_PIXEL);
        for _ in 0..pixels {
            data.extend_from_slice(&[color.r, color.g, color.b, color.a]);
        }
        Self::new(data, width, height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Number of bytes a well-formed frame of these dimensions holds.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * BYTES_PER_PIXEL
    }

    /// True when there is nothing to analyse.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }

    /// Read the RGBA quadruplet at `(x, y)`, i.e. bytes `(y*width + x)*4 ..+4`.
    pub fn pixel(&self, x: u32, y: u32) -> Result<Rgba, DetectError> {
        let index = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        match self.data.get(index..index + BYTES_PER_PIXEL) {
            Some(px) => Ok(Rgba::new(px[0], px[1], px[2], px[3])),
            None => Err(DetectError::PixelAccessFailure {
                index,
                len: self.data.len(),
            }),
        }
    }

    /// Caller-side pre-check: does any pixel rise above `floor` on any colour
    /// channel? Alpha is ignored.
    pub fn has_content(&self, floor: u8) -> bool {
        self.data
            .chunks_exact(BYTES_PER_PIXEL)
            .any(|px| px[0] > floor || px[1] > floor || px[2] > floor)
    }

    /// SHA-256 over dimensions and pixels, used to recognise repeated frames.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.width.to_le_bytes());
        hasher.update(self.height.to_le_bytes());
        hasher.update(&self.data);
        hasher.finalize().into()
    }
}
