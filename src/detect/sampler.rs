use crate::error::DetectError;
use crate::frame::{Frame, Rgba, BYTES_PER_PIXEL};

use super::skin::pixel_confidence;

/// One grid sample: top-left pixel of a `block × block` cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockSample {
    pub x: u32,
    pub y: u32,
    pub pixel: Rgba,
}

/// Skin-coloured sample retained for positional analysis.
///
/// Fields are private: a region is fixed once sampled and only lives for one
/// detection pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    x: u32,
    y: u32,
    intensity: f32,
    confidence: f32,
}

impl Region {
    pub fn new(x: u32, y: u32, pixel: Rgba) -> Self {
        Self {
            x,
            y,
            intensity: pixel.intensity(),
            confidence: pixel_confidence(pixel),
        }
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    /// Mean of R, G and B at the sample point.
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Per-pixel score in `[0, 0.95]`.
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub(crate) fn xf(&self) -> f64 {
        self.x as f64
    }

    pub(crate) fn yf(&self) -> f64 {
        self.y as f64
    }
}

/// `ceil(width/block) * ceil(height/block)`. A zero block is treated as 1.
pub fn sample_count(width: u32, height: u32, block: u32) -> usize {
    let block = block.max(1);
    width.div_ceil(block) as usize * height.div_ceil(block) as usize
}

/// Grid points in row-major order: `y = 0, B, 2B..`, then `x = 0, B, 2B..`.
pub fn sample_points(width: u32, height: u32, block: u32) -> impl Iterator<Item = (u32, u32)> {
    let step = block.max(1) as usize;
    (0..height)
        .step_by(step)
        .flat_map(move |y| (0..width).step_by(step).map(move |x| (x, y)))
}

/// Read every grid sample from the frame.
///
/// Capacity is bounded by the pixels actually present, not the declared
/// dimensions, so a short buffer fails on the first bad read instead of
/// on allocation.
pub fn sample_blocks(frame: &Frame, block: u32) -> Result<Vec<BlockSample>, DetectError> {
    let present = frame.as_bytes().len() / BYTES_PER_PIXEL;
    let mut samples =
        Vec::with_capacity(sample_count(frame.width(), frame.height(), block).min(present));
    for (x, y) in sample_points(frame.width(), frame.height(), block) {
        let pixel = frame.pixel(x, y)?;
        samples.push(BlockSample { x, y, pixel });
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_matches_points() {
        for (w, h, b) in [(640, 480, 10), (641, 479, 8), (7, 3, 10), (10, 10, 1)] {
            assert_eq!(sample_points(w, h, b).count(), sample_count(w, h, b));
        }
        assert_eq!(sample_count(641, 479, 8), 81 * 60);
    }

    #[test]
    fn points_are_row_major() {
        let pts: Vec<_> = sample_points(25, 15, 10).collect();
        assert_eq!(
            pts,
            vec![(0, 0), (10, 0), (20, 0), (0, 10), (10, 10), (20, 10)]
        );
    }

    #[test]
    fn samples_read_top_left_pixel() {
        let frame = Frame::filled(20, 20, Rgba::rgb(150, 100, 80));
        let samples = sample_blocks(&frame, 10).unwrap();
        assert_eq!(samples.len(), 4);
        assert!(samples.iter().all(|s| s.pixel == Rgba::rgb(150, 100, 80)));
    }

    #[test]
    fn truncated_buffer_fails() {
        let frame = Frame::new(vec![0u8; 20 * 4], 20, 20);
        assert!(matches!(
            sample_blocks(&frame, 10),
            Err(DetectError::PixelAccessFailure { .. })
        ));
    }

    #[test]
    fn huge_declared_dimensions_fail_on_read() {
        let frame = Frame::new(vec![0u8; 4], 100_000, 100_000);
        assert_eq!(
            sample_blocks(&frame, 1),
            Err(DetectError::PixelAccessFailure { index: 4, len: 4 })
        );
    }

    #[test]
    fn region_derives_intensity_and_confidence() {
        let region = Region::new(4, 8, Rgba::rgb(255, 255, 255));
        assert_eq!(region.intensity(), 255.0);
        assert_eq!(region.confidence(), 0.95);
        assert_eq!((region.x(), region.y()), (4, 8));
    }
}
