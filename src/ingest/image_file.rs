//! Still-image source.
//!
//! Decodes a local PNG/JPEG once, downscales it to the configured width
//! (detection is tuned for reduced frame sizes), and hands out the same
//! frame on every tick.

use anyhow::{anyhow, Context, Result};
use image::imageops::FilterType;
use image::GenericImageView;
use std::path::Path;

use super::{FrameSource, SourceConfig, SourceStats};
use crate::frame::Frame;

pub struct ImageFileSource {
    config: SourceConfig,
    frame: Option<Frame>,
    frame_count: u64,
}

impl ImageFileSource {
    pub fn new(config: SourceConfig) -> Result<Self> {
        if !Path::new(&config.url).is_file() {
            return Err(anyhow!("image file not found: {}", config.url));
        }
        Ok(Self {
            config,
            frame: None,
            frame_count: 0,
        })
    }
}

/// Decode and optionally downscale to `max_width`, keeping the aspect ratio.
pub fn load_frame(path: &Path, max_width: u32) -> Result<Frame> {
    let image =
        image::open(path).with_context(|| format!("decode image {}", path.display()))?;
    let (width, height) = image.dimensions();
    let image = if max_width > 0 && width > max_width {
        let scaled_height = ((height as u64 * max_width as u64) / width as u64).max(1) as u32;
        image.resize_exact(max_width, scaled_height, FilterType::Triangle)
    } else {
        image
    };
    let (width, height) = image.dimensions();
    let rgba = image.into_rgba8();
    Ok(Frame::new(rgba.into_raw(), width, height))
}

impl FrameSource for ImageFileSource {
    fn connect(&mut self) -> Result<()> {
        let frame = load_frame(Path::new(&self.config.url), self.config.width)?;
        log::info!(
            "ImageFileSource: loaded {} ({}x{})",
            self.config.url,
            frame.width(),
            frame.height()
        );
        self.frame = Some(frame);
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Frame> {
        let frame = self
            .frame
            .as_ref()
            .ok_or_else(|| anyhow!("image source not connected"))?;
        self.frame_count += 1;
        Ok(frame.clone())
    }

    fn is_healthy(&self) -> bool {
        self.frame.is_some()
    }

    fn stats(&self) -> SourceStats {
        SourceStats {
            frames_captured: self.frame_count,
            url: self.config.url.clone(),
        }
    }
}
