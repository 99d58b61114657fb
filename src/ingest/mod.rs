//! Frame sources.
//!
//! - `stub://<scene>`: deterministic synthetic frames (tests, demos)
//! - local image files (feature: ingest-image)
//!
//! Camera acquisition belongs to the host application; these sources only
//! exist so the detector can be driven from the command line and from tests.
//! Sources MUST NOT fetch remote URLs.

#[cfg(feature = "ingest-image")]
pub mod image_file;
pub mod synthetic;

use anyhow::{anyhow, Result};

use crate::frame::Frame;

#[cfg(feature = "ingest-image")]
pub use image_file::ImageFileSource;
pub use synthetic::{Scene, SyntheticSource};

/// Configuration shared by all sources.
#[derive(Clone, Debug)]
pub struct SourceConfig {
    /// `stub://<scene>` or a local file path.
    pub url: String,
    /// Frame width. Image sources downscale wider images to this width.
    pub width: u32,
    /// Frame height (synthetic sources only).
    pub height: u32,
    /// Seed for synthetic noise.
    pub seed: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: "stub://hands".to_string(),
            width: 640,
            height: 480,
            seed: 0,
        }
    }
}

/// Statistics for a frame source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceStats {
    pub frames_captured: u64,
    pub url: String,
}

/// Pull-based frame source. One frame per polling tick.
pub trait FrameSource {
    fn connect(&mut self) -> Result<()>;

    fn next_frame(&mut self) -> Result<Frame>;

    fn is_healthy(&self) -> bool;

    fn stats(&self) -> SourceStats;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn connect(&mut self) -> Result<()> {
        (**self).connect()
    }

    fn next_frame(&mut self) -> Result<Frame> {
        (**self).next_frame()
    }

    fn is_healthy(&self) -> bool {
        (**self).is_healthy()
    }

    fn stats(&self) -> SourceStats {
        (**self).stats()
    }
}

/// Open the source named by `config.url`.
pub fn open_source(config: SourceConfig) -> Result<Box<dyn FrameSource + Send>> {
    if !is_local_source(&config.url) {
        return Err(anyhow!(
            "only stub:// scenes and local file paths are supported (got '{}')",
            config.url
        ));
    }
    if config.url.starts_with("stub://") {
        return Ok(Box::new(SyntheticSource::new(config)?));
    }
    #[cfg(feature = "ingest-image")]
    {
        Ok(Box::new(ImageFileSource::new(config)?))
    }
    #[cfg(not(feature = "ingest-image"))]
    {
        Err(anyhow!(
            "image file ingestion requires the ingest-image feature"
        ))
    }
}

fn is_local_source(url: &str) -> bool {
    if url.trim().is_empty() {
        return false;
    }
    if url.starts_with("stub://") {
        return true;
    }
    !url.contains("://")
}
