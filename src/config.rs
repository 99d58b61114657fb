use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::detect::{FrameClassifier, Thresholds, DEFAULT_BLOCK_SIZE};
use crate::frame::DEFAULT_CONTENT_FLOOR;
use crate::ingest::SourceConfig;

const DEFAULT_SOURCE_URL: &str = "stub://hands";
const DEFAULT_FRAME_WIDTH: u32 = 640;
const DEFAULT_FRAME_HEIGHT: u32 = 480;
const DEFAULT_POLL_MS: u64 = 500;

/// `env_logger` filter used by the binaries when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Deserialize, Default)]
struct WatchConfigFile {
    source: Option<SourceConfigFile>,
    detector: Option<DetectorConfigFile>,
    poll: Option<PollConfigFile>,
    thresholds: Option<Thresholds>,
}

#[derive(Debug, Deserialize, Default)]
struct SourceConfigFile {
    url: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    seed: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct DetectorConfigFile {
    block_size: Option<u32>,
    content_floor: Option<u8>,
}

#[derive(Debug, Deserialize, Default)]
struct PollConfigFile {
    interval_ms: Option<u64>,
}

/// Settings for the `gesture_watch` polling loop.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub source: SourceConfig,
    pub block_size: u32,
    pub content_floor: u8,
    pub poll_interval: Duration,
    pub thresholds: Thresholds,
}

impl WatchConfig {
    /// File named by `BISINDO_CONFIG` (if set), then environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("BISINDO_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: WatchConfigFile) -> Self {
        let source_file = file.source.unwrap_or_default();
        let detector_file = file.detector.unwrap_or_default();
        let source = SourceConfig {
            url: source_file
                .url
                .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string()),
            width: source_file.width.unwrap_or(DEFAULT_FRAME_WIDTH),
            height: source_file.height.unwrap_or(DEFAULT_FRAME_HEIGHT),
            seed: source_file.seed.unwrap_or(0),
        };
        let poll_interval = Duration::from_millis(
            file.poll
                .and_then(|poll| poll.interval_ms)
                .unwrap_or(DEFAULT_POLL_MS),
        );
        Self {
            source,
            block_size: detector_file.block_size.unwrap_or(DEFAULT_BLOCK_SIZE),
            content_floor: detector_file
                .content_floor
                .unwrap_or(DEFAULT_CONTENT_FLOOR),
            poll_interval,
            thresholds: file.thresholds.unwrap_or_default(),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("BISINDO_SOURCE") {
            if !url.trim().is_empty() {
                self.source.url = url;
            }
        }
        if let Ok(block) = std::env::var("BISINDO_BLOCK_SIZE") {
            self.block_size = block
                .trim()
                .parse()
                .map_err(|_| anyhow!("BISINDO_BLOCK_SIZE must be a positive integer"))?;
        }
        if let Ok(ms) = std::env::var("BISINDO_POLL_MS") {
            let ms: u64 = ms
                .trim()
                .parse()
                .map_err(|_| anyhow!("BISINDO_POLL_MS must be an integer number of milliseconds"))?;
            self.poll_interval = Duration::from_millis(ms);
        }
        if let Ok(floor) = std::env::var("BISINDO_CONTENT_FLOOR") {
            self.content_floor = floor
                .trim()
                .parse()
                .map_err(|_| anyhow!("BISINDO_CONTENT_FLOOR must be within 0..=255"))?;
        }
        if let Ok(seed) = std::env::var("BISINDO_SEED") {
            self.source.seed = seed
                .trim()
                .parse()
                .map_err(|_| anyhow!("BISINDO_SEED must be an unsigned integer"))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(anyhow!("block size must be at least 1 pixel"));
        }
        if self.poll_interval.is_zero() {
            return Err(anyhow!("poll interval must be greater than zero"));
        }
        if self.source.width == 0 || self.source.height == 0 {
            return Err(anyhow!("frame dimensions must be non-zero"));
        }
        self.thresholds.validate()
    }

    /// Classifier configured from these settings.
    pub fn classifier(&self) -> FrameClassifier {
        FrameClassifier::new(self.block_size).with_thresholds(self.thresholds.clone())
    }
}

fn read_config_file(path: &Path) -> Result<WatchConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let cfg = if is_toml {
        toml::from_str(&raw).map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    };
    Ok(cfg)
}
