//! Synthetic `stub://` source.
//!
//! Scenes are drawn on a noisy dark-blue background whose red channel never
//! reaches the skin ranges, so only the painted shapes can be classified as
//! skin. Noise is seeded, which keeps every run reproducible.

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::str::FromStr;

use super::{FrameSource, SourceConfig, SourceStats};
use crate::frame::{Frame, Rgba, BYTES_PER_PIXEL};

const HAND_TONE: Rgba = Rgba::rgb(150, 100, 80);
const FACE_TONE: Rgba = Rgba::rgb(200, 140, 110);
const TONE_JITTER: i16 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scene {
    /// All-black frames, as delivered by a camera that is not streaming yet.
    Blank,
    /// Background noise only.
    Background,
    /// A face in the upper centre.
    Face,
    /// Two hands in the lower corners.
    Hands,
    /// Hands on odd frames, face on even frames.
    Alternate,
}

impl FromStr for Scene {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "blank" => Ok(Scene::Blank),
            "background" => Ok(Scene::Background),
            "face" => Ok(Scene::Face),
            "hands" => Ok(Scene::Hands),
            "alternate" => Ok(Scene::Alternate),
            other => Err(anyhow!(
                "unknown synthetic scene '{}'; expected blank, background, face, hands or alternate",
                other
            )),
        }
    }
}

/// Rectangle in frame fractions, half-open.
struct Patch {
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
    tone: Rgba,
}

const FACE_PATCHES: &[Patch] = &[Patch {
    x0: 0.35,
    x1: 0.65,
    y0: 0.10,
    y1: 0.55,
    tone: FACE_TONE,
}];

const HAND_PATCHES: &[Patch] = &[
    Patch {
        x0: 0.02,
        x1: 0.22,
        y0: 0.65,
        y1: 0.98,
        tone: HAND_TONE,
    },
    Patch {
        x0: 0.78,
        x1: 0.98,
        y0: 0.65,
        y1: 0.98,
        tone: HAND_TONE,
    },
];

pub struct SyntheticSource {
    config: SourceConfig,
    scene: Scene,
    rng: StdRng,
    frame_count: u64,
}

impl SyntheticSource {
    pub fn new(config: SourceConfig) -> Result<Self> {
        let name = config
            .url
            .strip_prefix("stub://")
            .ok_or_else(|| anyhow!("synthetic source needs a stub:// url"))?;
        let scene = name.parse()?;
        if config.width == 0 || config.height == 0 {
            return Err(anyhow!("synthetic frames need non-zero dimensions"));
        }
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            scene,
            rng,
            frame_count: 0,
        })
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    fn patches(&self) -> &'static [Patch] {
        match self.scene {
            Scene::Blank | Scene::Background => &[],
            Scene::Face => FACE_PATCHES,
            Scene::Hands => HAND_PATCHES,
            Scene::Alternate if self.frame_count % 2 == 1 => HAND_PATCHES,
            Scene::Alternate => FACE_PATCHES,
        }
    }

    fn render(&mut self) -> Vec<u8> {
        let (w, h) = (self.config.width, self.config.height);
        let mut pixels = vec![0u8; w as usize * h as usize * BYTES_PER_PIXEL];
        if self.scene == Scene::Blank {
            return pixels;
        }
        let patches = self.patches();

        for y in 0..h {
            let fy = y as f64 / h as f64;
            for x in 0..w {
                let fx = x as f64 / w as f64;
                let tone = patches
                    .iter()
                    .find(|p| fx >= p.x0 && fx < p.x1 && fy >= p.y0 && fy < p.y1)
                    .map(|p| p.tone);
                let px = match tone {
                    Some(tone) => self.jitter(tone),
                    None => Rgba::rgb(
                        self.rng.gen_range(20..=40),
                        self.rng.gen_range(40..=60),
                        self.rng.gen_range(70..=90),
                    ),
                };
                let i = (y as usize * w as usize + x as usize) * BYTES_PER_PIXEL;
                pixels[i..i + BYTES_PER_PIXEL].copy_from_slice(&[px.r, px.g, px.b, px.a]);
            }
        }
        pixels
    }

    fn jitter(&mut self, tone: Rgba) -> Rgba {
        let mut channel = |v: u8| {
            let d = self.rng.gen_range(-TONE_JITTER..=TONE_JITTER);
            (v as i16 + d).clamp(0, 255) as u8
        };
        Rgba::rgb(channel(tone.r), channel(tone.g), channel(tone.b))
    }
}

impl FrameSource for SyntheticSource {
    fn connect(&mut self) -> Result<()> {
        log::info!("SyntheticSource: connected to {} ({:?})", self.config.url, self.scene);
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Frame> {
        self.frame_count += 1;
        let pixels = self.render();
        Ok(Frame::new(pixels, self.config.width, self.config.height))
    }

    fn is_healthy(&self) -> bool {
        true
    }

    fn stats(&self) -> SourceStats {
        SourceStats {
            frames_captured: self.frame_count,
            url: self.config.url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{classify_frame, Verdict};
    use crate::frame::DEFAULT_CONTENT_FLOOR;

    fn source(scene: &str) -> SyntheticSource {
        SyntheticSource::new(SourceConfig {
            url: format!("stub://{}", scene),
            ..SourceConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn unknown_scene_is_rejected() {
        assert!(SyntheticSource::new(SourceConfig {
            url: "stub://fireworks".into(),
            ..SourceConfig::default()
        })
        .is_err());
    }

    #[test]
    fn blank_scene_has_no_content() {
        let frame = source("blank").next_frame().unwrap();
        assert!(!frame.has_content(DEFAULT_CONTENT_FLOOR));
    }

    #[test]
    fn background_has_content_but_no_skin() {
        let frame = source("background").next_frame().unwrap();
        assert!(frame.has_content(DEFAULT_CONTENT_FLOOR));
        let r = classify_frame(&frame, 10);
        assert_eq!(r.skin_regions, 0);
    }

    #[test]
    fn hands_scene_is_detected_face_scene_is_not() {
        let hands = classify_frame(&source("hands").next_frame().unwrap(), 10);
        assert_eq!(hands.verdict, Verdict::HandDetected);

        let face = classify_frame(&source("face").next_frame().unwrap(), 10);
        assert_eq!(face.verdict, Verdict::NoHand);
        assert_eq!(face.hand_regions, 0);
    }

    #[test]
    fn alternate_scene_flips_each_frame() {
        let mut src = source("alternate");
        let first = classify_frame(&src.next_frame().unwrap(), 10);
        let second = classify_frame(&src.next_frame().unwrap(), 10);
        assert!(first.hand_detected());
        assert!(!second.hand_detected());
    }

    #[test]
    fn same_seed_same_frames() {
        let a = source("hands").next_frame().unwrap();
        let b = source("hands").next_frame().unwrap();
        assert_eq!(a, b);
    }
}
