//! Single-pass frame classifier.
//!
//! sample grid -> skin test -> face/hand filter -> gate + shape -> estimates.
//!
//! `FrameClassifier` holds only its parameters. Every call reads nothing but
//! the frame it is given, so repeated calls on the same frame agree.

use crate::error::DetectError;
use crate::frame::{Frame, BYTES_PER_PIXEL};

use super::estimate::filtered_ratio;
use super::result::{DetectionResult, Gesture, Verdict};
use super::sampler::{sample_blocks, Region};
use super::shape::ShapeRatios;
use super::thresholds::Thresholds;

/// Default grid stride in pixels.
pub const DEFAULT_BLOCK_SIZE: u32 = 10;

/// Intermediate state of one pass, exposed for diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameAnalysis {
    pub width: u32,
    pub height: u32,
    pub samples: usize,
    pub skin: Vec<Region>,
    pub hands: Vec<Region>,
    pub skin_ratio: f64,
    pub filtered_ratio: f64,
    pub shape: ShapeRatios,
}

#[derive(Clone, Debug)]
pub struct FrameClassifier {
    thresholds: Thresholds,
    block_size: u32,
}

impl Default for FrameClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCK_SIZE)
    }
}

impl FrameClassifier {
    /// Classifier with calibrated thresholds. A zero block size samples every pixel.
    pub fn new(block_size: u32) -> Self {
        Self {
            thresholds: Thresholds::default(),
            block_size: block_size.max(1),
        }
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Run the sampling and filtering stages without deciding.
    pub fn analyze(&self, frame: &Frame) -> Result<FrameAnalysis, DetectError> {
        if frame.is_empty() {
            return Err(DetectError::EmptyFrame);
        }
        let len = frame.as_bytes().len();
        if len < frame.expected_len() {
            // Offset of the first pixel the buffer cannot hold.
            return Err(DetectError::PixelAccessFailure {
                index: len - len % BYTES_PER_PIXEL,
                len,
            });
        }
        let (width, height) = (frame.width(), frame.height());

        let samples = sample_blocks(frame, self.block_size)?;
        let skin: Vec<Region> = samples
            .iter()
            .filter(|s| self.thresholds.skin.is_skin(s.pixel.r, s.pixel.g, s.pixel.b))
            .map(|s| Region::new(s.x, s.y, s.pixel))
            .collect();
        let hands = self
            .thresholds
            .zones
            .filter_hand_regions(&skin, width, height);

        let skin_ratio = skin.len() as f64 / samples.len() as f64;
        let filtered = filtered_ratio(hands.len(), skin.len());
        let shape = self.thresholds.shape.ratios(&hands, width, height);

        Ok(FrameAnalysis {
            width,
            height,
            samples: samples.len(),
            skin,
            hands,
            skin_ratio,
            filtered_ratio: filtered,
            shape,
        })
    }

    /// Gate plus shape heuristic over an analysis.
    pub fn is_hand(&self, analysis: &FrameAnalysis) -> bool {
        let gate = &self.thresholds.gate;
        analysis.skin_ratio > gate.min_skin_ratio
            && analysis.hands.len() > gate.min_hand_regions
            && analysis.filtered_ratio > gate.min_filtered_ratio
            && self
                .thresholds
                .shape
                .is_hand_shape(&analysis.hands, analysis.width, analysis.height)
    }

    /// Classify, returning typed errors.
    pub fn try_classify(&self, frame: &Frame) -> Result<DetectionResult, DetectError> {
        let analysis = self.analyze(frame)?;
        let estimate = &self.thresholds.estimate;

        let detected = self.is_hand(&analysis);
        let confidence = estimate.confidence(analysis.skin_ratio, analysis.filtered_ratio);
        let finger_count = estimate.finger_count(&analysis.hands, analysis.width, analysis.height);

        let verdict = if analysis.skin.is_empty() {
            Verdict::NoContent
        } else if detected {
            Verdict::HandDetected
        } else {
            Verdict::NoHand
        };

        log::debug!(
            "classified {}x{}: samples={} skin={} hands={} skin_ratio={:.3} filtered={:.3} verdict={:?}",
            analysis.width,
            analysis.height,
            analysis.samples,
            analysis.skin.len(),
            analysis.hands.len(),
            analysis.skin_ratio,
            analysis.filtered_ratio,
            verdict
        );

        Ok(DetectionResult {
            success: detected,
            verdict,
            gesture: if detected {
                Gesture::Mereka
            } else {
                Gesture::Unknown
            },
            confidence: confidence as f32,
            finger_count,
            skin_ratio: analysis.skin_ratio as f32,
            filtered_ratio: analysis.filtered_ratio as f32,
            samples: analysis.samples,
            skin_regions: analysis.skin.len(),
            hand_regions: analysis.hands.len(),
            error: analysis
                .skin
                .is_empty()
                .then(|| DetectError::NoContent.to_string()),
            timestamp_ms: None,
            processing_time_ms: None,
        })
    }

    /// Classify, folding any error into a negative result.
    pub fn classify(&self, frame: &Frame) -> DetectionResult {
        self.try_classify(frame).unwrap_or_else(|err| {
            log::debug!("classification failed: {}", err);
            DetectionResult::failed(&err)
        })
    }
}

/// Classify with calibrated thresholds.
pub fn classify_frame(frame: &Frame, block_size: u32) -> DetectionResult {
    FrameClassifier::new(block_size).classify(frame)
}
