use anyhow::Result;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::frame::Frame;

use super::classifier::FrameClassifier;
use super::result::DetectionResult;

/// Detector backend seam.
///
/// The polling controller only talks to this trait, so a model-backed
/// classifier can replace the pixel heuristic without touching orchestration.
///
/// Implementations must treat the frame as read-only and must not retain it
/// past the `detect` call.
pub trait DetectorBackend: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Run detection on a frame.
    fn detect(&mut self, frame: &Frame) -> Result<DetectionResult>;

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Pixel-heuristic backend.
#[derive(Clone, Debug, Default)]
pub struct HeuristicBackend {
    classifier: FrameClassifier,
}

impl HeuristicBackend {
    pub fn new(classifier: FrameClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &FrameClassifier {
        &self.classifier
    }
}

impl DetectorBackend for HeuristicBackend {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn detect(&mut self, frame: &Frame) -> Result<DetectionResult> {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .ok();
        let started = Instant::now();
        let mut result = self.classifier.try_classify(frame)?;
        result.timestamp_ms = timestamp_ms;
        result.processing_time_ms = Some(started.elapsed().as_secs_f64() * 1000.0);
        Ok(result)
    }

    fn warm_up(&mut self) -> Result<()> {
        self.classifier.thresholds().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Rgba;

    #[test]
    fn heuristic_backend_surfaces_typed_errors() {
        let mut backend = HeuristicBackend::default();
        assert_eq!(backend.name(), "heuristic");
        backend.warm_up().unwrap();

        let err = backend.detect(&Frame::new(vec![], 0, 0)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<crate::DetectError>(),
            Some(&crate::DetectError::EmptyFrame)
        );

        let r = backend
            .detect(&Frame::filled(40, 40, Rgba::rgb(0, 0, 0)))
            .unwrap();
        assert!(!r.hand_detected());
    }

    #[test]
    fn backend_stamps_timing_metadata() {
        let frame = Frame::filled(40, 40, Rgba::rgb(150, 100, 80));
        let mut backend = HeuristicBackend::default();
        let r = backend.detect(&frame).unwrap();
        assert!(r.timestamp_ms.is_some_and(|t| t > 0));
        assert!(r.processing_time_ms.is_some_and(|ms| ms >= 0.0));

        let bare = backend.classifier().classify(&frame);
        assert_eq!(bare.timestamp_ms, None);
        assert_eq!(bare.processing_time_ms, None);
        assert_eq!(bare.skin_regions, r.skin_regions);
    }
}
