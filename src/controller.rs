//! Caller-side polling loop.
//!
//! The detector itself is stateless. Everything that needs memory across
//! ticks lives here, passed in explicitly:
//! - the frame source and detector backend are injected
//! - ticks run back to back on one thread and never overlap
//! - a repeated frame (same digest) reuses the previous result
//! - the most recent hand detection is kept for the host to query
//!
//! Nothing in a tick is fatal. Source and backend errors become
//! `TickOutcome::Failed` and the next tick simply tries again.

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::detect::{DetectionResult, DetectorBackend};
use crate::error::DetectError;
use crate::frame::{Frame, DEFAULT_CONTENT_FLOOR};
use crate::ingest::FrameSource;

#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// Frame failed the intensity pre-check; the classifier did not run.
    NoContent(DetectError),
    NoHand(DetectionResult),
    Hand(DetectionResult),
    Failed(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub ticks: u64,
    pub cache_hits: u64,
    pub no_content: u64,
    pub hands: u64,
    pub failures: u64,
}

struct CachedResult {
    digest: [u8; 32],
    result: DetectionResult,
}

pub struct DetectionLoop<S, B> {
    source: S,
    backend: B,
    content_floor: u8,
    cache: Option<CachedResult>,
    last_hand: Option<DetectionResult>,
    hand_present: bool,
    stats: LoopStats,
}

impl<S: FrameSource, B: DetectorBackend> DetectionLoop<S, B> {
    pub fn new(source: S, backend: B) -> Self {
        Self {
            source,
            backend,
            content_floor: DEFAULT_CONTENT_FLOOR,
            cache: None,
            last_hand: None,
            hand_present: false,
            stats: LoopStats::default(),
        }
    }

    pub fn with_content_floor(mut self, floor: u8) -> Self {
        self.content_floor = floor;
        self
    }

    /// Connect the source and warm up the backend.
    pub fn start(&mut self) -> Result<()> {
        self.source.connect()?;
        self.backend.warm_up()?;
        log::info!(
            "detection loop started: source={} backend={}",
            self.source.stats().url,
            self.backend.name()
        );
        Ok(())
    }

    /// Most recent hand detection, if any.
    pub fn last_detection(&self) -> Option<&DetectionResult> {
        self.last_hand.as_ref()
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// One polling tick: capture, pre-check, classify.
    pub fn tick(&mut self) -> TickOutcome {
        self.stats.ticks += 1;

        let frame = match self.source.next_frame() {
            Ok(frame) => frame,
            Err(e) => return self.fail(format!("frame capture failed: {}", e)),
        };

        if frame.is_empty() {
            return self.fail(DetectError::EmptyFrame.to_string());
        }
        if !frame.has_content(self.content_floor) {
            self.stats.no_content += 1;
            self.set_hand_present(false);
            log::debug!("tick {}: {}", self.stats.ticks, DetectError::NoContent);
            return TickOutcome::NoContent(DetectError::NoContent);
        }

        let result = match self.classify(&frame) {
            Ok(result) => result,
            Err(e) => return self.fail(format!("detection failed: {}", e)),
        };

        if result.hand_detected() {
            self.stats.hands += 1;
            self.set_hand_present(true);
            self.last_hand = Some(result.clone());
            TickOutcome::Hand(result)
        } else {
            self.set_hand_present(false);
            TickOutcome::NoHand(result)
        }
    }

    /// Tick every `interval` until `stop` is set. Hand detections go to `on_hand`.
    pub fn run<F>(&mut self, interval: Duration, stop: &AtomicBool, mut on_hand: F) -> LoopStats
    where
        F: FnMut(&DetectionResult),
    {
        while !stop.load(Ordering::SeqCst) {
            let started = Instant::now();
            if let TickOutcome::Hand(result) = self.tick() {
                on_hand(&result);
            }
            if stop.load(Ordering::SeqCst) {
                break;
            }
            let remaining = interval.saturating_sub(started.elapsed());
            if !remaining.is_zero() {
                std::thread::sleep(remaining);
            }
        }
        log::info!(
            "detection loop stopped: ticks={} hands={} cache_hits={} failures={}",
            self.stats.ticks,
            self.stats.hands,
            self.stats.cache_hits,
            self.stats.failures
        );
        self.stats
    }

    fn classify(&mut self, frame: &Frame) -> Result<DetectionResult> {
        let digest = frame.digest();
        if let Some(cached) = self.cache.as_ref().filter(|c| c.digest == digest) {
            self.stats.cache_hits += 1;
            return Ok(cached.result.clone());
        }
        let result = self.backend.detect(frame)?;
        self.cache = Some(CachedResult {
            digest,
            result: result.clone(),
        });
        Ok(result)
    }

    /// A failed tick counts as "no hand" for enter/leave tracking.
    fn fail(&mut self, message: String) -> TickOutcome {
        self.stats.failures += 1;
        log::warn!("tick {} failed: {}", self.stats.ticks, message);
        self.set_hand_present(false);
        TickOutcome::Failed(message)
    }

    fn set_hand_present(&mut self, present: bool) {
        if present != self.hand_present {
            if present {
                log::info!("hand entered frame");
            } else {
                log::info!("hand left frame");
            }
            self.hand_present = present;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{HeuristicBackend, Verdict};
    use crate::ingest::{SourceConfig, SourceStats, SyntheticSource};
    use anyhow::anyhow;
    use std::collections::VecDeque;

    /// Replays a fixed script of frames; `None` entries simulate capture errors.
    struct ScriptedSource {
        frames: VecDeque<Option<Frame>>,
        served: u64,
    }

    impl FrameSource for ScriptedSource {
        fn connect(&mut self) -> Result<()> {
            Ok(())
        }

        fn next_frame(&mut self) -> Result<Frame> {
            self.served += 1;
            match self.frames.pop_front() {
                Some(Some(frame)) => Ok(frame),
                Some(None) => Err(anyhow!("device busy")),
                None => Err(anyhow!("script exhausted")),
            }
        }

        fn is_healthy(&self) -> bool {
            true
        }

        fn stats(&self) -> SourceStats {
            SourceStats {
                frames_captured: self.served,
                url: "script://".into(),
            }
        }
    }

    /// Counts how often the backend actually ran.
    struct CountingBackend {
        inner: HeuristicBackend,
        calls: u64,
    }

    impl DetectorBackend for CountingBackend {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn detect(&mut self, frame: &Frame) -> Result<DetectionResult> {
            self.calls += 1;
            self.inner.detect(frame)
        }
    }

    fn synthetic(scene: &str, seed: u64) -> Frame {
        let mut src = SyntheticSource::new(SourceConfig {
            url: format!("stub://{}", scene),
            width: 320,
            height: 240,
            seed,
        })
        .unwrap();
        src.next_frame().unwrap()
    }

    fn scripted(frames: Vec<Option<Frame>>) -> ScriptedSource {
        ScriptedSource {
            frames: frames.into(),
            served: 0,
        }
    }

    fn counting() -> CountingBackend {
        CountingBackend {
            inner: HeuristicBackend::default(),
            calls: 0,
        }
    }

    #[test]
    fn blank_frames_skip_classification() {
        let mut lp = DetectionLoop::new(scripted(vec![Some(synthetic("blank", 0))]), counting());
        match lp.tick() {
            TickOutcome::NoContent(err) => {
                assert_eq!(err, DetectError::NoContent);
                assert_eq!(err.to_string(), "No video content detected");
            }
            other => panic!("expected NoContent, got {:?}", other),
        }
        assert_eq!(lp.backend.calls, 0);
        assert_eq!(lp.stats().no_content, 1);
    }

    #[test]
    fn capture_error_clears_hand_presence() {
        let mut lp = DetectionLoop::new(
            scripted(vec![Some(synthetic("hands", 4)), None, Some(synthetic("hands", 5))]),
            counting(),
        );
        assert!(matches!(lp.tick(), TickOutcome::Hand(_)));
        assert!(lp.hand_present);
        assert!(matches!(lp.tick(), TickOutcome::Failed(_)));
        assert!(!lp.hand_present);
        assert!(lp.last_detection().is_some());
        assert!(matches!(lp.tick(), TickOutcome::Hand(_)));
        assert!(lp.hand_present);
    }

    #[test]
    fn capture_errors_do_not_stop_the_loop() {
        let hands = synthetic("hands", 1);
        let mut lp = DetectionLoop::new(scripted(vec![None, Some(hands)]), counting());
        assert!(matches!(lp.tick(), TickOutcome::Failed(m) if m.contains("device busy")));
        assert!(matches!(lp.tick(), TickOutcome::Hand(_)));
        assert_eq!(lp.stats().failures, 1);
        assert_eq!(lp.stats().hands, 1);
    }

    #[test]
    fn repeated_frame_reuses_cached_result() {
        let hands = synthetic("hands", 2);
        let mut lp = DetectionLoop::new(
            scripted(vec![Some(hands.clone()), Some(hands), Some(synthetic("face", 2))]),
            counting(),
        );
        let first = lp.tick();
        let second = lp.tick();
        assert_eq!(first, second);
        assert_eq!(lp.backend.calls, 1);
        assert_eq!(lp.stats().cache_hits, 1);

        assert!(matches!(lp.tick(), TickOutcome::NoHand(r) if r.verdict == Verdict::NoHand));
        assert_eq!(lp.backend.calls, 2);
    }

    #[test]
    fn last_detection_survives_later_misses() {
        let mut lp = DetectionLoop::new(
            scripted(vec![Some(synthetic("hands", 3)), Some(synthetic("face", 3))]),
            counting(),
        );
        assert!(lp.last_detection().is_none());
        lp.tick();
        lp.tick();
        let last = lp.last_detection().expect("hand seen on first tick");
        assert!(last.hand_detected());
    }

    #[test]
    fn empty_frames_are_failures() {
        let mut lp = DetectionLoop::new(scripted(vec![Some(Frame::new(vec![], 0, 0))]), counting());
        assert_eq!(
            lp.tick(),
            TickOutcome::Failed("No image data available".to_string())
        );
    }

    #[test]
    fn run_stops_when_flag_is_set() {
        let frames = (0..10).map(|seed| Some(synthetic("hands", seed))).collect();
        let mut lp = DetectionLoop::new(scripted(frames), counting());
        lp.start().unwrap();
        let stop = AtomicBool::new(false);
        let mut seen = 0;
        let stats = lp.run(Duration::from_millis(1), &stop, |result| {
            assert!(result.hand_detected());
            seen += 1;
            if seen == 3 {
                stop.store(true, Ordering::SeqCst);
            }
        });
        assert_eq!(seen, 3);
        assert_eq!(stats.ticks, 3);
        assert_eq!(stats.hands, 3);
    }
}
