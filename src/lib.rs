//! BISINDO hand-region detector.
//!
//! This crate implements a pixel-heuristic detector that decides whether a
//! video frame shows a signing hand, for a BISINDO (Indonesian sign language)
//! translation demo.
//!
//! # Pipeline
//!
//! One synchronous pass per frame, no state between calls:
//!
//! 1. **Block sampling**: read one pixel per `B × B` grid cell.
//! 2. **Skin test**: RGB tone boxes AND a YCbCr chroma band.
//! 3. **Face filter**: drop the upper-centre face band, keep lower corners and edges.
//! 4. **Shape heuristic**: most regions low, in corners, at the sides.
//! 5. **Estimates**: confidence and a rough finger count.
//!
//! # Module Structure
//!
//! - `frame`: RGBA frame container and the content pre-check
//! - `detect`: the classifier stages, tunable thresholds, backend seam
//! - `ingest`: synthetic and still-image frame sources
//! - `controller`: serialized polling loop with a last-detection cache
//! - `translate`: keyword table from interpretations to BISINDO labels
//! - `config`: `gesture_watch` settings (file + environment)

pub mod config;
pub mod controller;
pub mod detect;
pub mod error;
pub mod frame;
pub mod ingest;
pub mod translate;

pub use controller::{DetectionLoop, LoopStats, TickOutcome};
pub use detect::{
    classify_frame, filter_hand_regions, is_hand_shape, is_skin_color, DetectionResult,
    DetectorBackend, FrameClassifier, Gesture, HeuristicBackend, Region, Thresholds, Verdict,
    DEFAULT_BLOCK_SIZE,
};
pub use error::DetectError;
pub use frame::{Frame, Rgba, DEFAULT_CONTENT_FLOOR};
pub use ingest::{open_source, FrameSource, SourceConfig, SourceStats};
pub use translate::{translate_interpretation, Translation};
