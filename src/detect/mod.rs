mod backend;
mod classifier;
mod estimate;
mod result;
mod sampler;
mod shape;
mod skin;
mod thresholds;
mod zones;

pub use backend::{DetectorBackend, HeuristicBackend};
pub use classifier::{classify_frame, FrameAnalysis, FrameClassifier, DEFAULT_BLOCK_SIZE};
pub use estimate::filtered_ratio;
pub use result::{DetectionResult, Gesture, Verdict};
pub use sampler::{sample_blocks, sample_count, sample_points, BlockSample, Region};
pub use shape::{is_hand_shape, ShapeRatios};
pub use skin::{is_skin_color, pixel_confidence, ycbcr};
pub use thresholds::{
    ChannelBox, EstimateThresholds, FaceBand, FracRect, GateThresholds, ShapeThresholds,
    SkinThresholds, Thresholds, ZoneThresholds,
};
pub use zones::{filter_hand_regions, FaceArea, HandArea};
