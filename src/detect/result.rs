use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DetectError;

/// BISINDO gesture labels. The pixel heuristic only distinguishes "some open
/// hand" (`Mereka`) from nothing; `Aku`/`Kamu` come from richer classifiers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gesture {
    #[default]
    Unknown,
    Aku,
    Kamu,
    Mereka,
}

impl Gesture {
    pub fn label(&self) -> &'static str {
        match self {
            Gesture::Unknown => "UNKNOWN",
            Gesture::Aku => "AKU",
            Gesture::Kamu => "KAMU",
            Gesture::Mereka => "MEREKA",
        }
    }

    /// Case-insensitive parse of a label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "UNKNOWN" => Some(Gesture::Unknown),
            "AKU" => Some(Gesture::Aku),
            "KAMU" => Some(Gesture::Kamu),
            "MEREKA" => Some(Gesture::Mereka),
            _ => None,
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse outcome of a pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Nothing analysable: empty frame, unreadable buffer, or no skin at all.
    #[default]
    NoContent,
    NoHand,
    HandDetected,
}

/// Result of classifying one frame. Produced per pass, never updated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// True only when a hand was detected.
    pub success: bool,
    pub verdict: Verdict,
    pub gesture: Gesture,
    /// In `[0, 1]`.
    pub confidence: f32,
    /// 0..=5; 0 when too few hand regions were found to estimate.
    pub finger_count: u8,
    pub skin_ratio: f32,
    pub filtered_ratio: f32,
    /// Grid samples taken.
    pub samples: usize,
    pub skin_regions: usize,
    pub hand_regions: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock capture time (Unix milliseconds), stamped by a backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
    /// Time spent in the backend. `None` for bare classifier calls, which
    /// keeps their output a pure function of the frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<f64>,
}

impl DetectionResult {
    /// Negative result carrying the error message. No counts are filled in.
    pub fn failed(err: &DetectError) -> Self {
        Self {
            error: Some(err.to_string()),
            ..Self::default()
        }
    }

    pub fn hand_detected(&self) -> bool {
        self.verdict == Verdict::HandDetected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gesture_labels_round_trip_through_serde() {
        let json = serde_json::to_string(&Gesture::Mereka).unwrap();
        assert_eq!(json, "\"MEREKA\"");
        assert_eq!(Gesture::from_label(" kamu "), Some(Gesture::Kamu));
        assert_eq!(Gesture::from_label("peace"), None);
    }

    #[test]
    fn failed_result_is_negative_and_empty() {
        let r = DetectionResult::failed(&DetectError::EmptyFrame);
        assert!(!r.success);
        assert!(!r.hand_detected());
        assert_eq!(r.confidence, 0.0);
        assert_eq!(r.samples, 0);
        assert_eq!(r.error.as_deref(), Some("No image data available"));
    }
}
