//! Tunable detector constants.
//!
//! Every threshold the pipeline compares against lives here. The defaults are
//! the empirical values the detector was calibrated with; changing any of them
//! changes verdicts, so deployments should only override them deliberately
//! (see `WatchConfig`). Positional values are fractions of frame width/height.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Inclusive RGB box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelBox {
    pub r_min: u8,
    pub r_max: u8,
    pub g_min: u8,
    pub g_max: u8,
    pub b_min: u8,
    pub b_max: u8,
}

impl ChannelBox {
    pub const fn new(r: (u8, u8), g: (u8, u8), b: (u8, u8)) -> Self {
        Self {
            r_min: r.0,
            r_max: r.1,
            g_min: g.0,
            g_max: g.1,
            b_min: b.0,
            b_max: b.1,
        }
    }
}

/// Inclusive rectangle in frame fractions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FracRect {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl FracRect {
    pub const fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkinThresholds {
    /// Light, medium and dark tone approximations. A pixel must sit in one.
    pub rgb_boxes: Vec<ChannelBox>,
    pub cb_min: f64,
    pub cb_max: f64,
    pub cr_min: f64,
    pub cr_max: f64,
}

impl Default for SkinThresholds {
    fn default() -> Self {
        Self {
            rgb_boxes: vec![
                ChannelBox::new((95, 255), (40, 100), (20, 95)),
                ChannelBox::new((80, 220), (50, 150), (30, 120)),
                ChannelBox::new((45, 255), (34, 200), (14, 180)),
            ],
            cb_min: 77.0,
            cb_max: 127.0,
            cr_min: 133.0,
            cr_max: 173.0,
        }
    }
}

/// Face band: `y < bottom·H AND left·W < x < right·W` (strict).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceBand {
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Default for FaceBand {
    fn default() -> Self {
        Self {
            bottom: 0.65,
            left: 0.15,
            right: 0.85,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneThresholds {
    pub face: FaceBand,
    pub hand_areas: Vec<FracRect>,
}

impl Default for ZoneThresholds {
    fn default() -> Self {
        Self {
            face: FaceBand::default(),
            hand_areas: vec![
                // bottom-left, bottom-right
                FracRect::new(0.0, 0.4, 0.6, 1.0),
                FracRect::new(0.6, 1.0, 0.6, 1.0),
                // lower-left strip, lower-right strip
                FracRect::new(0.0, 0.25, 0.4, 0.8),
                FracRect::new(0.75, 1.0, 0.4, 0.8),
            ],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeThresholds {
    pub min_regions: usize,
    /// A region counts as "bottom" when `y > bottom_line·H`.
    pub bottom_line: f64,
    pub bottom_ratio: f64,
    pub corner_line: f64,
    pub corner_left: f64,
    pub corner_right: f64,
    pub corner_ratio: f64,
    pub side_left: f64,
    pub side_right: f64,
    pub side_ratio: f64,
}

impl Default for ShapeThresholds {
    fn default() -> Self {
        Self {
            min_regions: 8,
            bottom_line: 0.6,
            bottom_ratio: 0.6,
            corner_line: 0.5,
            corner_left: 0.3,
            corner_right: 0.7,
            corner_ratio: 0.3,
            side_left: 0.25,
            side_right: 0.75,
            side_ratio: 0.4,
        }
    }
}

/// Whole-frame gate applied on top of the shape heuristic.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateThresholds {
    pub min_skin_ratio: f64,
    pub min_hand_regions: usize,
    pub min_filtered_ratio: f64,
}

impl Default for GateThresholds {
    fn default() -> Self {
        Self {
            min_skin_ratio: 0.08,
            min_hand_regions: 12,
            min_filtered_ratio: 0.5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimateThresholds {
    pub confidence_gain: f64,
    pub confidence_cap: f64,
    /// Finger estimation runs only above this many hand regions.
    pub finger_min_regions: usize,
    /// "Top" regions sit above `top_line · H/2`.
    pub top_line: f64,
    /// "Spread" regions sit further than `spread_frac · W` from the centre column.
    pub spread_frac: f64,
    pub open_top_ratio: f64,
    pub open_min_spread: usize,
    pub max_fingers: u8,
    pub partial_top_ratio: f64,
    pub max_partial_fingers: u8,
}

impl Default for EstimateThresholds {
    fn default() -> Self {
        Self {
            confidence_gain: 8.0,
            confidence_cap: 0.90,
            finger_min_regions: 5,
            top_line: 0.7,
            spread_frac: 0.1,
            open_top_ratio: 0.4,
            open_min_spread: 3,
            max_fingers: 5,
            partial_top_ratio: 0.3,
            max_partial_fingers: 3,
        }
    }
}

/// Full parameter set for one `FrameClassifier`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub skin: SkinThresholds,
    pub zones: ZoneThresholds,
    pub shape: ShapeThresholds,
    pub gate: GateThresholds,
    pub estimate: EstimateThresholds,
}

impl Thresholds {
    /// Shared instance of the calibrated defaults.
    pub fn calibrated() -> &'static Thresholds {
        static CALIBRATED: OnceLock<Thresholds> = OnceLock::new();
        CALIBRATED.get_or_init(Thresholds::default)
    }

    /// Reject parameter sets the pipeline cannot evaluate meaningfully.
    pub fn validate(&self) -> Result<()> {
        if self.skin.rgb_boxes.is_empty() {
            return Err(anyhow!("skin.rgb_boxes must contain at least one range"));
        }
        for (i, b) in self.skin.rgb_boxes.iter().enumerate() {
            if b.r_min > b.r_max || b.g_min > b.g_max || b.b_min > b.b_max {
                return Err(anyhow!("skin.rgb_boxes[{}] has min above max", i));
            }
        }
        if self.skin.cb_min > self.skin.cb_max || self.skin.cr_min > self.skin.cr_max {
            return Err(anyhow!("skin chroma band has min above max"));
        }

        let face = &self.zones.face;
        for (name, v) in [
            ("zones.face.bottom", face.bottom),
            ("zones.face.left", face.left),
            ("zones.face.right", face.right),
        ] {
            check_fraction(name, v)?;
        }
        if self.zones.hand_areas.is_empty() {
            return Err(anyhow!("zones.hand_areas must contain at least one area"));
        }
        for (i, area) in self.zones.hand_areas.iter().enumerate() {
            for v in [area.min_x, area.max_x, area.min_y, area.max_y] {
                check_fraction(&format!("zones.hand_areas[{}]", i), v)?;
            }
            if area.min_x > area.max_x || area.min_y > area.max_y {
                return Err(anyhow!("zones.hand_areas[{}] has min above max", i));
            }
        }

        for (name, v) in [
            ("gate.min_skin_ratio", self.gate.min_skin_ratio),
            ("gate.min_filtered_ratio", self.gate.min_filtered_ratio),
            ("shape.bottom_ratio", self.shape.bottom_ratio),
            ("shape.corner_ratio", self.shape.corner_ratio),
            ("shape.side_ratio", self.shape.side_ratio),
            ("estimate.confidence_cap", self.estimate.confidence_cap),
        ] {
            check_fraction(name, v)?;
        }
        if self.estimate.max_fingers > 5 {
            return Err(anyhow!("estimate.max_fingers cannot exceed 5"));
        }
        Ok(())
    }
}

fn check_fraction(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(anyhow!("{} must be within 0..=1 (got {})", name, value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        Thresholds::default().validate().expect("calibrated defaults");
        assert_eq!(Thresholds::calibrated(), &Thresholds::default());
    }

    #[test]
    fn partial_override_keeps_remaining_defaults() {
        let t: Thresholds =
            serde_json::from_str(r#"{ "gate": { "min_skin_ratio": 0.05 } }"#).unwrap();
        assert_eq!(t.gate.min_skin_ratio, 0.05);
        assert_eq!(t.gate.min_hand_regions, 12);
        assert_eq!(t.shape, ShapeThresholds::default());
        assert_eq!(t.skin.rgb_boxes.len(), 3);
    }

    #[test]
    fn rejects_out_of_range_fraction() {
        let mut t = Thresholds::default();
        t.zones.face.bottom = 1.5;
        assert!(t.validate().is_err());

        let mut t = Thresholds::default();
        t.zones.hand_areas.clear();
        assert!(t.validate().is_err());
    }
}
