use serde::Serialize;

use super::sampler::Region;
use super::thresholds::{ShapeThresholds, Thresholds};

/// Positional distribution of the hand-candidate regions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ShapeRatios {
    pub bottom: f64,
    pub corner: f64,
    pub side: f64,
}

impl ShapeThresholds {
    pub fn ratios(&self, regions: &[Region], width: u32, height: u32) -> ShapeRatios {
        if regions.is_empty() {
            return ShapeRatios::default();
        }
        let (w, h) = (width as f64, height as f64);

        let mut bottom = 0usize;
        let mut corner = 0usize;
        let mut side = 0usize;
        for region in regions {
            let (x, y) = (region.xf(), region.yf());
            if y > h * self.bottom_line {
                bottom += 1;
            }
            let low = y > h * self.corner_line;
            if (x < w * self.corner_left && low) || (x > w * self.corner_right && low) {
                corner += 1;
            }
            if x < w * self.side_left || x > w * self.side_right {
                side += 1;
            }
        }

        let n = regions.len() as f64;
        ShapeRatios {
            bottom: bottom as f64 / n,
            corner: corner as f64 / n,
            side: side as f64 / n,
        }
    }

    /// Mostly low, in the corners and at the edges. All comparisons strict.
    pub fn is_hand_shape(&self, regions: &[Region], width: u32, height: u32) -> bool {
        if regions.len() < self.min_regions {
            return false;
        }
        let r = self.ratios(regions, width, height);
        r.bottom > self.bottom_ratio && r.corner > self.corner_ratio && r.side > self.side_ratio
    }
}

/// Shape heuristic with the calibrated ratios.
pub fn is_hand_shape(regions: &[Region], width: u32, height: u32) -> bool {
    Thresholds::calibrated()
        .shape
        .is_hand_shape(regions, width, height)
}
