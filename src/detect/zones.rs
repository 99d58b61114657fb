//! Positional prior: drop the face band, keep the lower corners and edges.
//!
//! Faces dominate the upper centre of a video-call frame and signing hands
//! are expected near the bottom and sides. A hand raised in front of the face
//! or held in the centre is therefore rejected. That false negative is a known
//! limitation of this prior.

use super::sampler::Region;
use super::thresholds::{FaceBand, FracRect, Thresholds, ZoneThresholds};

/// Face band in pixels. Membership is strict on every edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceArea {
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl FaceArea {
    pub fn from_band(band: &FaceBand, width: u32, height: u32) -> Self {
        let (w, h) = (width as f64, height as f64);
        Self {
            bottom: h * band.bottom,
            left: w * band.left,
            right: w * band.right,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        y < self.bottom && x > self.left && x < self.right
    }
}

/// Hand area in pixels. Membership is inclusive on every edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandArea {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl HandArea {
    pub fn from_fractions(rect: &FracRect, width: u32, height: u32) -> Self {
        let (w, h) = (width as f64, height as f64);
        Self {
            min_x: w * rect.min_x,
            max_x: w * rect.max_x,
            min_y: h * rect.min_y,
            max_y: h * rect.max_y,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

impl ZoneThresholds {
    pub fn face_area(&self, width: u32, height: u32) -> FaceArea {
        FaceArea::from_band(&self.face, width, height)
    }

    pub fn hand_areas(&self, width: u32, height: u32) -> Vec<HandArea> {
        self.hand_areas
            .iter()
            .map(|rect| HandArea::from_fractions(rect, width, height))
            .collect()
    }

    /// Keep regions outside the face band and inside at least one hand area.
    /// Input order is preserved.
    pub fn filter_hand_regions(&self, regions: &[Region], width: u32, height: u32) -> Vec<Region> {
        let face = self.face_area(width, height);
        let hands = self.hand_areas(width, height);
        regions
            .iter()
            .filter(|region| {
                let (x, y) = (region.xf(), region.yf());
                !face.contains(x, y) && hands.iter().any(|area| area.contains(x, y))
            })
            .copied()
            .collect()
    }
}

/// Face/hand filter with the calibrated areas.
pub fn filter_hand_regions(regions: &[Region], width: u32, height: u32) -> Vec<Region> {
    Thresholds::calibrated()
        .zones
        .filter_hand_regions(regions, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Rgba;

    fn at(x: u32, y: u32) -> Region {
        Region::new(x, y, Rgba::rgb(150, 100, 80))
    }

    #[test]
    fn keeps_bottom_corners_and_side_strips() {
        let regions = [at(10, 90), at(95, 95), at(5, 45), at(80, 70)];
        let kept = filter_hand_regions(&regions, 100, 100);
        assert_eq!(kept, regions.to_vec());
    }

    #[test]
    fn drops_face_band() {
        // Centre column, upper 65%.
        let regions = [at(50, 10), at(20, 60), at(84, 64)];
        assert!(filter_hand_regions(&regions, 100, 100).is_empty());
    }

    #[test]
    fn drops_regions_outside_every_hand_area() {
        // Top-left corner is not a hand area; bottom centre is not either.
        let regions = [at(5, 5), at(50, 90), at(95, 20)];
        assert!(filter_hand_regions(&regions, 100, 100).is_empty());
    }

    #[test]
    fn face_edges_are_strict_hand_edges_inclusive() {
        // x == 0.15W and x == 0.85W are outside the face band.
        // y == 0.4H and x == 0.25W are still inside the left strip.
        let regions = [at(15, 40), at(16, 40), at(25, 80), at(85, 64)];
        let kept = filter_hand_regions(&regions, 100, 100);
        assert_eq!(kept, vec![at(15, 40), at(25, 80), at(85, 64)]);
    }

    #[test]
    fn retained_regions_never_sit_in_face_area() {
        let (w, h) = (320, 240);
        let regions: Vec<_> = (0..h)
            .step_by(8)
            .flat_map(|y| (0..w).step_by(8).map(move |x| at(x, y)))
            .collect();
        let face = ZoneThresholds::default().face_area(w, h);
        let kept = filter_hand_regions(&regions, w, h);
        assert!(!kept.is_empty());
        assert!(kept.iter().all(|r| !face.contains(r.xf(), r.yf())));
    }

    #[test]
    fn preserves_input_order() {
        let regions = [at(95, 95), at(50, 50), at(10, 90)];
        let kept = filter_hand_regions(&regions, 100, 100);
        assert_eq!(kept, vec![at(95, 95), at(10, 90)]);
    }
}
