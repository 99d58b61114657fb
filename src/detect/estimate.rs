use super::sampler::Region;
use super::thresholds::EstimateThresholds;

/// Share of skin regions that survived the face/hand filter; 0 when there
/// were no skin regions at all.
pub fn filtered_ratio(hand_regions: usize, skin_regions: usize) -> f64 {
    if skin_regions == 0 {
        return 0.0;
    }
    hand_regions as f64 / skin_regions as f64
}

impl EstimateThresholds {
    /// `min(skin_ratio · gain · filtered_ratio, cap)`.
    pub fn confidence(&self, skin_ratio: f64, filtered_ratio: f64) -> f64 {
        (skin_ratio * self.confidence_gain * filtered_ratio).min(self.confidence_cap)
    }

    /// Rough finger count from how many regions sit high and how far they
    /// spread from the centre column. 0 when there are too few regions.
    pub fn finger_count(&self, regions: &[Region], width: u32, height: u32) -> u8 {
        if regions.len() <= self.finger_min_regions {
            return 0;
        }
        let (w, h) = (width as f64, height as f64);
        let center_x = w / 2.0;
        let center_y = h / 2.0;

        let top = regions
            .iter()
            .filter(|r| r.yf() < center_y * self.top_line)
            .count();
        let spread = regions
            .iter()
            .filter(|r| (r.xf() - center_x).abs() > w * self.spread_frac)
            .count();

        let n = regions.len() as f64;
        if top as f64 > n * self.open_top_ratio && spread > self.open_min_spread {
            clamp_count(spread / 2, self.max_fingers)
        } else if top as f64 > n * self.partial_top_ratio {
            clamp_count(top / 3, self.max_partial_fingers)
        } else {
            1
        }
    }
}

fn clamp_count(count: usize, max: u8) -> u8 {
    count.min(max as usize) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Rgba;

    fn at(x: u32, y: u32) -> Region {
        Region::new(x, y, Rgba::rgb(150, 100, 80))
    }

    #[test]
    fn filtered_ratio_guards_zero() {
        assert_eq!(filtered_ratio(0, 0), 0.0);
        assert_eq!(filtered_ratio(3, 4), 0.75);
    }

    #[test]
    fn confidence_is_capped() {
        let est = EstimateThresholds::default();
        assert_eq!(est.confidence(0.5, 1.0), 0.90);
        assert!((est.confidence(0.05, 0.5) - 0.2).abs() < 1e-12);
        assert_eq!(est.confidence(0.3, 0.0), 0.0);
    }

    #[test]
    fn needs_more_than_five_regions() {
        let est = EstimateThresholds::default();
        assert_eq!(est.finger_count(&vec![at(5, 5); 5], 100, 100), 0);
        assert_eq!(est.finger_count(&vec![at(50, 90); 6], 100, 100), 1);
    }

    #[test]
    fn open_hand_counts_spread_pairs() {
        // All high (y < 35) and away from the centre column: 12 spread -> 6 -> capped at 5.
        let est = EstimateThresholds::default();
        let regions = vec![at(5, 10); 12];
        assert_eq!(est.finger_count(&regions, 100, 100), 5);
        let regions = vec![at(5, 10); 8];
        assert_eq!(est.finger_count(&regions, 100, 100), 4);
    }

    #[test]
    fn partial_hand_counts_top_triples() {
        // 4 of 10 high but central (not spread), so the first branch needs
        // top > 4.0 and fails; top > 3.0 passes -> 4 / 3 = 1.
        let est = EstimateThresholds::default();
        let mut regions = vec![at(50, 10); 4];
        regions.extend(vec![at(50, 90); 6]);
        assert_eq!(est.finger_count(&regions, 100, 100), 1);

        let mut regions = vec![at(50, 10); 9];
        regions.extend(vec![at(50, 90); 11]);
        assert_eq!(est.finger_count(&regions, 100, 100), 3);
    }
}
