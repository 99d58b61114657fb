use crate::frame::Rgba;

use super::thresholds::{ChannelBox, SkinThresholds, Thresholds};

/// BT.601 luma and chroma: `(Y, Cb, Cr)`.
pub fn ycbcr(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let (r, g, b) = (r as f64, g as f64, b as f64);
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = -0.169 * r - 0.331 * g + 0.5 * b + 128.0;
    let cr = 0.5 * r - 0.419 * g - 0.081 * b + 128.0;
    (y, cb, cr)
}

impl ChannelBox {
    pub fn contains(&self, r: u8, g: u8, b: u8) -> bool {
        (self.r_min..=self.r_max).contains(&r)
            && (self.g_min..=self.g_max).contains(&g)
            && (self.b_min..=self.b_max).contains(&b)
    }
}

impl SkinThresholds {
    /// RGB box membership AND the chroma band. Either alone lets orange or
    /// brown backgrounds through.
    pub fn is_skin(&self, r: u8, g: u8, b: u8) -> bool {
        if !self.rgb_boxes.iter().any(|range| range.contains(r, g, b)) {
            return false;
        }
        let (_, cb, cr) = ycbcr(r, g, b);
        cb >= self.cb_min && cb <= self.cb_max && cr >= self.cr_min && cr <= self.cr_max
    }
}

/// Skin test with the calibrated ranges.
pub fn is_skin_color(r: u8, g: u8, b: u8) -> bool {
    Thresholds::calibrated().skin.is_skin(r, g, b)
}

/// Weighted channel score, capped at 0.95.
pub fn pixel_confidence(px: Rgba) -> f32 {
    let score = (px.r as f32 / 255.0) * 0.4
        + (px.g as f32 / 255.0) * 0.3
        + (px.b as f32 / 255.0) * 0.3;
    score.min(0.95)
}
