//! Hue-band color masking
//!
//! Pixels are converted to 8-bit HSV (H in [0, 180), S and V in [0, 255],
//! the convention used by most embedded vision stacks) and tested against an
//! inclusive per-channel band.

use camera_capture::VideoFrame;
use image::{GrayImage, Luma};
use serde::{Deserialize, Serialize};

/// Binary mask: 255 where the pixel is in band, 0 elsewhere
pub type ColorMask = GrayImage;

/// Inclusive HSV band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HueBand {
    /// Lower bound (h, s, v)
    pub lower: [u8; 3],
    /// Upper bound (h, s, v)
    pub upper: [u8; 3],
}

impl HueBand {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    /// Band for the painted lane markings
    pub const fn lane() -> Self {
        Self::new([30, 40, 0], [150, 255, 255])
    }

    /// Band for the stop marking. Sits against hue 0 and does not wrap.
    pub const fn stop() -> Self {
        Self::new([0, 120, 70], [10, 255, 255])
    }

    /// Whether an HSV sample lies inside the band on all three channels
    #[inline]
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| self.lower[c] <= hsv[c] && hsv[c] <= self.upper[c])
    }

    /// Whether every lower bound is at most its upper bound
    pub fn is_well_formed(&self) -> bool {
        (0..3).all(|c| self.lower[c] <= self.upper[c])
    }
}

/// Convert one RGB sample to 8-bit HSV
pub fn rgb_to_hsv([r, g, b]: [u8; 3]) -> [u8; 3] {
    let (r, g, b) = (r as i32, g as i32, b as i32);
    let v = r.max(g).max(b);
    let diff = v - r.min(g).min(b);

    let s = if v == 0 {
        0
    } else {
        (255.0 * diff as f32 / v as f32).round() as i32
    };

    // Hue sector picked in R, G, B priority when channels tie
    let h = if diff == 0 {
        0
    } else {
        let sector = if v == r {
            g - b
        } else if v == g {
            b - r + 2 * diff
        } else {
            r - g + 4 * diff
        };
        let mut h = (30.0 * sector as f32 / diff as f32).round() as i32;
        if h < 0 {
            h += 180;
        }
        if h >= 180 {
            h -= 180;
        }
        h
    };

    [h as u8, s.clamp(0, 255) as u8, v as u8]
}

/// Mask the pixels of `frame` that fall inside `band`
pub fn color_mask(frame: &VideoFrame, band: &HueBand) -> ColorMask {
    GrayImage::from_fn(frame.width, frame.height, |x, y| {
        let in_band = frame
            .rgb_at(x, y)
            .map(|rgb| band.contains(rgb_to_hsv(rgb)))
            .unwrap_or(false);
        Luma([if in_band { 255 } else { 0 }])
    })
}

/// Number of set pixels in a binary map
#[cfg(test)]
pub(crate) fn count_set(map: &GrayImage) -> usize {
    map.pixels().filter(|p| p.0[0] != 0).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use camera_capture::ChannelOrder;

    #[test]
    fn test_primary_hues() {
        assert_eq!(rgb_to_hsv([255, 0, 0]), [0, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 255, 0]), [60, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 0, 255]), [120, 255, 255]);
        assert_eq!(rgb_to_hsv([255, 255, 0]), [30, 255, 255]);
    }

    #[test]
    fn test_gray_has_no_saturation() {
        assert_eq!(rgb_to_hsv([0, 0, 0]), [0, 0, 0]);
        assert_eq!(rgb_to_hsv([128, 128, 128]), [0, 0, 128]);
    }

    #[test]
    fn test_hue_wraps_below_zero() {
        // Magenta-ish red: R max, B > G gives a negative sector
        let [h, _, _] = rgb_to_hsv([255, 0, 40]);
        assert!(h > 170 && h < 180);
    }

    #[test]
    fn test_band_contains_inclusive() {
        let band = HueBand::stop();
        assert!(band.contains([0, 120, 70]));
        assert!(band.contains([10, 255, 255]));
        assert!(!band.contains([11, 200, 200]));
        assert!(!band.contains([5, 119, 200]));
    }

    #[test]
    fn test_lane_band_selects_blue_not_red() {
        let band = HueBand::lane();
        assert!(band.contains(rgb_to_hsv([0, 0, 255])));
        assert!(!band.contains(rgb_to_hsv([255, 0, 0])));
        assert!(!band.contains(rgb_to_hsv([90, 90, 90])));
    }

    #[test]
    fn test_mask_respects_channel_order() {
        // One pure blue pixel stored RGB, then the same bytes read as BGR (red)
        let rgb = VideoFrame::new(vec![0, 0, 255], 1, 1, 0, 0);
        let bgr = rgb.clone().with_order(ChannelOrder::Bgr);
        assert_eq!(color_mask(&rgb, &HueBand::lane()).get_pixel(0, 0).0, [255]);
        assert_eq!(color_mask(&bgr, &HueBand::lane()).get_pixel(0, 0).0, [0]);
        assert_eq!(color_mask(&bgr, &HueBand::stop()).get_pixel(0, 0).0, [255]);
    }

    #[test]
    fn test_count_set() {
        let frame = VideoFrame::new(vec![0, 0, 255, 0, 0, 0, 0, 0, 255, 9, 9, 9], 2, 2, 0, 0);
        let mask = color_mask(&frame, &HueBand::lane());
        assert_eq!(count_set(&mask), 2);
    }
}
