//! Edge extraction from a color mask
//!
//! Canny without pre-smoothing: 3x3 Sobel gradients, L1 magnitude
//! `|gx| + |gy|`, non-maximum suppression along the quantized gradient
//! direction, then hysteresis linking. A one-pixel step in a 0/255 mask
//! scores 1020, so the lane thresholds fire on marks of any width.

use image::{GrayImage, Luma};
use imageproc::gradients::{horizontal_sobel, vertical_sobel};
use serde::{Deserialize, Serialize};

/// Binary edge map: 255 on edge pixels, 0 elsewhere
pub type EdgeMap = GrayImage;

/// Hysteresis thresholds on gradient magnitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeThresholds {
    pub low: f32,
    pub high: f32,
}

impl EdgeThresholds {
    pub const fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    /// Thresholds for the broad lane mask
    pub const fn lane() -> Self {
        Self::new(200.0, 400.0)
    }

    /// Lower thresholds for the sparser stop mask
    pub const fn stop() -> Self {
        Self::new(50.0, 100.0)
    }

    pub fn is_well_formed(&self) -> bool {
        self.low >= 0.0 && self.low <= self.high
    }
}

const TAN_22_5_DEG: f32 = 0.414_213_56;
const TAN_67_5_DEG: f32 = 2.414_213_6;

/// Two-threshold edge detection (gradient, non-maximum suppression,
/// hysteresis linking) over a binary mask.
///
/// A pixel is a candidate when its suppressed magnitude exceeds `low` and
/// seeds an edge when it exceeds `high`.
pub fn extract_edges(mask: &GrayImage, thresholds: EdgeThresholds) -> EdgeMap {
    let (width, height) = mask.dimensions();
    let (w, h) = (width as i32, height as i32);
    let mut edges = GrayImage::new(width, height);
    if w == 0 || h == 0 {
        return edges;
    }

    let gx = horizontal_sobel(mask);
    let gy = vertical_sobel(mask);
    let idx = |x: i32, y: i32| (y * w + x) as usize;
    let mag: Vec<f32> = gx
        .pixels()
        .zip(gy.pixels())
        .map(|(a, b)| (a.0[0] as f32).abs() + (b.0[0] as f32).abs())
        .collect();
    // Outside the map counts as zero magnitude
    let mag_at = |x: i32, y: i32| {
        if x < 0 || x >= w || y < 0 || y >= h {
            0.0
        } else {
            mag[idx(x, y)]
        }
    };

    let mut candidate = vec![false; mag.len()];
    let mut stack = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let m = mag[idx(x, y)];
            if m <= thresholds.low {
                continue;
            }
            let sx = gx.get_pixel(x as u32, y as u32).0[0] as f32;
            let sy = gy.get_pixel(x as u32, y as u32).0[0] as f32;
            let (ax, ay) = (sx.abs(), sy.abs());

            let is_max = if ay < ax * TAN_22_5_DEG {
                m > mag_at(x - 1, y) && m >= mag_at(x + 1, y)
            } else if ay > ax * TAN_67_5_DEG {
                m > mag_at(x, y - 1) && m >= mag_at(x, y + 1)
            } else {
                let s = if (sx < 0.0) != (sy < 0.0) { -1 } else { 1 };
                m > mag_at(x - s, y - 1) && m > mag_at(x + s, y + 1)
            };
            if !is_max {
                continue;
            }

            candidate[idx(x, y)] = true;
            if m > thresholds.high {
                stack.push((x, y));
            }
        }
    }

    // Grow from strong pixels through 8-connected candidates
    while let Some((x, y)) = stack.pop() {
        if edges.get_pixel(x as u32, y as u32).0[0] != 0 {
            continue;
        }
        edges.put_pixel(x as u32, y as u32, Luma([255]));
        for (dx, dy) in [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)] {
            let (nx, ny) = (x + dx, y + dy);
            if nx >= 0 && nx < w && ny >= 0 && ny < h && candidate[idx(nx, ny)] {
                candidate[idx(nx, ny)] = false;
                stack.push((nx, ny));
            }
        }
    }

    edges
}
