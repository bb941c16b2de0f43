//! Probabilistic Hough transform for line segments.
//!
//! Edge pixels are visited in a seeded random order. Each visited pixel
//! votes in the (angle, rho) accumulator; as soon as one of its bins reaches
//! the vote threshold, the corresponding line is walked in both directions
//! from that pixel, bridging gaps of up to `max_line_gap` pixels. Walked
//! pixels are removed from the edge set; if the walk produced a segment of
//! at least `min_line_length` along either axis, the votes those pixels had
//! already cast are withdrawn.
//!
//! The walk uses 16-bit fixed point along the minor axis so that it steps
//! exactly one pixel per iteration along the major axis.

use std::f64::consts::PI;

use image::GrayImage;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

const SHIFT: i32 = 16;

/// Segment endpoints in frame coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl LineSegment {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Slope and intercept of the supporting line, `None` when vertical
    pub fn slope_intercept(&self) -> Option<(f64, f64)> {
        if self.x1 == self.x2 {
            return None;
        }
        let slope = (self.y2 - self.y1) as f64 / (self.x2 - self.x1) as f64;
        let intercept = self.y1 as f64 - slope * self.x1 as f64;
        Some((slope, intercept))
    }
}

/// Parameters of the probabilistic transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughParams {
    /// Distance resolution (pixels)
    pub rho: f64,
    /// Angle resolution (degrees)
    pub theta_deg: f64,
    /// Minimum accumulator votes
    pub threshold: u32,
    /// Minimum segment extent along either axis (pixels)
    pub min_line_length: i32,
    /// Largest gap bridged while walking a line (pixels)
    pub max_line_gap: i32,
    /// Seed for the pixel visiting order
    pub seed: u64,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            rho: 1.0,
            theta_deg: 1.0,
            threshold: 10,
            min_line_length: 5,
            max_line_gap: 150,
            seed: 0x1a7e,
        }
    }
}

impl HoughParams {
    pub fn is_well_formed(&self) -> bool {
        self.rho > 0.0
            && self.theta_deg > 0.0
            && self.theta_deg <= 180.0
            && self.threshold > 0
            && self.min_line_length >= 0
            && self.max_line_gap >= 0
    }
}

/// Extract line segments from a binary edge map
pub fn detect_segments(edges: &GrayImage, params: &HoughParams) -> Vec<LineSegment> {
    let (width, height) = edges.dimensions();
    let (w, h) = (width as i32, height as i32);
    if w == 0 || h == 0 {
        return Vec::new();
    }

    let irho = 1.0 / params.rho;
    let theta = params.theta_deg.to_radians();
    let numangle = ((PI / theta).round() as usize).max(1);
    let numrho = (((w + h) * 2 + 1) as f64 / params.rho).round() as usize;
    let offset = (numrho as i32 - 1) / 2;
    let threshold = params.threshold as i32;

    let trig: Vec<(f64, f64)> = (0..numangle)
        .map(|n| {
            let angle = n as f64 * theta;
            (angle.cos() * irho, angle.sin() * irho)
        })
        .collect();
    let bin = |n: usize, x: i32, y: i32| -> usize {
        let (cos, sin) = trig[n];
        let r = (x as f64 * cos + y as f64 * sin).round() as i32 + offset;
        n * numrho + r.clamp(0, numrho as i32 - 1) as usize
    };
    let idx = |x: i32, y: i32| (y * w + x) as usize;
    let in_bounds = |x: i32, y: i32| x >= 0 && x < w && y >= 0 && y < h;

    let mut accum = vec![0i32; numangle * numrho];
    let mut mask = vec![false; (w * h) as usize];
    let mut voted = vec![false; (w * h) as usize];
    let mut points = Vec::new();
    for (x, y, p) in edges.enumerate_pixels() {
        if p.0[0] != 0 {
            let (x, y) = (x as i32, y as i32);
            mask[idx(x, y)] = true;
            points.push((x, y));
        }
    }
    let mut rng = StdRng::seed_from_u64(params.seed);
    points.shuffle(&mut rng);

    let mut segments = Vec::new();
    for &(x0, y0) in &points {
        // Already consumed by an earlier line
        if !mask[idx(x0, y0)] {
            continue;
        }

        voted[idx(x0, y0)] = true;
        let mut max_val = threshold - 1;
        let mut max_n = 0;
        for n in 0..numangle {
            let b = bin(n, x0, y0);
            accum[b] += 1;
            if accum[b] > max_val {
                max_val = accum[b];
                max_n = n;
            }
        }
        if max_val < threshold {
            continue;
        }

        // Direction along the line is perpendicular to its normal
        let (cos, sin) = trig[max_n];
        let (a, b) = (-sin, cos);
        let xflag = a.abs() > b.abs();
        let (start_x, start_y, dx0, dy0) = if xflag {
            let dy0 = (b * (1 << SHIFT) as f64 / a.abs()).round() as i32;
            (x0, (y0 << SHIFT) + (1 << (SHIFT - 1)), if a > 0.0 { 1 } else { -1 }, dy0)
        } else {
            let dx0 = (a * (1 << SHIFT) as f64 / b.abs()).round() as i32;
            ((x0 << SHIFT) + (1 << (SHIFT - 1)), y0, dx0, if b > 0.0 { 1 } else { -1 })
        };
        let to_pixel = |x: i32, y: i32| if xflag { (x, y >> SHIFT) } else { (x >> SHIFT, y) };
        let step = |k: usize| if k == 0 { (dx0, dy0) } else { (-dx0, -dy0) };

        let mut line_end = [(x0, y0); 2];
        for (k, end) in line_end.iter_mut().enumerate() {
            let (dx, dy) = step(k);
            let (mut x, mut y) = (start_x, start_y);
            let mut gap = 0;
            loop {
                let (px, py) = to_pixel(x, y);
                if !in_bounds(px, py) {
                    break;
                }
                if mask[idx(px, py)] {
                    gap = 0;
                    *end = (px, py);
                } else {
                    gap += 1;
                    if gap > params.max_line_gap {
                        break;
                    }
                }
                x += dx;
                y += dy;
            }
        }

        let good_line = (line_end[1].0 - line_end[0].0).abs() >= params.min_line_length
            || (line_end[1].1 - line_end[0].1).abs() >= params.min_line_length;

        for (k, &end) in line_end.iter().enumerate() {
            let (dx, dy) = step(k);
            let (mut x, mut y) = (start_x, start_y);
            loop {
                let (px, py) = to_pixel(x, y);
                if !in_bounds(px, py) {
                    break;
                }
                let i = idx(px, py);
                if mask[i] {
                    if good_line && voted[i] {
                        for n in 0..numangle {
                            accum[bin(n, px, py)] -= 1;
                        }
                    }
                    mask[i] = false;
                }
                if (px, py) == end {
                    break;
                }
                x += dx;
                y += dy;
            }
        }

        if good_line {
            segments.push(LineSegment::new(
                line_end[0].0,
                line_end[0].1,
                line_end[1].0,
                line_end[1].1,
            ));
        }
    }

    segments
}
