//! Lane line estimation
//!
//! Segments are split into left and right candidates by slope sign and
//! horizontal position, averaged into one (slope, intercept) per side, and
//! realized as on-screen lines from the bottom edge up to half height.

use serde::{Deserialize, Serialize};

use crate::hough::LineSegment;
use crate::VisionConfig;

/// Which lane boundary a line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneSide {
    Left,
    Right,
}

/// One fitted lane boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneLine {
    pub side: LaneSide,
    /// Slope used to realize the line (never exactly zero)
    pub slope: f64,
    pub intercept: f64,
    /// Endpoint on the bottom edge (y = H)
    pub lower: (f64, f64),
    /// Endpoint at half height (y = H / 2)
    pub upper: (f64, f64),
}

impl LaneLine {
    /// Realize `y = slope * x + intercept` between the bottom edge and half
    /// height of a frame `height` pixels tall. A slope of exactly zero is
    /// replaced by `horizontal_slope`.
    pub fn from_fit(
        side: LaneSide,
        slope: f64,
        intercept: f64,
        height: u32,
        horizontal_slope: f64,
    ) -> Self {
        let slope = if slope == 0.0 { horizontal_slope } else { slope };
        let y_lower = height as f64;
        let y_upper = (height / 2) as f64;
        Self {
            side,
            slope,
            intercept,
            lower: ((y_lower - intercept) / slope, y_lower),
            upper: ((y_upper - intercept) / slope, y_upper),
        }
    }

    /// On-screen segment, coordinates truncated toward zero
    pub fn segment(&self) -> LineSegment {
        LineSegment::new(
            self.lower.0 as i32,
            self.lower.1 as i32,
            self.upper.0 as i32,
            self.upper.1 as i32,
        )
    }

    /// x of the bottom endpoint, in pixels
    pub fn lower_x(&self) -> i32 {
        self.segment().x1
    }

    /// x of the half-height endpoint, in pixels
    pub fn upper_x(&self) -> i32 {
        self.segment().x2
    }
}

/// Result of lane estimation for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaneEstimate {
    /// Left line first when present, at most one per side
    pub lines: Vec<LaneLine>,
    /// No usable segment set: the vehicle should realign
    pub realign: bool,
}

impl LaneEstimate {
    pub fn left(&self) -> Option<&LaneLine> {
        self.lines.iter().find(|l| l.side == LaneSide::Left)
    }

    pub fn right(&self) -> Option<&LaneLine> {
        self.lines.iter().find(|l| l.side == LaneSide::Right)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Running mean of (slope, intercept) pairs
#[derive(Debug, Default)]
struct FitAccumulator {
    slope_sum: f64,
    intercept_sum: f64,
    count: usize,
}

impl FitAccumulator {
    fn push(&mut self, slope: f64, intercept: f64) {
        self.slope_sum += slope;
        self.intercept_sum += intercept;
        self.count += 1;
    }

    fn mean(&self) -> Option<(f64, f64)> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some((self.slope_sum / n, self.intercept_sum / n))
    }
}

/// Fits at most one line per side from raw segments
#[derive(Debug, Clone)]
pub struct LaneLineEstimator {
    region_split: f64,
    horizontal_slope: f64,
    abort_segment_count: Option<usize>,
}

impl LaneLineEstimator {
    pub fn new(config: &VisionConfig) -> Self {
        Self {
            region_split: config.region_split,
            horizontal_slope: config.horizontal_slope,
            abort_segment_count: config.abort_segment_count,
        }
    }

    /// Estimate lane lines for a `width` x `height` frame
    pub fn estimate(&self, width: u32, height: u32, segments: &[LineSegment]) -> LaneEstimate {
        if segments.is_empty() || self.abort_segment_count == Some(segments.len()) {
            return LaneEstimate {
                lines: Vec::new(),
                realign: true,
            };
        }

        let left_boundary = width as f64 * (1.0 - self.region_split);
        let right_boundary = width as f64 * self.region_split;

        let mut left = FitAccumulator::default();
        let mut right = FitAccumulator::default();
        for segment in segments {
            let Some((slope, intercept)) = segment.slope_intercept() else {
                continue;
            };
            let (x1, x2) = (segment.x1 as f64, segment.x2 as f64);
            if slope < 0.0 {
                if x1 < left_boundary && x2 < left_boundary {
                    left.push(slope, intercept);
                }
            } else if x1 > right_boundary && x2 > right_boundary {
                right.push(slope, intercept);
            }
        }

        let lines = [(LaneSide::Left, left.mean()), (LaneSide::Right, right.mean())]
            .into_iter()
            .filter_map(|(side, fit)| {
                fit.map(|(slope, intercept)| {
                    LaneLine::from_fit(side, slope, intercept, height, self.horizontal_slope)
                })
            })
            .collect();

        LaneEstimate {
            lines,
            realign: false,
        }
    }
}
