//! Per-frame vision results

use serde::{Deserialize, Serialize};

use crate::hough::LineSegment;
use crate::lane::LaneEstimate;
use crate::stop::StopSignal;

/// Complete vision result for one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameAnalysis {
    /// Frame sequence number
    pub sequence: u32,

    /// Capture timestamp (nanoseconds)
    pub timestamp_ns: u64,

    /// Frame dimensions
    pub width: u32,
    pub height: u32,

    /// Raw segments from the lane branch
    pub segments: Vec<LineSegment>,

    /// Fitted lane lines
    pub lanes: LaneEstimate,

    /// Stop branch outcome
    pub stop: StopSignal,
}

impl FrameAnalysis {
    /// Whether the estimator asked for realignment
    pub fn needs_realign(&self) -> bool {
        self.lanes.realign
    }
}
