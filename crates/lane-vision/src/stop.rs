//! Stop marking detection

use camera_capture::frame::VideoFrame;
use serde::{Deserialize, Serialize};

use crate::color::{color_mask, HueBand};
use crate::edges::{extract_edges, EdgeThresholds};
use crate::hough::{detect_segments, HoughParams};
use crate::region::RegionMask;
use crate::VisionConfig;

/// Outcome of the stop branch for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopSignal {
    /// A stop marking is in the region of interest
    pub detected: bool,
    /// Segments found in the stop band
    pub segment_count: usize,
}

/// Runs the masking and segment stages with the stop band
pub struct StopSignalDetector {
    band: HueBand,
    thresholds: EdgeThresholds,
    hough: HoughParams,
}

impl StopSignalDetector {
    pub fn new(config: &VisionConfig) -> Self {
        Self {
            band: config.stop_band,
            thresholds: config.stop_edges,
            hough: config.hough.clone(),
        }
    }

    /// Look for the stop marking inside `region`
    pub fn detect(&self, frame: &VideoFrame, region: &RegionMask) -> StopSignal {
        let mask = color_mask(frame, &self.band);
        let edges = region.apply(&extract_edges(&mask, self.thresholds));
        let segment_count = detect_segments(&edges, &self.hough).len();

        StopSignal {
            detected: segment_count > 0,
            segment_count,
        }
    }
}
