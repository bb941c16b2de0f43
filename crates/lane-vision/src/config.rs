//! Vision pipeline configuration

use serde::{Deserialize, Serialize};

use crate::color::HueBand;
use crate::edges::EdgeThresholds;
use crate::hough::HoughParams;
use crate::VisionError;

/// Vision pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// HSV band of the lane markings
    pub lane_band: HueBand,

    /// HSV band of the stop marking
    pub stop_band: HueBand,

    /// Edge thresholds for the lane mask
    pub lane_edges: EdgeThresholds,

    /// Edge thresholds for the stop mask
    pub stop_edges: EdgeThresholds,

    /// Segment detector parameters (shared by both branches)
    pub hough: HoughParams,

    /// Fraction of the width reserved to each side when splitting segments
    pub region_split: f64,

    /// Slope substituted for a perfectly horizontal fit
    pub horizontal_slope: f64,

    /// Drop all lane lines when exactly this many segments are detected
    pub abort_segment_count: Option<usize>,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            lane_band: HueBand::lane(),
            stop_band: HueBand::stop(),
            lane_edges: EdgeThresholds::lane(),
            stop_edges: EdgeThresholds::stop(),
            hough: HoughParams::default(),
            region_split: 1.0 / 3.0,
            horizontal_slope: 0.1,
            abort_segment_count: None,
        }
    }
}

impl VisionConfig {
    /// Reject parameter sets the pipeline cannot run with
    pub fn validate(&self) -> Result<(), VisionError> {
        if !self.lane_band.is_well_formed() || !self.stop_band.is_well_formed() {
            return Err(VisionError::Config("hue band lower bound above upper bound".into()));
        }
        if !self.lane_edges.is_well_formed() || !self.stop_edges.is_well_formed() {
            return Err(VisionError::Config("edge low threshold must be within [0, high]".into()));
        }
        if !self.hough.is_well_formed() {
            return Err(VisionError::Config(format!("invalid segment detector parameters: {:?}", self.hough)));
        }
        if !(self.region_split > 0.0 && self.region_split < 1.0) {
            return Err(VisionError::Config(format!(
                "region split {} outside (0, 1)",
                self.region_split
            )));
        }
        if self.horizontal_slope == 0.0 || !self.horizontal_slope.is_finite() {
            return Err(VisionError::Config("horizontal slope substitute must be finite and nonzero".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(VisionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad_split = VisionConfig {
            region_split: 1.5,
            ..Default::default()
        };
        assert!(matches!(bad_split.validate(), Err(VisionError::Config(_))));

        let bad_slope = VisionConfig {
            horizontal_slope: 0.0,
            ..Default::default()
        };
        assert!(bad_slope.validate().is_err());

        let bad_band = VisionConfig {
            stop_band: HueBand::new([20, 0, 0], [10, 255, 255]),
            ..Default::default()
        };
        assert!(bad_band.validate().is_err());
    }
}
