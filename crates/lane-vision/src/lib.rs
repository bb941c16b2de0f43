//! Lane Vision
//!
//! Per-frame road marking analysis for the lane follower:
//! - Hue-band color masking
//! - Edge extraction and region-of-interest masking
//! - Probabilistic line segment detection
//! - Left/right lane line estimation
//! - Stop marking detection
//! - Diagnostic overlays

pub mod analysis;
pub mod color;
pub mod config;
pub mod edges;
pub mod hough;
pub mod lane;
pub mod overlay;
pub mod region;
pub mod stop;

pub use analysis::FrameAnalysis;
pub use color::{color_mask, rgb_to_hsv, ColorMask, HueBand};
pub use config::VisionConfig;
pub use edges::{extract_edges, EdgeMap, EdgeThresholds};
pub use hough::{detect_segments, HoughParams, LineSegment};
pub use lane::{LaneEstimate, LaneLine, LaneLineEstimator, LaneSide};
pub use region::RegionMask;
pub use stop::{StopSignal, StopSignalDetector};

use camera_capture::frame::VideoFrame;
use thiserror::Error;
use tracing::{debug, info};

/// Vision error types
#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Invalid frame: {width}x{height} with {len} bytes")]
    InvalidFrame { width: u32, height: u32, len: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Lane vision module
pub struct LaneVision {
    config: VisionConfig,
    estimator: LaneLineEstimator,
    stop_detector: StopSignalDetector,
    region: Option<RegionMask>,
}

impl LaneVision {
    /// Create a new vision module
    pub fn new(config: VisionConfig) -> Result<Self, VisionError> {
        config.validate()?;
        info!(
            "Lane vision: lane band {:?}-{:?}, stop band {:?}-{:?}",
            config.lane_band.lower, config.lane_band.upper, config.stop_band.lower, config.stop_band.upper
        );
        Ok(Self {
            estimator: LaneLineEstimator::new(&config),
            stop_detector: StopSignalDetector::new(&config),
            region: None,
            config,
        })
    }

    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    /// Region mask for the given resolution, rebuilt only when it changes
    fn region_for(region: &mut Option<RegionMask>, width: u32, height: u32) -> &RegionMask {
        if region.as_ref().map_or(true, |r| r.dimensions() != (width, height)) {
            debug!("Building region mask for {}x{}", width, height);
            *region = None;
        }
        region.get_or_insert_with(|| RegionMask::lower_half(width, height))
    }

    /// Run the lane branch up to raw segments
    pub fn lane_segments(&mut self, frame: &VideoFrame) -> Vec<LineSegment> {
        let mask = color_mask(frame, &self.config.lane_band);
        let edges = extract_edges(&mask, self.config.lane_edges);
        let roi = Self::region_for(&mut self.region, frame.width, frame.height).apply(&edges);
        detect_segments(&roi, &self.config.hough)
    }

    /// Analyze one frame: lane lines plus the stop branch
    pub fn analyze(&mut self, frame: &VideoFrame) -> Result<FrameAnalysis, VisionError> {
        if !frame.is_valid() {
            return Err(VisionError::InvalidFrame {
                width: frame.width,
                height: frame.height,
                len: frame.data.len(),
            });
        }

        let segments = self.lane_segments(frame);
        let lanes = self.estimator.estimate(frame.width, frame.height, &segments);
        let region = Self::region_for(&mut self.region, frame.width, frame.height);
        let stop = self.stop_detector.detect(frame, region);

        debug!(
            "Frame {}: {} segments, {} lane lines, stop={}",
            frame.sequence,
            segments.len(),
            lanes.len(),
            stop.detected
        );

        Ok(FrameAnalysis {
            sequence: frame.sequence,
            timestamp_ns: frame.timestamp_ns,
            width: frame.width,
            height: frame.height,
            segments,
            lanes,
            stop,
        })
    }
}
