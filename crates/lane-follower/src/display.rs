//! Diagnostic overlay output

use camera_capture::VideoFrame;
use image::RgbImage;
use lane_vision::overlay::{draw_heading_line, draw_lane_lines};
use lane_vision::LaneLine;
use std::path::PathBuf;
use tracing::debug;

use crate::LoopError;

/// Frame with lane lines and heading line blended on top
pub fn compose_overlay(frame: &VideoFrame, lines: &[LaneLine], steering_angle: f64) -> Option<RgbImage> {
    let base = frame.to_rgb_image()?;
    let with_lanes = draw_lane_lines(&base, lines);
    Some(draw_heading_line(&with_lanes, steering_angle))
}

/// Saves composed overlays as numbered PNG files
#[derive(Debug, Clone)]
pub struct OverlayWriter {
    dir: PathBuf,
}

impl OverlayWriter {
    /// Create the output directory if needed
    pub fn create<P: Into<PathBuf>>(dir: P) -> Result<Self, LoopError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, sequence: u32) -> PathBuf {
        self.dir.join(format!("heading_{:06}.png", sequence))
    }

    pub fn write(&self, sequence: u32, image: &RgbImage) -> Result<PathBuf, LoopError> {
        let path = self.path_for(sequence);
        image.save(&path)?;
        debug!("Overlay written to {}", path.display());
        Ok(path)
    }
}
