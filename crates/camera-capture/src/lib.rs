//! Camera Capture Library for the lane follower
//!
//! Provides the frame type consumed by the vision pipeline and the
//! capture collaborator it reads frames from.
//! Supports:
//! - Directory replay of recorded frames (PNG/JPEG, sorted by file name)
//! - In-memory replay for tests and simulation
//! - Fixed 180° flip for upside-down camera mounts

pub mod frame;
pub mod source;

pub use frame::{ChannelOrder, VideoFrame};
pub use source::{FrameSource, ImageDirSource, ReplaySource};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Camera error types
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Failed to open camera: {0}")]
    Open(String),

    #[error("Streaming error: {0}")]
    Stream(String),

    #[error("Frame decode failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("End of stream")]
    EndOfStream,
}

impl CameraError {
    /// True when the source ran out of frames rather than failing
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, CameraError::EndOfStream)
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Directory of recorded frames to replay
    pub source_dir: PathBuf,
    /// Requested capture width
    pub width: u32,
    /// Requested capture height
    pub height: u32,
    /// Rotate every frame by 180° before processing
    pub flip_180: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("frames"),
            width: 320,
            height: 240,
            flip_180: true,
        }
    }
}

impl CameraConfig {
    /// Config for a directory of frames, keeping the default resolution
    pub fn replay<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            source_dir: dir.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resolution() {
        let config = CameraConfig::default();
        assert_eq!((config.width, config.height), (320, 240));
        assert!(config.flip_180);
    }

    #[test]
    fn test_end_of_stream_flag() {
        assert!(CameraError::EndOfStream.is_end_of_stream());
        assert!(!CameraError::Stream("lost".into()).is_end_of_stream());
    }
}
