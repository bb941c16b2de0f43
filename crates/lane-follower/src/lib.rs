//! Lane Follower
//!
//! Ties the capture source, the lane vision pipeline and the steering
//! controller into a single-threaded control loop.

pub mod config;
pub mod control_loop;
pub mod display;
pub mod logging;
pub mod quit;
pub mod sink;

pub use config::{FollowerConfig, LoopConfig};
pub use control_loop::{ControlLoop, LoopSummary, StopReason};
pub use logging::{init_logging, LogFormat};
pub use quit::{CtrlCSignal, FrameLimit, QuitSignal};
pub use sink::{ActuationRecord, ActuationSink, JsonLinesSink, LogSink};

use camera_capture::CameraError;
use lane_vision::VisionError;
use steering::SteeringError;
use thiserror::Error;

/// Control loop error types
#[derive(Error, Debug)]
pub enum LoopError {
    #[error("Capture failed: {0}")]
    Capture(#[from] CameraError),

    #[error("Vision error: {0}")]
    Vision(#[from] VisionError),

    #[error("Steering error: {0}")]
    Steering(#[from] SteeringError),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Overlay error: {0}")]
    Overlay(#[from] image::ImageError),
}
