//! Steering
//!
//! Converts the lane lines of one frame into a steering angle and a
//! dead-band decision with a PD correction magnitude.

pub mod config;
pub mod control;
pub mod geometry;

pub use config::SteeringConfig;
pub use control::{ControlSmoother, ControlStep, SteeringAction, SteeringCommand, SteeringState};
pub use geometry::{angle_from_offset, steering_angle, x_offset, STRAIGHT_AHEAD_DEG};

use thiserror::Error;

/// Steering error types
#[derive(Error, Debug)]
pub enum SteeringError {
    #[error("Configuration error: {0}")]
    Config(String),
}
