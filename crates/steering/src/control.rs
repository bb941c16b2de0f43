//! Dead-band steering decision with a PD correction magnitude

use serde::{Deserialize, Serialize};

use crate::config::SteeringConfig;
use crate::geometry::STRAIGHT_AHEAD_DEG;
use crate::SteeringError;

/// Discrete steering decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SteeringAction {
    #[default]
    Hold,
    SteerRight,
    SteerLeft,
}

impl SteeringAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SteeringAction::Hold => "hold",
            SteeringAction::SteerRight => "steer_right",
            SteeringAction::SteerLeft => "steer_left",
        }
    }
}

/// Control state carried from one frame to the next
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SteeringState {
    /// Latest steering angle (degrees, 90 = straight ahead)
    pub angle: f64,

    /// Latest reported deviation from straight ahead
    pub deviation: f64,

    /// Latest reported error (`|deviation|`)
    pub error: f64,

    /// Error of the previous control step
    pub last_error: f64,

    /// Timestamp of the previous control step (nanoseconds)
    pub last_time_ns: Option<u64>,
}

impl SteeringState {
    /// State at control-loop start
    pub fn new() -> Self {
        Self {
            angle: STRAIGHT_AHEAD_DEG,
            ..Default::default()
        }
    }
}

/// Per-frame output handed to the actuation sink
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteeringCommand {
    pub action: SteeringAction,
    pub angle: f64,
    pub deviation: f64,
    pub error: f64,
    /// Seconds since the previous step, if there was one
    pub dt: Option<f64>,
    /// PD correction magnitude (>= 0)
    pub correction: f64,
}

/// Result of one control step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlStep {
    pub state: SteeringState,
    pub command: SteeringCommand,
}

/// Turns a steering angle into a decision, threading `SteeringState`
#[derive(Debug, Clone)]
pub struct ControlSmoother {
    dead_band_deg: f64,
    kp: f64,
    kd: f64,
}

impl ControlSmoother {
    pub fn new(config: &SteeringConfig) -> Result<Self, SteeringError> {
        config.validate()?;
        Ok(Self {
            dead_band_deg: config.dead_band_deg,
            kp: config.kp,
            kd: config.kd(),
        })
    }

    /// Classify a deviation. The dead band is open: `±dead_band` itself steers.
    pub fn classify(&self, deviation: f64) -> SteeringAction {
        if deviation > -self.dead_band_deg && deviation < self.dead_band_deg {
            SteeringAction::Hold
        } else if deviation > 0.0 {
            SteeringAction::SteerRight
        } else {
            SteeringAction::SteerLeft
        }
    }

    /// `kp * error + kd * d(error)/dt`, floored at zero
    pub fn correction(&self, error: f64, last_error: f64, dt: Option<f64>) -> f64 {
        let derivative = match dt {
            Some(dt) if dt > 0.0 => (error - last_error) / dt,
            _ => 0.0,
        };
        (self.kp * error + self.kd * derivative).max(0.0)
    }

    /// Advance one frame: consumes the previous state, returns the next one
    pub fn update(&self, state: SteeringState, angle: f64, now_ns: u64) -> ControlStep {
        let action = self.classify(angle - STRAIGHT_AHEAD_DEG);
        let deviation = match action {
            SteeringAction::Hold => 0.0,
            _ => angle - STRAIGHT_AHEAD_DEG,
        };
        let error = deviation.abs();

        let dt = state
            .last_time_ns
            .map(|last| now_ns.saturating_sub(last) as f64 / 1e9);
        let correction = self.correction(error, state.last_error, dt);

        let next = SteeringState {
            angle,
            deviation,
            error,
            last_error: error,
            last_time_ns: Some(now_ns),
        };

        ControlStep {
            state: next,
            command: SteeringCommand {
                action,
                angle,
                deviation,
                error,
                dt,
                correction,
            },
        }
    }
}
