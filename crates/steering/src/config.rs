//! Steering control configuration

use serde::{Deserialize, Serialize};

use crate::SteeringError;

/// Steering control configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    /// Half-width of the dead band around straight ahead (degrees)
    pub dead_band_deg: f64,

    /// Proportional gain
    pub kp: f64,

    /// Derivative gain as a fraction of `kp`
    pub kd_ratio: f64,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            dead_band_deg: 5.0,
            kp: 0.4,
            kd_ratio: 0.65,
        }
    }
}

impl SteeringConfig {
    /// Derivative gain
    pub fn kd(&self) -> f64 {
        self.kp * self.kd_ratio
    }

    pub fn validate(&self) -> Result<(), SteeringError> {
        let finite_non_negative = |v: f64| v.is_finite() && v >= 0.0;
        if !finite_non_negative(self.dead_band_deg) {
            return Err(SteeringError::Config(format!("dead band {} must be >= 0", self.dead_band_deg)));
        }
        if !finite_non_negative(self.kp) || !finite_non_negative(self.kd_ratio) {
            return Err(SteeringError::Config(format!(
                "gains must be finite and >= 0 (kp {}, kd ratio {})",
                self.kp, self.kd_ratio
            )));
        }
        Ok(())
    }
}
