//! Layered configuration: defaults, optional TOML file, environment

use camera_capture::CameraConfig;
use lane_vision::VisionConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use steering::SteeringConfig;

use crate::logging::LogFormat;
use crate::LoopError;

/// Prefix of environment overrides, e.g. `LANE_FOLLOWER_STEERING__KP=0.5`
pub const ENV_PREFIX: &str = "LANE_FOLLOWER";

/// Control loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Stop after this many frames
    pub frame_limit: Option<u64>,

    /// Write composed overlay PNGs here
    pub overlay_dir: Option<PathBuf>,

    /// Maximum log level (`trace` .. `error`)
    pub log_level: String,

    pub log_format: LogFormat,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            frame_limit: None,
            overlay_dir: None,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// Complete lane follower configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowerConfig {
    pub camera: CameraConfig,
    pub vision: VisionConfig,
    pub steering: SteeringConfig,
    #[serde(rename = "loop")]
    pub control_loop: LoopConfig,
}

impl FollowerConfig {
    /// Load defaults, then `path` if given, then `LANE_FOLLOWER_*` variables
    pub fn load(path: Option<&Path>) -> Result<Self, LoopError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }
        let settings = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let config: FollowerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section before the loop starts
    pub fn validate(&self) -> Result<(), LoopError> {
        self.vision.validate()?;
        self.steering.validate()?;
        if self.camera.width == 0 || self.camera.height < 2 {
            return Err(LoopError::Config(::config::ConfigError::Message(format!(
                "capture resolution {}x{} too small",
                self.camera.width, self.camera.height
            ))));
        }
        Ok(())
    }
}
