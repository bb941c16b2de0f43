//! Tracing subscriber setup

use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::LoopError;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Parse a level name such as `info` or `DEBUG`
pub fn parse_level(level: &str) -> Result<Level, LoopError> {
    level
        .parse::<Level>()
        .map_err(|_| LoopError::Logging(format!("unknown log level '{}'", level)))
}

/// Initialize logging
pub fn init_logging(level: &str, format: LogFormat) -> Result<(), LoopError> {
    let level = parse_level(level)?;
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let installed = match format {
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    };
    installed.map_err(|e| LoopError::Logging(e.to_string()))
}
