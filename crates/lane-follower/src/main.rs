//! Lane Follower - Main Entry Point

use anyhow::Context;
use camera_capture::ImageDirSource;
use lane_follower::{init_logging, ControlLoop, CtrlCSignal, FollowerConfig, LogSink};
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = FollowerConfig::load(config_path.as_deref()).context("loading configuration")?;

    init_logging(&config.control_loop.log_level, config.control_loop.log_format)?;

    info!("=== Lane Follower v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Replaying {} at {}x{}",
        config.camera.source_dir.display(),
        config.camera.width,
        config.camera.height
    );

    let source = ImageDirSource::open(&config.camera).context("opening frame source")?;
    info!("{} frames queued", source.remaining());
    let quit = CtrlCSignal::install();
    let mut control = ControlLoop::new(&config, source, LogSink)?.with_quit(quit);

    let summary = tokio::task::spawn_blocking(move || control.run()).await??;
    info!(
        "Done: {} frames, {} stop events, {} realignments ({:?})",
        summary.frames, summary.stop_events, summary.realign_events, summary.reason
    );

    Ok(())
}
