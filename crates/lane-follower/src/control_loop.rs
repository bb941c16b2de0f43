//! Per-frame control loop
//!
//! acquire -> flip -> vision -> steering -> sink -> overlay -> poll quit.
//! Steering state is threaded through the smoother once per frame.

use camera_capture::FrameSource;
use lane_vision::LaneVision;
use steering::{steering_angle, ControlSmoother, SteeringState};
use tracing::{debug, info, warn};

use crate::config::FollowerConfig;
use crate::display::{compose_overlay, OverlayWriter};
use crate::quit::{FrameLimit, QuitSignal};
use crate::sink::{ActuationRecord, ActuationSink};
use crate::LoopError;

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndOfStream,
    QuitRequested,
}

/// Totals for a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    pub frames: u64,
    pub stop_events: u64,
    pub realign_events: u64,
    pub reason: StopReason,
}

pub struct ControlLoop<S, K> {
    source: S,
    sink: K,
    vision: LaneVision,
    smoother: ControlSmoother,
    state: SteeringState,
    flip_180: bool,
    overlay: Option<OverlayWriter>,
    quit: Vec<Box<dyn QuitSignal + Send>>,
}

impl<S: FrameSource, K: ActuationSink> ControlLoop<S, K> {
    pub fn new(config: &FollowerConfig, source: S, sink: K) -> Result<Self, LoopError> {
        config.validate()?;

        let overlay = match &config.control_loop.overlay_dir {
            Some(dir) => Some(OverlayWriter::create(dir)?),
            None => None,
        };
        let mut quit: Vec<Box<dyn QuitSignal + Send>> = Vec::new();
        if let Some(limit) = config.control_loop.frame_limit {
            quit.push(Box::new(FrameLimit::new(limit)));
        }

        Ok(Self {
            source,
            sink,
            vision: LaneVision::new(config.vision.clone())?,
            smoother: ControlSmoother::new(&config.steering)?,
            state: SteeringState::new(),
            flip_180: config.camera.flip_180,
            overlay,
            quit,
        })
    }

    /// Add a quit signal polled after every frame
    pub fn with_quit<Q: QuitSignal + Send + 'static>(mut self, signal: Q) -> Self {
        self.quit.push(Box::new(signal));
        self
    }

    pub fn state(&self) -> &SteeringState {
        &self.state
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn into_sink(self) -> K {
        self.sink
    }

    /// Process one frame. `Ok(None)` when the source is exhausted.
    pub fn run_once(&mut self) -> Result<Option<ActuationRecord>, LoopError> {
        let mut frame = match self.source.next_frame() {
            Ok(frame) => frame,
            Err(e) if e.is_end_of_stream() => return Ok(None),
            Err(e) => return Err(LoopError::Capture(e)),
        };
        if self.flip_180 {
            frame.rotate_180();
        }

        let analysis = self.vision.analyze(&frame)?;
        if analysis.needs_realign() {
            info!(frame = frame.sequence, "go up");
        }
        if analysis.stop.detected {
            info!(frame = frame.sequence, segments = analysis.stop.segment_count, "go down");
        }

        let angle = steering_angle(frame.width, frame.height, &analysis.lanes.lines);
        let step = self.smoother.update(self.state, angle, frame.timestamp_ns);
        self.state = step.state;

        let record = ActuationRecord {
            sequence: frame.sequence,
            timestamp_ns: frame.timestamp_ns,
            lane_lines: analysis.lanes.len(),
            realign: analysis.needs_realign(),
            stop_detected: analysis.stop.detected,
            command: step.command,
        };
        self.sink.actuate(&record)?;

        if let Some(writer) = &self.overlay {
            match compose_overlay(&frame, &analysis.lanes.lines, angle) {
                Some(image) => {
                    writer.write(frame.sequence, &image)?;
                }
                None => warn!("Frame {} could not be composed for overlay", frame.sequence),
            }
        }

        debug!(
            "Frame {}: angle {:.2}, action {}",
            frame.sequence,
            angle,
            record.command.action.as_str()
        );
        Ok(Some(record))
    }

    /// Run until the source ends or a quit signal fires
    pub fn run(&mut self) -> Result<LoopSummary, LoopError> {
        let mut summary = LoopSummary {
            frames: 0,
            stop_events: 0,
            realign_events: 0,
            reason: StopReason::EndOfStream,
        };

        loop {
            let record = match self.run_once()? {
                Some(record) => record,
                None => {
                    info!("Frame source exhausted after {} frames", summary.frames);
                    break;
                }
            };
            summary.frames += 1;
            summary.stop_events += record.stop_detected as u64;
            summary.realign_events += record.realign as u64;

            let mut quit = false;
            for signal in self.quit.iter_mut() {
                quit |= signal.should_quit();
            }
            if quit {
                info!("Quit requested after {} frames", summary.frames);
                summary.reason = StopReason::QuitRequested;
                break;
            }
        }

        Ok(summary)
    }
}
