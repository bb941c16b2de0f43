//! Actuation sinks: where per-frame steering decisions go

use serde::{Deserialize, Serialize};
use std::io::Write;
use steering::{SteeringAction, SteeringCommand};
use tracing::info;

use crate::LoopError;

/// Everything the loop decided for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActuationRecord {
    pub sequence: u32,
    pub timestamp_ns: u64,
    pub lane_lines: usize,
    pub realign: bool,
    pub stop_detected: bool,
    pub command: SteeringCommand,
}

/// Consumer of the per-frame steering decision
pub trait ActuationSink {
    fn actuate(&mut self, record: &ActuationRecord) -> Result<(), LoopError>;
}

impl<S: ActuationSink + ?Sized> ActuationSink for Box<S> {
    fn actuate(&mut self, record: &ActuationRecord) -> Result<(), LoopError> {
        (**self).actuate(record)
    }
}

/// Keeps every record in memory
impl ActuationSink for Vec<ActuationRecord> {
    fn actuate(&mut self, record: &ActuationRecord) -> Result<(), LoopError> {
        self.push(*record);
        Ok(())
    }
}

/// Emits one tracing event per frame
#[derive(Debug, Default)]
pub struct LogSink;

impl ActuationSink for LogSink {
    fn actuate(&mut self, record: &ActuationRecord) -> Result<(), LoopError> {
        let c = &record.command;
        let what = match c.action {
            SteeringAction::Hold => "inside dead band, keep straight",
            SteeringAction::SteerRight => "lane midpoint to the right, steer right",
            SteeringAction::SteerLeft => "lane midpoint to the left, steer left",
        };
        info!(
            frame = record.sequence,
            action = c.action.as_str(),
            angle = c.angle,
            deviation = c.deviation,
            error = c.error,
            correction = c.correction,
            "{}",
            what
        );
        Ok(())
    }
}

/// Writes one JSON object per line
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ActuationSink for JsonLinesSink<W> {
    fn actuate(&mut self, record: &ActuationRecord) -> Result<(), LoopError> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sequence: u32, action: SteeringAction) -> ActuationRecord {
        ActuationRecord {
            sequence,
            timestamp_ns: sequence as u64 * 33_000_000,
            lane_lines: 2,
            realign: false,
            stop_detected: false,
            command: SteeringCommand {
                action,
                angle: 90.0,
                deviation: 0.0,
                error: 0.0,
                dt: None,
                correction: 0.0,
            },
        }
    }

    #[test]
    fn test_json_lines() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.actuate(&record(0, SteeringAction::Hold)).unwrap();
        sink.actuate(&record(1, SteeringAction::SteerLeft)).unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);

        let second: ActuationRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.sequence, 1);
        assert_eq!(second.command.action, SteeringAction::SteerLeft);
        assert!(lines[1].contains("\"steer_left\""));
    }

    #[test]
    fn test_recording_sink() {
        let mut sink: Vec<ActuationRecord> = Vec::new();
        sink.actuate(&record(3, SteeringAction::Hold)).unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].sequence, 3);
    }

    #[test]
    fn test_log_sink_accepts_records() {
        assert!(LogSink.actuate(&record(0, SteeringAction::SteerRight)).is_ok());
    }
}
