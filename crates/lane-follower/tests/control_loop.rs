use camera_capture::{CameraError, FrameSource, ReplaySource, VideoFrame};
use lane_follower::{
    ActuationRecord, ControlLoop, CtrlCSignal, FollowerConfig, JsonLinesSink, LoopError, StopReason,
};
use steering::SteeringAction;

const W: u32 = 320;
const H: u32 = 240;
const BLUE: [u8; 3] = [20, 20, 220];
const RED: [u8; 3] = [220, 20, 20];

/// Frame painted by `paint(x, y)`, black where it returns `None`
fn frame_from(sequence: u32, timestamp_ns: u64, paint: impl Fn(u32, u32) -> Option<[u8; 3]>) -> VideoFrame {
    let mut data = Vec::with_capacity((W * H * 3) as usize);
    for y in 0..H {
        for x in 0..W {
            data.extend_from_slice(&paint(x, y).unwrap_or([0, 0, 0]));
        }
    }
    VideoFrame::new(data, W, H, timestamp_ns, sequence)
}

fn on_left_stripe(x: u32, y: u32) -> bool {
    let center = 40.0 + (H - y) as f64 * 2.0 / 3.0;
    (x as f64 - center).abs() < 6.0
}

fn on_right_stripe(x: u32, y: u32) -> bool {
    let center = 280.0 - (H - y) as f64 * 2.0 / 3.0;
    (x as f64 - center).abs() < 6.0
}

fn two_lanes(sequence: u32) -> VideoFrame {
    frame_from(sequence, sequence as u64 * 33_000_000, |x, y| {
        (on_left_stripe(x, y) || on_right_stripe(x, y)).then_some(BLUE)
    })
}

fn left_lane_only(sequence: u32) -> VideoFrame {
    frame_from(sequence, sequence as u64 * 33_000_000, |x, y| on_left_stripe(x, y).then_some(BLUE))
}

fn blank(sequence: u32, timestamp_ns: u64) -> VideoFrame {
    frame_from(sequence, timestamp_ns, |_, _| None)
}

fn upright_config() -> FollowerConfig {
    let mut config = FollowerConfig::default();
    config.camera.flip_180 = false;
    config
}

fn run_frames(
    config: &FollowerConfig,
    frames: Vec<VideoFrame>,
) -> (lane_follower::LoopSummary, Vec<ActuationRecord>) {
    let mut control = ControlLoop::new(config, ReplaySource::new(frames), Vec::new()).unwrap();
    let summary = control.run().unwrap();
    (summary, control.into_sink())
}

struct FailingSource;

impl FrameSource for FailingSource {
    fn next_frame(&mut self) -> Result<VideoFrame, CameraError> {
        Err(CameraError::Stream("device unplugged".into()))
    }
}

#[test]
fn test_empty_source_ends_cleanly() {
    let (summary, records) = run_frames(&upright_config(), Vec::new());
    assert_eq!(summary.frames, 0);
    assert_eq!(summary.reason, StopReason::EndOfStream);
    assert!(records.is_empty());
}

#[test]
fn test_blank_frames_hold_and_realign() {
    let frames = (0..3).map(|i| blank(i, i as u64 * 1_000_000)).collect();
    let (summary, records) = run_frames(&upright_config(), frames);

    assert_eq!(summary.frames, 3);
    assert_eq!(summary.realign_events, 3);
    assert_eq!(summary.stop_events, 0);
    for record in &records {
        assert!(record.realign);
        assert_eq!(record.lane_lines, 0);
        assert_eq!(record.command.action, SteeringAction::Hold);
        assert_eq!(record.command.angle, 90.0);
    }
    assert_eq!(records[0].command.dt, None);
    assert!((records[1].command.dt.unwrap() - 0.001).abs() < 1e-12);
}

#[test]
fn test_centered_lanes_hold() {
    let (_, records) = run_frames(&upright_config(), vec![two_lanes(0)]);
    let record = records[0];
    assert_eq!(record.lane_lines, 2);
    assert!(!record.realign);
    assert!(!record.stop_detected);
    assert_eq!(record.command.action, SteeringAction::Hold);
}

#[test]
fn test_single_left_lane_steers_right() {
    let (_, records) = run_frames(&upright_config(), vec![left_lane_only(0)]);
    let record = records[0];
    assert_eq!(record.lane_lines, 1);
    assert!(record.command.angle > 95.0);
    assert_eq!(record.command.action, SteeringAction::SteerRight);
    assert!(record.command.correction > 0.0);
}

#[test]
fn test_frame_limit_stops_loop() {
    let mut config = upright_config();
    config.control_loop.frame_limit = Some(2);
    let frames = (0..5).map(|i| blank(i, 0)).collect();
    let (summary, records) = run_frames(&config, frames);
    assert_eq!(summary.frames, 2);
    assert_eq!(summary.reason, StopReason::QuitRequested);
    assert_eq!(records.len(), 2);
}

#[test]
fn test_quit_signal_checked_after_each_frame() {
    let signal = CtrlCSignal::default();
    signal.trigger();
    let frames: Vec<_> = (0..4).map(|i| blank(i, 0)).collect();
    let mut control = ControlLoop::new(&upright_config(), ReplaySource::new(frames), Vec::new())
        .unwrap()
        .with_quit(signal);
    let summary = control.run().unwrap();
    assert_eq!(summary.frames, 1);
    assert_eq!(summary.reason, StopReason::QuitRequested);
}

#[test]
fn test_upside_down_camera_is_flipped() {
    // Red marking painted in the top rows; after the 180° flip it sits in the region of interest
    let frame = frame_from(0, 0, |x, y| ((20..60).contains(&y) && (80..240).contains(&x)).then_some(RED));

    let (summary, records) = run_frames(&FollowerConfig::default(), vec![frame.clone()]);
    assert_eq!(summary.stop_events, 1);
    assert!(records[0].stop_detected);

    let (summary, _) = run_frames(&upright_config(), vec![frame]);
    assert_eq!(summary.stop_events, 0);
}

#[test]
fn test_capture_failure_is_fatal() {
    let mut control = ControlLoop::new(&upright_config(), FailingSource, Vec::new()).unwrap();
    match control.run() {
        Err(LoopError::Capture(CameraError::Stream(msg))) => assert_eq!(msg, "device unplugged"),
        other => panic!("expected capture failure, got {:?}", other),
    }
}

#[test]
fn test_malformed_frame_is_error() {
    let frame = VideoFrame::new(vec![0; 7], W, H, 0, 0);
    let mut control =
        ControlLoop::new(&upright_config(), ReplaySource::new(vec![frame]), Vec::new()).unwrap();
    assert!(matches!(control.run(), Err(LoopError::Vision(_))));
}

#[test]
fn test_state_threads_across_frames() {
    let mut control = ControlLoop::new(
        &upright_config(),
        ReplaySource::new(vec![left_lane_only(0), left_lane_only(1)]),
        Vec::new(),
    )
    .unwrap();

    let first = control.run_once().unwrap().unwrap();
    assert_eq!(control.state().last_time_ns, Some(0));
    let second = control.run_once().unwrap().unwrap();
    assert_eq!(control.state().last_time_ns, Some(33_000_000));
    assert!((second.command.dt.unwrap() - 0.033).abs() < 1e-9);
    // Same picture twice: no error change, so only the proportional term remains
    assert!((second.command.correction - first.command.correction).abs() < 1e-9);
    assert!(control.run_once().unwrap().is_none());
}

#[test]
fn test_json_lines_output() {
    let frames = vec![two_lanes(0), blank(1, 40_000_000)];
    let mut control = ControlLoop::new(
        &upright_config(),
        ReplaySource::new(frames),
        JsonLinesSink::new(Vec::new()),
    )
    .unwrap();
    control.run().unwrap();

    let out = String::from_utf8(control.into_sink().into_inner()).unwrap();
    let records: Vec<ActuationRecord> = out
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].lane_lines, 2);
    assert!(records[1].realign);
}

#[test]
fn test_overlay_files_written() {
    let dir = std::env::temp_dir().join(format!("lane-follower-it-{}", std::process::id()));
    let mut config = upright_config();
    config.control_loop.overlay_dir = Some(dir.clone());

    run_frames(&config, vec![two_lanes(4), blank(5, 0)]);

    assert!(dir.join("heading_000004.png").exists());
    assert!(dir.join("heading_000005.png").exists());
    std::fs::remove_dir_all(&dir).ok();
}
