//! Frame sources (the capture collaborator)

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Instant;

use image::imageops::FilterType;
use tracing::{debug, info};

use crate::{CameraConfig, CameraError, VideoFrame};

const FRAME_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Blocking source of frames
pub trait FrameSource {
    /// Block until the next frame is available
    fn next_frame(&mut self) -> Result<VideoFrame, CameraError>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<VideoFrame, CameraError> {
        (**self).next_frame()
    }
}

/// Replays recorded frames from a directory, in file name order
pub struct ImageDirSource {
    files: Vec<PathBuf>,
    cursor: usize,
    width: u32,
    height: u32,
    started: Instant,
}

impl ImageDirSource {
    /// Open a directory of frames
    pub fn open(config: &CameraConfig) -> Result<Self, CameraError> {
        let files = list_frames(&config.source_dir)?;
        if files.is_empty() {
            return Err(CameraError::Open(format!(
                "no frames in {}",
                config.source_dir.display()
            )));
        }
        info!(
            "Replaying {} frames from {} at {}x{}",
            files.len(),
            config.source_dir.display(),
            config.width,
            config.height
        );

        Ok(Self {
            files,
            cursor: 0,
            width: config.width,
            height: config.height,
            started: Instant::now(),
        })
    }

    /// Number of frames not yet delivered
    pub fn remaining(&self) -> usize {
        self.files.len() - self.cursor
    }
}

impl FrameSource for ImageDirSource {
    fn next_frame(&mut self) -> Result<VideoFrame, CameraError> {
        let path = self.files.get(self.cursor).ok_or(CameraError::EndOfStream)?;
        let mut img = image::open(path)?.to_rgb8();
        if img.dimensions() != (self.width, self.height) {
            debug!(
                "Resizing {} from {:?} to {}x{}",
                path.display(),
                img.dimensions(),
                self.width,
                self.height
            );
            img = image::imageops::resize(&img, self.width, self.height, FilterType::Triangle);
        }

        let sequence = self.cursor as u32;
        self.cursor += 1;
        let timestamp_ns = self.started.elapsed().as_nanos() as u64;
        Ok(VideoFrame::from_rgb_image(img, timestamp_ns, sequence))
    }
}

fn list_frames(dir: &Path) -> Result<Vec<PathBuf>, CameraError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| CameraError::Open(format!("{}: {}", dir.display(), e)))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| CameraError::Stream(e.to_string()))?.path();
        let is_frame = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if is_frame {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Serves pre-built frames from memory
#[derive(Debug, Default)]
pub struct ReplaySource {
    frames: VecDeque<VideoFrame>,
}

impl ReplaySource {
    pub fn new<I: IntoIterator<Item = VideoFrame>>(frames: I) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }
}

impl FrameSource for ReplaySource {
    fn next_frame(&mut self) -> Result<VideoFrame, CameraError> {
        self.frames.pop_front().ok_or(CameraError::EndOfStream)
    }
}
