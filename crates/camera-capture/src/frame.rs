//! Video frame types and processing

use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Order of the three color samples in each pixel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

/// Decoded 3-channel video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Interleaved pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Capture timestamp (nanoseconds)
    pub timestamp_ns: u64,
    /// Frame sequence number
    pub sequence: u32,
    /// Channel order of `data`
    pub order: ChannelOrder,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp_ns: u64, sequence: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp_ns,
            sequence,
            order: ChannelOrder::Rgb,
        }
    }

    /// Same frame, declared in a different channel order
    pub fn with_order(mut self, order: ChannelOrder) -> Self {
        self.order = order;
        self
    }

    /// Wrap a decoded RGB image
    pub fn from_rgb_image(img: RgbImage, timestamp_ns: u64, sequence: u32) -> Self {
        let (width, height) = img.dimensions();
        Self::new(img.into_raw(), width, height, timestamp_ns, sequence)
    }

    /// Whether the buffer matches the declared dimensions
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.data.len() == self.width as usize * self.height as usize * 3
    }

    /// Get pixel at (x, y) in the frame's native channel order
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        self.data
            .get(idx..idx + 3)
            .map(|p| [p[0], p[1], p[2]])
    }

    /// Get pixel at (x, y) as RGB regardless of native order
    pub fn rgb_at(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        self.get_pixel(x, y).map(|p| match self.order {
            ChannelOrder::Rgb => p,
            ChannelOrder::Bgr => [p[2], p[1], p[0]],
        })
    }

    /// Rotate the frame by 180° in place (flip around both axes)
    pub fn rotate_180(&mut self) {
        let pixels = self.data.len() / 3;
        for i in 0..pixels / 2 {
            let j = pixels - 1 - i;
            for c in 0..3 {
                self.data.swap(i * 3 + c, j * 3 + c);
            }
        }
    }

    /// Copy out as an RGB image (for drawing and saving)
    pub fn to_rgb_image(&self) -> Option<RgbImage> {
        let data = match self.order {
            ChannelOrder::Rgb => self.data.clone(),
            ChannelOrder::Bgr => self
                .data
                .chunks_exact(3)
                .flat_map(|p| [p[2], p[1], p[0]])
                .collect(),
        };
        RgbImage::from_raw(self.width, self.height, data)
    }
}
