//! Region of interest: the lower half of the frame

use image::{GrayImage, Luma};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

use crate::edges::EdgeMap;

/// Quad mask over the lower half of a `width` x `height` map.
///
/// Depends only on the dimensions, so it is built once per resolution.
#[derive(Debug, Clone)]
pub struct RegionMask {
    mask: GrayImage,
}

impl RegionMask {
    /// Build the mask with vertices (0,H), (0,H/2), (W,H/2), (W,H)
    pub fn lower_half(width: u32, height: u32) -> Self {
        let mut mask = GrayImage::new(width, height);
        if width > 0 && height > 0 {
            let (w, h) = (width as i32, height as i32);
            let polygon = [
                Point::new(0, h),
                Point::new(0, h / 2),
                Point::new(w, h / 2),
                Point::new(w, h),
            ];
            draw_polygon_mut(&mut mask, &polygon, Luma([255]));
        }
        Self { mask }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.mask.dimensions()
    }

    /// Whether (x, y) lies inside the region
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.mask.width() && y < self.mask.height() && self.mask.get_pixel(x, y).0[0] != 0
    }

    /// Keep only the edges inside the region
    pub fn apply(&self, edges: &EdgeMap) -> EdgeMap {
        debug_assert_eq!(edges.dimensions(), self.mask.dimensions());
        GrayImage::from_fn(edges.width(), edges.height(), |x, y| {
            if self.contains(x, y) {
                *edges.get_pixel(x, y)
            } else {
                Luma([0])
            }
        })
    }
}
