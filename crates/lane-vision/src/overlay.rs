//! Diagnostic overlays: lane lines and heading line blended onto a frame

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::lane::LaneLine;

pub const LANE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const LANE_WIDTH: u32 = 6;
pub const HEADING_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const HEADING_WIDTH: u32 = 5;

const BASE_WEIGHT: f32 = 0.8;
const OVERLAY_WEIGHT: f32 = 1.0;
const GAMMA: f32 = 1.0;

/// `sat(0.8 * base + 1.0 * overlay + 1)` per channel
pub fn blend(base: &RgbImage, overlay: &RgbImage) -> RgbImage {
    debug_assert_eq!(base.dimensions(), overlay.dimensions());
    RgbImage::from_fn(base.width(), base.height(), |x, y| {
        let b = base.get_pixel(x, y).0;
        let o = overlay.get_pixel(x, y).0;
        Rgb(std::array::from_fn(|c| {
            (b[c] as f32 * BASE_WEIGHT + o[c] as f32 * OVERLAY_WEIGHT + GAMMA)
                .round()
                .clamp(0.0, 255.0) as u8
        }))
    })
}

/// Draw a line of the given width by stacking parallel one-pixel lines
pub fn draw_thick_line(
    canvas: &mut RgbImage,
    start: (f32, f32),
    end: (f32, f32),
    color: Rgb<u8>,
    width: u32,
) {
    // Keep far-off endpoints from turning into billion-step rasterizations
    let limit = 4.0 * canvas.width().max(canvas.height()) as f32;
    let clamp = |(x, y): (f32, f32)| (x.clamp(-limit, limit), y.clamp(-limit, limit));
    let (start, end) = (clamp(start), clamp(end));

    let (dx, dy) = (end.0 - start.0, end.1 - start.1);
    let len = dx.hypot(dy);
    if len == 0.0 || !len.is_finite() {
        return;
    }
    let normal = (-dy / len, dx / len);
    let half = (width.max(1) as f32 - 1.0) / 2.0;
    let mut offset = -half;
    while offset <= half + f32::EPSILON {
        let shift = (normal.0 * offset, normal.1 * offset);
        draw_line_segment_mut(
            canvas,
            (start.0 + shift.0, start.1 + shift.1),
            (end.0 + shift.0, end.1 + shift.1),
            color,
        );
        offset += 0.5;
    }
}

/// Blend the lane lines onto `frame`
pub fn draw_lane_lines(frame: &RgbImage, lines: &[LaneLine]) -> RgbImage {
    let mut layer = RgbImage::new(frame.width(), frame.height());
    for line in lines {
        let s = line.segment();
        draw_thick_line(
            &mut layer,
            (s.x1 as f32, s.y1 as f32),
            (s.x2 as f32, s.y2 as f32),
            LANE_COLOR,
            LANE_WIDTH,
        );
    }
    blend(frame, &layer)
}

/// Endpoints of the heading line for a steering angle in degrees:
/// from bottom-center up to half height
pub fn heading_endpoints(width: u32, height: u32, steering_angle_deg: f64) -> ((f64, f64), (f64, f64)) {
    let radians = steering_angle_deg.to_radians();
    let x1 = (width / 2) as f64;
    let y1 = height as f64;
    let x2 = x1 - (height as f64 / 2.0) / radians.tan();
    let y2 = (height / 2) as f64;
    ((x1, y1), (x2, y2))
}

/// Blend the heading line onto `frame`
pub fn draw_heading_line(frame: &RgbImage, steering_angle_deg: f64) -> RgbImage {
    let mut layer = RgbImage::new(frame.width(), frame.height());
    let ((x1, y1), (x2, y2)) = heading_endpoints(frame.width(), frame.height(), steering_angle_deg);
    draw_thick_line(
        &mut layer,
        (x1 as f32, y1 as f32),
        (x2 as f32, y2 as f32),
        HEADING_COLOR,
        HEADING_WIDTH,
    );
    blend(frame, &layer)
}
