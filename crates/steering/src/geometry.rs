//! Steering angle from lane lines
//!
//! The angle is measured between the frame's horizontal axis and the vector
//! from bottom-center to the lane midpoint at half height: 90 degrees is
//! straight ahead, larger values steer right.

use lane_vision::LaneLine;

/// Straight ahead
pub const STRAIGHT_AHEAD_DEG: f64 = 90.0;

/// Horizontal offset of the lane midpoint from the frame center.
///
/// Two lines: mean of their half-height x minus `width / 2`.
/// One line: its own horizontal run (upper x minus lower x).
/// Zero lines: no offset.
pub fn x_offset(width: u32, lines: &[LaneLine]) -> f64 {
    match lines {
        [] => 0.0,
        [line] => (line.upper_x() - line.lower_x()) as f64,
        [first, second, ..] => {
            let mid = (width / 2) as f64;
            (first.upper_x() as f64 + second.upper_x() as f64) / 2.0 - mid
        }
    }
}

/// `atan(x_offset / (height / 2))` in degrees, shifted so 0 offset is 90
pub fn angle_from_offset(x_offset: f64, height: u32) -> f64 {
    let y_offset = (height / 2).max(1) as f64;
    (x_offset / y_offset).atan().to_degrees() + STRAIGHT_AHEAD_DEG
}

/// Steering angle in degrees for 0, 1 or 2 lane lines
pub fn steering_angle(width: u32, height: u32, lines: &[LaneLine]) -> f64 {
    angle_from_offset(x_offset(width, lines), height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_vision::LaneSide;
    use proptest::prelude::*;

    fn line(side: LaneSide, lower_x: f64, upper_x: f64, height: u32) -> LaneLine {
        LaneLine {
            side,
            slope: 1.0,
            intercept: 0.0,
            lower: (lower_x, height as f64),
            upper: (upper_x, (height / 2) as f64),
        }
    }

    #[test]
    fn test_centered_pair_is_straight() {
        let lines = [
            LaneLine::from_fit(LaneSide::Left, -1.5, 300.0, 240, 0.1),
            LaneLine::from_fit(LaneSide::Right, 1.5, -180.0, 240, 0.1),
        ];
        assert_eq!(x_offset(320, &lines), 0.0);
        assert_eq!(steering_angle(320, 240, &lines), 90.0);
    }

    #[test]
    fn test_single_line_uses_own_run() {
        let lines = [LaneLine::from_fit(LaneSide::Left, -1.5, 300.0, 240, 0.1)];
        assert_eq!(x_offset(320, &lines), 80.0);
        let expected = (80.0f64 / 120.0).atan().to_degrees() + 90.0;
        assert!((steering_angle(320, 240, &lines) - expected).abs() < 1e-9);
        assert!(steering_angle(320, 240, &lines) > 90.0);
    }

    #[test]
    fn test_drift_left_steers_left() {
        let lines = [
            line(LaneSide::Left, 0.0, 60.0, 240),
            line(LaneSide::Right, 200.0, 140.0, 240),
        ];
        // midpoint 100 vs center 160
        assert!(steering_angle(320, 240, &lines) < 90.0);
    }

    #[test]
    fn test_angle_stays_open_interval() {
        assert!(angle_from_offset(1e12, 240) < 180.0);
        assert!(angle_from_offset(-1e12, 240) > 0.0);
    }

    proptest! {
        #[test]
        fn prop_no_lines_is_straight(w in 1u32..4096, h in 2u32..4096) {
            prop_assert_eq!(steering_angle(w, h, &[]), 90.0);
        }

        #[test]
        fn prop_symmetric_pair_is_straight(
            half_w in 1u32..2048,
            h in 2u32..4096,
            spread in 0i32..1000,
        ) {
            let w = half_w * 2;
            let mid = half_w as f64;
            let lines = [
                line(LaneSide::Left, 0.0, mid - spread as f64, h),
                line(LaneSide::Right, w as f64, mid + spread as f64, h),
            ];
            prop_assert!((steering_angle(w, h, &lines) - 90.0).abs() < 1e-9);
        }

        #[test]
        fn prop_angle_monotone_in_upper_x(
            a in -2000i32..2000,
            b in -2000i32..2000,
            bump in 0i32..500,
            h in 2u32..2000,
        ) {
            let pair = |left_upper: i32| [
                line(LaneSide::Left, 0.0, left_upper as f64, h),
                line(LaneSide::Right, 320.0, b as f64, h),
            ];
            let before = steering_angle(320, h, &pair(a));
            let after = steering_angle(320, h, &pair(a + bump));
            prop_assert!(after >= before);
        }
    }
}
