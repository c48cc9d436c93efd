// Frame utilities for DMat4
//
// A surface frame is a homogeneous transformation stored in a DMat4.
// Note: glam::DMat4 already provides transform_point3() and inverse()

use glam::{DMat4, DVec3};

/// Determinant magnitude below which a frame is treated as singular.
const SINGULAR_EPS: f64 = 1e-12;

/// Extension trait for DMat4 to provide surface-frame utilities
pub trait FrameExt {
    /// Position of the frame origin in global coordinates
    /// (the translation column of the homogeneous matrix).
    fn frame_center(&self) -> DVec3;

    /// Inverse of the frame, or `None` when the frame is singular
    /// (determinant magnitude below 1e-12) and no inverse exists.
    fn checked_inverse(&self) -> Option<DMat4>;
}

impl FrameExt for DMat4 {
    fn frame_center(&self) -> DVec3 {
        self.w_axis.truncate()
    }

    fn checked_inverse(&self) -> Option<DMat4> {
        if self.determinant().abs() < SINGULAR_EPS {
            None
        } else {
            Some(self.inverse())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_center_identity() {
        assert_eq!(DMat4::IDENTITY.frame_center(), DVec3::ZERO);
    }

    #[test]
    fn test_frame_center_translation() {
        let frame = DMat4::from_translation(DVec3::new(10.0, 20.0, 30.0));
        assert_eq!(frame.frame_center(), DVec3::new(10.0, 20.0, 30.0));
    }

    #[test]
    fn test_checked_inverse_roundtrip() {
        let frame = DMat4::from_translation(DVec3::new(1.0, 2.0, 3.0));
        let inv = frame.checked_inverse().unwrap();

        let point = DVec3::new(5.0, -4.0, 0.5);
        let back = inv.transform_point3(frame.transform_point3(point));
        assert!((back - point).length() < 1e-12);
    }

    #[test]
    fn test_checked_inverse_singular() {
        assert!(DMat4::ZERO.checked_inverse().is_none());

        // Rank-deficient frame: two identical columns
        let mut frame = DMat4::IDENTITY;
        frame.y_axis = frame.x_axis;
        assert!(frame.checked_inverse().is_none());
    }
}
