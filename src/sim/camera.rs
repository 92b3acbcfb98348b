//! Orbit camera
//!
//! The camera sits on a sphere around `target`. Dragging changes azimuth
//! and elevation; elevation is clamped just short of the poles so the
//! view never flips.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::spherical_to_cartesian;

/// Default look-at point (roughly the middle of the wall)
pub const CAMERA_TARGET: Vec3 = Vec3::new(0.0, 2.0, 0.0);

const MIN_ELEVATION: f32 = -std::f32::consts::FRAC_PI_2 + ELEVATION_MARGIN;
const MAX_ELEVATION: f32 = std::f32::consts::FRAC_PI_2 - ELEVATION_MARGIN;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitCamera {
    /// Rotation around the vertical axis (radians)
    pub azimuth: f32,
    /// Angle above the horizon (radians)
    pub elevation: f32,
    pub distance: f32,
    pub target: Vec3,
    /// Last pointer position while a drag is active
    #[serde(skip)]
    drag_from: Option<(f32, f32)>,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            azimuth: CAMERA_AZIMUTH,
            elevation: CAMERA_ELEVATION,
            distance: CAMERA_DISTANCE,
            target: CAMERA_TARGET,
            drag_from: None,
        }
    }
}

impl OrbitCamera {
    /// Rotate by angle deltas (radians), clamping elevation
    pub fn rotate(&mut self, d_azimuth: f32, d_elevation: f32) {
        self.azimuth = crate::normalize_angle(self.azimuth + d_azimuth);
        self.elevation = (self.elevation + d_elevation).clamp(MIN_ELEVATION, MAX_ELEVATION);
    }

    /// Move toward/away from the target (positive = closer)
    pub fn zoom(&mut self, amount: f32) {
        self.distance = (self.distance - amount).clamp(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE);
    }

    pub fn begin_drag(&mut self, x: f32, y: f32) {
        self.drag_from = Some((x, y));
    }

    /// Continue a drag to pointer position (x, y). No-op without an active drag.
    pub fn drag_to(&mut self, x: f32, y: f32, sensitivity: f32) {
        let Some((last_x, last_y)) = self.drag_from else {
            return;
        };
        let dx = x - last_x;
        let dy = y - last_y;
        self.rotate(-dx * sensitivity, dy * sensitivity);
        self.drag_from = Some((x, y));
    }

    pub fn end_drag(&mut self) {
        self.drag_from = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_from.is_some()
    }

    /// Restore the default view
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// World-space eye position
    pub fn eye(&self) -> Vec3 {
        self.target + spherical_to_cartesian(self.distance, self.azimuth, self.elevation)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(CAMERA_FOV_Y, aspect.max(0.01), 0.1, 200.0)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_eye_in_front_of_wall() {
        let camera = OrbitCamera::default();
        let eye = camera.eye();
        assert!(eye.z > 0.0);
        assert!(eye.y > camera.target.y);
        assert!(((eye - camera.target).length() - CAMERA_DISTANCE).abs() < 1e-3);
    }

    #[test]
    fn test_drag_without_begin_is_ignored() {
        let mut camera = OrbitCamera::default();
        camera.drag_to(100.0, 100.0, 0.01);
        assert_eq!(camera.azimuth, CAMERA_AZIMUTH);
        assert_eq!(camera.elevation, CAMERA_ELEVATION);
    }

    #[test]
    fn test_drag_rotates() {
        let mut camera = OrbitCamera::default();
        camera.begin_drag(0.0, 0.0);
        camera.drag_to(10.0, 5.0, 0.01);
        assert!((camera.azimuth - (-0.1)).abs() < 1e-5);
        assert!((camera.elevation - (CAMERA_ELEVATION + 0.05)).abs() < 1e-5);

        camera.end_drag();
        assert!(!camera.is_dragging());
        camera.drag_to(500.0, 500.0, 0.01);
        assert!((camera.azimuth - (-0.1)).abs() < 1e-5);
    }

    #[test]
    fn test_reset_restores_default() {
        let mut camera = OrbitCamera::default();
        camera.begin_drag(0.0, 0.0);
        camera.drag_to(300.0, -120.0, 0.01);
        camera.zoom(5.0);
        camera.reset();

        let default = OrbitCamera::default();
        assert_eq!(camera.azimuth, default.azimuth);
        assert_eq!(camera.elevation, default.elevation);
        assert_eq!(camera.distance, default.distance);
        assert_eq!(camera.eye(), default.eye());
        assert!(!camera.is_dragging());
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = OrbitCamera::default();
        camera.zoom(1000.0);
        assert_eq!(camera.distance, CAMERA_MIN_DISTANCE);
        camera.zoom(-1000.0);
        assert_eq!(camera.distance, CAMERA_MAX_DISTANCE);
    }

    proptest! {
        #[test]
        fn elevation_stays_clamped(
            moves in proptest::collection::vec((-2000.0f32..2000.0, -2000.0f32..2000.0), 1..50),
            sensitivity in 0.001f32..0.05,
        ) {
            let mut camera = OrbitCamera::default();
            camera.begin_drag(0.0, 0.0);
            let (mut x, mut y) = (0.0, 0.0);
            for (dx, dy) in moves {
                x += dx;
                y += dy;
                camera.drag_to(x, y, sensitivity);
                prop_assert!(camera.elevation >= MIN_ELEVATION);
                prop_assert!(camera.elevation <= MAX_ELEVATION);
                prop_assert!(camera.elevation.abs() < std::f32::consts::FRAC_PI_2);
            }
        }
    }
}
