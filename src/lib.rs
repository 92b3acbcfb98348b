//! Brickfall - a brick wall demolition demo
//!
//! Core modules:
//! - `sim`: Scene building, detonation timing, brick physics, orbit camera
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Synthesized explosion sound
//! - `settings`: User preferences persisted in LocalStorage

pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::{EulerRot, Quat, Vec3};

/// Demo configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame; time beyond this budget is dropped
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Time between pressing Detonate and the blast (seconds)
    pub const FUSE_SECONDS: f64 = 2.0;
    /// Length of the impulse phase after the fuse burns out
    pub const IMPULSE_SECONDS: f64 = 0.25;
    /// Detonation window end; bricks are force-reset after this
    pub const DETONATION_WINDOW_SECONDS: f64 = 8.0;

    /// Gravity (units/s²)
    pub const GRAVITY: f32 = 9.8;
    /// Per-tick linear velocity damping while airborne
    pub const AIR_DRAG: f32 = 0.995;
    /// Per-tick angular velocity damping
    pub const ANGULAR_DRAG: f32 = 0.99;
    /// Vertical velocity factor on ground contact (negative = bounce)
    pub const GROUND_BOUNCE: f32 = -0.1;
    /// Horizontal velocity factor on ground contact
    pub const GROUND_FRICTION: f32 = 0.85;

    /// Peak blast speed at the blast center (units/s)
    pub const BLAST_STRENGTH: f32 = 18.0;
    /// Distance over which the blast falls off to half strength
    pub const BLAST_FALLOFF: f32 = 4.0;
    /// Extra upward kick added to every brick
    pub const BLAST_LIFT: f32 = 4.0;
    /// Maximum random spin per axis (rad/s)
    pub const BLAST_SPIN: f32 = 8.0;

    /// Default wall layout
    pub const WALL_ROWS: u32 = 8;
    pub const WALL_COLUMNS: u32 = 10;
    pub const BRICK_WIDTH: f32 = 1.0;
    pub const BRICK_HEIGHT: f32 = 0.5;
    pub const BRICK_DEPTH: f32 = 0.5;
    pub const MORTAR_GAP: f32 = 0.04;

    /// Orbit camera defaults
    pub const CAMERA_AZIMUTH: f32 = 0.0;
    pub const CAMERA_ELEVATION: f32 = 0.35;
    pub const CAMERA_DISTANCE: f32 = 22.0;
    pub const CAMERA_MIN_DISTANCE: f32 = 8.0;
    pub const CAMERA_MAX_DISTANCE: f32 = 60.0;
    /// Keeps elevation strictly inside (-π/2, π/2)
    pub const ELEVATION_MARGIN: f32 = 0.05;
    pub const CAMERA_FOV_Y: f32 = 0.87; // ~50 degrees
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    while angle >= PI {
        angle -= TAU;
    }
    while angle < -PI {
        angle += TAU;
    }
    angle
}

/// Convert XYZ Euler angles (radians) to a rotation quaternion
#[inline]
pub fn euler_to_quat(rotation: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z)
}

/// Convert spherical orbit coordinates to a cartesian offset (y up)
#[inline]
pub fn spherical_to_cartesian(radius: f32, azimuth: f32, elevation: f32) -> Vec3 {
    let horizontal = radius * elevation.cos();
    Vec3::new(
        horizontal * azimuth.sin(),
        radius * elevation.sin(),
        horizontal * azimuth.cos(),
    )
}
