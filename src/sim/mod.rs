//! Deterministic simulation module
//!
//! All scene logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (bricks in build order)
//! - No rendering or platform dependencies

pub mod camera;
pub mod detonation;
pub mod physics;
pub mod scene;
pub mod state;
pub mod tick;
pub mod wall;

pub use camera::OrbitCamera;
pub use detonation::{Detonation, DetonationPhase};
pub use physics::{apply_blast, resolve_ground_contact, step_brick};
pub use scene::{Line, MeshId, MeshInstance, MeshRole, Scene, Shape, build_scene};
pub use state::{SceneEvent, SceneState};
pub use tick::{Stepper, TickInput, tick};
pub use wall::{Brick, WallLayout, build_wall};
