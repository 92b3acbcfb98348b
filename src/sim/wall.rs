//! Procedural brick wall
//!
//! A wall is a `rows x columns` grid of box bricks laid in running bond
//! (alternate rows shifted by half a brick). Each brick keeps its initial
//! position so it can be put back after a detonation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::scene::{MeshId, MeshInstance, MeshRole, Scene, colors};
use crate::consts::*;

/// Wall dimensions and placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallLayout {
    pub rows: u32,
    pub columns: u32,
    /// Full brick extents (width, height, depth)
    pub brick_size: Vec3,
    /// Mortar gap between neighbouring bricks
    pub gap: f32,
    /// Bottom-center of the wall
    pub origin: Vec3,
}

impl Default for WallLayout {
    fn default() -> Self {
        Self {
            rows: WALL_ROWS,
            columns: WALL_COLUMNS,
            brick_size: Vec3::new(BRICK_WIDTH, BRICK_HEIGHT, BRICK_DEPTH),
            gap: MORTAR_GAP,
            origin: Vec3::ZERO,
        }
    }
}

impl WallLayout {
    pub fn with_size(rows: u32, columns: u32) -> Self {
        Self {
            rows: rows.max(1),
            columns: columns.max(1),
            ..Default::default()
        }
    }

    /// Horizontal distance between neighbouring brick centers
    #[inline]
    pub fn pitch(&self) -> f32 {
        self.brick_size.x + self.gap
    }

    /// Overall wall width (unshifted row)
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.pitch() - self.gap
    }

    /// Overall wall height
    pub fn height(&self) -> f32 {
        self.rows as f32 * (self.brick_size.y + self.gap) - self.gap
    }

    /// Rest position of the brick at (row, column)
    pub fn brick_position(&self, row: u32, column: u32) -> Vec3 {
        let pitch = self.pitch();
        // Running bond: even rows shift left a quarter, odd rows right
        let shift = if row % 2 == 0 { -pitch / 4.0 } else { pitch / 4.0 };
        let x = -self.width() / 2.0 + self.brick_size.x / 2.0 + column as f32 * pitch + shift;
        let y = self.brick_size.y / 2.0 + row as f32 * (self.brick_size.y + self.gap);
        self.origin + Vec3::new(x, y, 0.0)
    }

    /// Center of the wall (used as blast center)
    pub fn center(&self) -> Vec3 {
        self.origin + Vec3::new(0.0, self.height() / 2.0, 0.0)
    }
}

/// Per-brick physics and bookkeeping state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    /// Mesh instance this brick drives
    pub mesh: MeshId,
    pub initial_position: Vec3,
    pub position: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    /// XYZ Euler angles (radians)
    pub rotation: Vec3,
    pub mass: f32,
    /// Set once the blast impulse has been applied
    pub active: bool,
    /// Half extents, for ground contact
    pub half_size: Vec3,
}

impl Brick {
    pub fn new(mesh: MeshId, position: Vec3, size: Vec3) -> Self {
        Self {
            mesh,
            initial_position: position,
            position,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            rotation: Vec3::ZERO,
            mass: 1.0,
            active: false,
            half_size: size / 2.0,
        }
    }

    /// Put the brick back to its rest pose
    pub fn reset(&mut self) {
        self.position = self.initial_position;
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
        self.rotation = Vec3::ZERO;
        self.active = false;
    }

    /// True if the brick sits exactly at its rest pose
    pub fn at_rest(&self) -> bool {
        self.position == self.initial_position
            && self.rotation == Vec3::ZERO
            && self.velocity == Vec3::ZERO
    }
}

/// Add the wall's brick meshes to `scene` and return the brick records
pub fn build_wall(scene: &mut Scene, layout: &WallLayout) -> Vec<Brick> {
    let mut bricks = Vec::with_capacity((layout.rows * layout.columns) as usize);

    for row in 0..layout.rows {
        for column in 0..layout.columns {
            let position = layout.brick_position(row, column);
            let color = if (row + column) % 3 == 0 {
                colors::BRICK_DARK
            } else {
                colors::BRICK
            };
            let mesh = scene.add_mesh(MeshInstance::cuboid(
                MeshRole::Brick,
                layout.brick_size,
                position,
                color,
            ));
            bricks.push(Brick::new(mesh, position, layout.brick_size));
        }
    }

    bricks
}
