//! Scene graph: mesh instances and guide lines
//!
//! Everything drawn is either a box mesh instance or a line segment.
//! Bricks reference their mesh instance by `MeshId` and write their
//! transform back into it every tick.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use super::wall::{Brick, WallLayout, build_wall};
use crate::euler_to_quat;

/// Index of a mesh instance inside `Scene::meshes`
pub type MeshId = usize;

/// Renderable shape of a mesh instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Axis-aligned box with full extents (width, height, depth)
    Box { size: Vec3 },
}

/// What a mesh instance belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeshRole {
    Brick,
    Detonator,
    Figure,
    Ground,
}

/// A placed mesh: shape + transform + color
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshInstance {
    pub shape: Shape,
    pub role: MeshRole,
    pub position: Vec3,
    /// XYZ Euler angles (radians)
    pub rotation: Vec3,
    pub color: [f32; 4],
}

impl MeshInstance {
    pub fn cuboid(role: MeshRole, size: Vec3, position: Vec3, color: [f32; 4]) -> Self {
        Self {
            shape: Shape::Box { size },
            role,
            position,
            rotation: Vec3::ZERO,
            color,
        }
    }

    /// Model matrix (scale folded in for boxes)
    pub fn model_matrix(&self) -> Mat4 {
        let Shape::Box { size } = self.shape;
        Mat4::from_scale_rotation_translation(size, euler_to_quat(self.rotation), self.position)
    }
}

/// A colored line segment (guide lines, detonator wire)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Line {
    pub start: Vec3,
    pub end: Vec3,
    pub color: [f32; 4],
}

/// Colors for scene elements
pub mod colors {
    pub const BRICK: [f32; 4] = [0.72, 0.27, 0.18, 1.0];
    pub const BRICK_DARK: [f32; 4] = [0.6, 0.22, 0.15, 1.0];
    pub const GROUND: [f32; 4] = [0.32, 0.36, 0.3, 1.0];
    pub const DETONATOR_BODY: [f32; 4] = [0.85, 0.6, 0.1, 1.0];
    pub const DETONATOR_HANDLE: [f32; 4] = [0.2, 0.2, 0.22, 1.0];
    pub const WIRE: [f32; 4] = [0.9, 0.1, 0.1, 1.0];
    pub const GRID: [f32; 4] = [0.45, 0.5, 0.45, 1.0];
    pub const SKIN: [f32; 4] = [0.93, 0.76, 0.6, 1.0];
    pub const SHIRTS: [[f32; 4]; 3] = [
        [0.2, 0.4, 0.8, 1.0],
        [0.25, 0.65, 0.3, 1.0],
        [0.85, 0.85, 0.2, 1.0],
    ];
    pub const TROUSERS: [f32; 4] = [0.15, 0.15, 0.25, 1.0];
}

/// Ground slab half-size (x/z) and grid spacing
const GROUND_EXTENT: f32 = 20.0;
const GROUND_THICKNESS: f32 = 0.2;
const GRID_SPACING: f32 = 2.0;

/// Fully built scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub meshes: Vec<MeshInstance>,
    pub lines: Vec<Line>,
    /// Position of the detonator prop (wire origin)
    pub detonator: Vec3,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            meshes: Vec::new(),
            lines: Vec::new(),
            detonator: Vec3::ZERO,
        }
    }

    /// Add a mesh instance and return its id
    pub fn add_mesh(&mut self, mesh: MeshInstance) -> MeshId {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn add_line(&mut self, start: Vec3, end: Vec3, color: [f32; 4]) {
        self.lines.push(Line { start, end, color });
    }

    /// Write a transform back into a mesh instance
    pub fn set_transform(&mut self, id: MeshId, position: Vec3, rotation: Vec3) {
        if let Some(mesh) = self.meshes.get_mut(id) {
            mesh.position = position;
            mesh.rotation = rotation;
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the whole scene: ground, wall, detonator, figures and guide lines.
///
/// Returns the scene and the brick records pointing into it.
pub fn build_scene(layout: &WallLayout) -> (Scene, Vec<Brick>) {
    let mut scene = Scene::new();

    scene.add_mesh(MeshInstance::cuboid(
        MeshRole::Ground,
        Vec3::new(GROUND_EXTENT * 2.0, GROUND_THICKNESS, GROUND_EXTENT * 2.0),
        Vec3::new(0.0, -GROUND_THICKNESS / 2.0, 0.0),
        colors::GROUND,
    ));

    let bricks = build_wall(&mut scene, layout);

    // Detonator sits in front of the wall, off to the right
    let front = layout.origin.z + layout.brick_size.z * 0.5 + 5.0;
    let detonator = Vec3::new(layout.width() * 0.35, 0.0, front);
    add_detonator(&mut scene, detonator);

    // Wire from the plunger box to the base of the wall
    let wall_base = Vec3::new(0.0, 0.05, layout.origin.z + layout.brick_size.z * 0.5);
    scene.add_line(detonator + Vec3::new(0.0, 0.3, 0.0), wall_base, colors::WIRE);

    // Spectators at a safe distance
    let figure_z = front + 2.5;
    for (i, x) in [-4.0_f32, -1.5, 3.0].into_iter().enumerate() {
        add_figure(&mut scene, Vec3::new(x, 0.0, figure_z), colors::SHIRTS[i]);
    }

    add_ground_grid(&mut scene);

    log::debug!(
        "Scene built: {} meshes, {} lines, {} bricks",
        scene.meshes.len(),
        scene.lines.len(),
        bricks.len()
    );

    (scene, bricks)
}

/// Plunger box with a T-handle
fn add_detonator(scene: &mut Scene, base: Vec3) {
    scene.detonator = base;
    scene.add_mesh(MeshInstance::cuboid(
        MeshRole::Detonator,
        Vec3::new(0.8, 0.6, 0.6),
        base + Vec3::new(0.0, 0.3, 0.0),
        colors::DETONATOR_BODY,
    ));
    scene.add_mesh(MeshInstance::cuboid(
        MeshRole::Detonator,
        Vec3::new(0.08, 0.5, 0.08),
        base + Vec3::new(0.0, 0.85, 0.0),
        colors::DETONATOR_HANDLE,
    ));
    scene.add_mesh(MeshInstance::cuboid(
        MeshRole::Detonator,
        Vec3::new(0.6, 0.08, 0.08),
        base + Vec3::new(0.0, 1.1, 0.0),
        colors::DETONATOR_HANDLE,
    ));
}

/// Low-poly humanoid standing on the ground at `feet`, facing the wall
fn add_figure(scene: &mut Scene, feet: Vec3, shirt: [f32; 4]) {
    let parts = [
        // (size, offset from feet, color)
        (Vec3::new(0.22, 0.8, 0.22), Vec3::new(-0.15, 0.4, 0.0), colors::TROUSERS),
        (Vec3::new(0.22, 0.8, 0.22), Vec3::new(0.15, 0.4, 0.0), colors::TROUSERS),
        (Vec3::new(0.6, 0.75, 0.3), Vec3::new(0.0, 1.18, 0.0), shirt),
        (Vec3::new(0.16, 0.7, 0.16), Vec3::new(-0.4, 1.2, 0.0), shirt),
        (Vec3::new(0.16, 0.7, 0.16), Vec3::new(0.4, 1.2, 0.0), shirt),
        (Vec3::new(0.36, 0.36, 0.36), Vec3::new(0.0, 1.78, 0.0), colors::SKIN),
    ];
    for (size, offset, color) in parts {
        scene.add_mesh(MeshInstance::cuboid(MeshRole::Figure, size, feet + offset, color));
    }
}

fn add_ground_grid(scene: &mut Scene) {
    let steps = (GROUND_EXTENT / GRID_SPACING) as i32;
    let y = 0.01;
    for i in -steps..=steps {
        let offset = i as f32 * GRID_SPACING;
        scene.add_line(
            Vec3::new(offset, y, -GROUND_EXTENT),
            Vec3::new(offset, y, GROUND_EXTENT),
            colors::GRID,
        );
        scene.add_line(
            Vec3::new(-GROUND_EXTENT, y, offset),
            Vec3::new(GROUND_EXTENT, y, offset),
            colors::GRID,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bricks_point_at_brick_meshes() {
        let layout = WallLayout::default();
        let (scene, bricks) = build_scene(&layout);

        assert_eq!(bricks.len(), (layout.rows * layout.columns) as usize);
        for brick in &bricks {
            let mesh = &scene.meshes[brick.mesh];
            assert_eq!(mesh.role, MeshRole::Brick);
            assert_eq!(mesh.position, brick.initial_position);
        }
    }

    #[test]
    fn test_scene_has_props() {
        let (scene, _) = build_scene(&WallLayout::default());

        let count = |role| scene.meshes.iter().filter(|m| m.role == role).count();
        assert_eq!(count(MeshRole::Ground), 1);
        assert_eq!(count(MeshRole::Detonator), 3);
        assert_eq!(count(MeshRole::Figure), 18); // 3 figures * 6 parts
        assert!(!scene.lines.is_empty());
        // Wire starts at the detonator
        assert!((scene.lines[0].start - scene.detonator).length() < 1.0);
    }

    #[test]
    fn test_set_transform_out_of_range_is_ignored() {
        let mut scene = Scene::new();
        scene.set_transform(5, Vec3::ONE, Vec3::ZERO);
        assert!(scene.meshes.is_empty());
    }

    #[test]
    fn test_model_matrix_scales_box() {
        let mesh = MeshInstance::cuboid(
            MeshRole::Brick,
            Vec3::new(2.0, 1.0, 0.5),
            Vec3::new(1.0, 2.0, 3.0),
            colors::BRICK,
        );
        let corner = mesh.model_matrix().transform_point3(Vec3::splat(0.5));
        assert!((corner - Vec3::new(2.0, 2.5, 3.25)).length() < 1e-5);
    }
}
