//! Geometry generation for boxes and line segments

use glam::{Mat3, Mat4, Vec3};

use super::vertex::Vertex;
use crate::sim::{Line, Scene};

/// Unit cube faces as (normal, u, v) with u × v = normal, so corners
/// emitted in (-u-v, +u-v, +u+v, -u+v) order wind counter-clockwise.
const CUBE_FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::Y, Vec3::Z),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::Z, Vec3::X),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::Y, Vec3::X),
];

/// Vertices per box (6 faces * 2 triangles * 3)
pub const BOX_VERTEX_COUNT: usize = 36;

/// Generate a triangle list for a unit cube transformed by `model`
pub fn cube(model: Mat4, color: [f32; 4]) -> Vec<Vertex> {
    let normal_matrix = Mat3::from_mat4(model).inverse().transpose();
    let mut vertices = Vec::with_capacity(BOX_VERTEX_COUNT);

    for (normal, u, v) in CUBE_FACES {
        let center = normal * 0.5;
        let corners = [
            center - u * 0.5 - v * 0.5,
            center + u * 0.5 - v * 0.5,
            center + u * 0.5 + v * 0.5,
            center - u * 0.5 + v * 0.5,
        ]
        .map(|c| model.transform_point3(c).to_array());
        let n = (normal_matrix * normal).normalize_or_zero().to_array();

        for i in [0, 1, 2, 0, 2, 3] {
            vertices.push(Vertex::new(corners[i], n, color));
        }
    }

    vertices
}

/// Two vertices of a line list
pub fn line(line: &Line) -> [Vertex; 2] {
    // Lines are unlit; an upward normal keeps them fully bright
    let up = [0.0, 1.0, 0.0];
    [
        Vertex::new(line.start.to_array(), up, line.color),
        Vertex::new(line.end.to_array(), up, line.color),
    ]
}

/// All mesh instances of a scene as one triangle list
pub fn scene_triangles(scene: &Scene) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(scene.meshes.len() * BOX_VERTEX_COUNT);
    for mesh in &scene.meshes {
        vertices.extend(cube(mesh.model_matrix(), mesh.color));
    }
    vertices
}

/// All guide lines of a scene as one line list
pub fn scene_lines(scene: &Scene) -> Vec<Vertex> {
    scene.lines.iter().flat_map(line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{WallLayout, build_scene};

    #[test]
    fn test_cube_winding_faces_outward() {
        let vertices = cube(Mat4::IDENTITY, [1.0; 4]);
        assert_eq!(vertices.len(), BOX_VERTEX_COUNT);

        for tri in vertices.chunks(3) {
            let a = Vec3::from_array(tri[0].position);
            let b = Vec3::from_array(tri[1].position);
            let c = Vec3::from_array(tri[2].position);
            let n = Vec3::from_array(tri[0].normal);
            assert!((b - a).cross(c - a).dot(n) > 0.0);
            // Face lies on the side its normal points to
            assert!(a.dot(n) > 0.49);
        }
    }

    #[test]
    fn test_cube_normals_unit_length_under_scale() {
        let model = Mat4::from_scale(Vec3::new(4.0, 0.5, 1.0));
        for v in cube(model, [1.0; 4]) {
            assert!((Vec3::from_array(v.normal).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_scene_geometry_counts() {
        let (scene, _) = build_scene(&WallLayout::with_size(2, 2));
        assert_eq!(
            scene_triangles(&scene).len(),
            scene.meshes.len() * BOX_VERTEX_COUNT
        );
        assert_eq!(scene_lines(&scene).len(), scene.lines.len() * 2);
    }
}
