//! Flat per-corner attribute arrays for renderers.
//!
//! Every face contributes three corners, and every corner carries its own
//! position, normal and color. The layout is a plain triangle list, with no
//! index buffer.

use super::halfedge::HalfEdgeMesh;
use super::index::{FaceId, MeshIndex, VertexId};

/// Color used for every corner when the caller does not supply one.
pub const DEFAULT_COLOR: [f32; 3] = [0.5, 0.45, 0.57];

/// Per-corner attribute arrays, three `f32` per corner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatArrays {
    /// Corner positions.
    pub positions: Vec<f32>,
    /// Corner normals (zero where a vertex has no normal).
    pub normals: Vec<f32>,
    /// Corner colors.
    pub colors: Vec<f32>,
}

impl FlatArrays {
    /// Number of corners (three per face).
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Positions as raw bytes, ready for a vertex buffer upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Normals as raw bytes.
    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Colors as raw bytes.
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }
}

/// Flatten a mesh using [`DEFAULT_COLOR`] for every corner.
pub fn flatten<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> FlatArrays {
    flatten_with(mesh, |_, _, _| DEFAULT_COLOR)
}

/// Flatten a mesh, asking `color` for the color of each corner.
///
/// The hook gets the face, the corner number (0, 1 or 2) and the corner's
/// vertex, so one face can be colored apart from its neighbours. Corners are
/// emitted in face order, then corner order.
pub fn flatten_with<I, F>(mesh: &HalfEdgeMesh<I>, mut color: F) -> FlatArrays
where
    I: MeshIndex,
    F: FnMut(FaceId<I>, usize, VertexId<I>) -> [f32; 3],
{
    let corners = mesh.num_faces() * 3;
    let mut out = FlatArrays {
        positions: Vec::with_capacity(corners * 3),
        normals: Vec::with_capacity(corners * 3),
        colors: Vec::with_capacity(corners * 3),
    };

    for f in mesh.face_ids() {
        for (corner, v) in mesh.face_triangle(f).into_iter().enumerate() {
            let vertex = mesh.vertex(v);
            let p = vertex.position;
            out.positions.extend([p.x as f32, p.y as f32, p.z as f32]);

            let n = vertex.normal.unwrap_or_else(nalgebra::Vector3::zeros);
            out.normals.extend([n.x as f32, n.y as f32, n.z as f32]);

            out.colors.extend(color(f, corner, v));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use nalgebra::{Point3, Vector3};

    use super::*;
    use crate::mesh::build_from_triangles;

    fn square() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        build_from_triangles(&vertices, &[[0, 1, 2], [1, 3, 2]]).unwrap()
    }

    #[test]
    fn test_layout_is_face_then_corner() {
        let mut mesh = square();
        mesh.vertex_mut(VertexId::new(3)).normal = Some(Vector3::z());

        let flat = flatten(&mesh);
        assert_eq!(flat.vertex_count(), 6);
        assert_eq!(flat.positions.len(), 18);

        // Second face, corner 1 is vertex 3
        assert_eq!(&flat.positions[12..15], &[1.0, 1.0, 0.0]);
        assert_eq!(&flat.normals[12..15], &[0.0, 0.0, 1.0]);
        // Vertex 0 has no normal yet
        assert_eq!(&flat.normals[0..3], &[0.0, 0.0, 0.0]);
        assert_eq!(&flat.colors[0..3], &DEFAULT_COLOR);
    }

    #[test]
    fn test_color_hook() {
        let mesh = square();
        let flat = flatten_with(&mesh, |_, _, v| [v.index() as f32, 0.0, 1.0]);
        let reds: Vec<f32> = flat.colors.chunks(3).map(|c| c[0]).collect();
        assert_eq!(reds, vec![0.0, 1.0, 2.0, 1.0, 3.0, 2.0]);

        let flat = flatten_with(&mesh, |_, corner, _| [0.0, corner as f32, 0.0]);
        let greens: Vec<f32> = flat.colors.chunks(3).map(|c| c[1]).collect();
        assert_eq!(greens, vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_highlight_one_face() {
        const RED: [f32; 3] = [1.0, 0.0, 0.0];
        let mesh = square();
        let selected = FaceId::new(0);
        let flat = flatten_with(&mesh, |f, _, _| if f == selected { RED } else { DEFAULT_COLOR });

        // Vertices 1 and 2 are shared, but only face 0's corners change
        assert_eq!(&flat.colors[..9], &[RED, RED, RED].concat()[..]);
        for c in flat.colors[9..].chunks(3) {
            assert_eq!(c, &DEFAULT_COLOR);
        }
    }

    #[test]
    fn test_byte_views() {
        let flat = flatten(&square());
        assert_eq!(flat.position_bytes().len(), 18 * 4);
        assert_eq!(flat.normal_bytes().len(), flat.color_bytes().len());
    }
}
