//! Rescaling and recentering of vertex positions.

use nalgebra::{Point3, Vector3};

use crate::mesh::{HalfEdgeMesh, MeshIndex, VertexId};

/// Diagonal length of the bounding box after [`rebox`].
pub const CANONICAL_DIAGONAL: f64 = 1.8 * std::f64::consts::SQRT_2;

/// Boxes with a diagonal shorter than this are only recentered.
const MIN_DIAGONAL: f64 = 1e-12;

/// Translation and uniform scale applied by [`rebox`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reboxing {
    /// Center of the original bounding box, moved to the origin.
    pub center: Point3<f64>,
    /// Uniform scale factor applied after centering.
    pub scale: f64,
}

impl Reboxing {
    /// Map an original position to its reboxed position.
    pub fn apply(&self, p: &Point3<f64>) -> Point3<f64> {
        Point3::from((p - self.center) * self.scale)
    }
}

/// Center the bounding box on the origin and scale it uniformly so that its
/// diagonal is `diagonal` long.
///
/// Normals are unaffected by a translation and a positive uniform scale, so
/// cached normals stay valid. Returns `None` for a mesh without vertices.
pub fn rebox<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, diagonal: f64) -> Option<Reboxing> {
    let (lo, hi) = mesh.bounding_box()?;
    let center = Point3::from((lo.coords + hi.coords) * 0.5);
    let span: Vector3<f64> = hi - lo;

    let scale = if span.norm() < MIN_DIAGONAL {
        1.0
    } else {
        diagonal / span.norm()
    };

    let reboxing = Reboxing { center, scale };
    for i in 0..mesh.num_vertices() {
        let v = VertexId::new(i);
        let p = reboxing.apply(mesh.position(v));
        mesh.set_position(v, p);
    }

    log::debug!(
        "reboxed {} vertices: center {:?}, scale {}",
        mesh.num_vertices(),
        center,
        scale
    );
    Some(reboxing)
}
