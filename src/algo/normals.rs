//! Face and vertex normal estimation.
//!
//! Normals are computed in explicit passes, each reading only what the
//! previous pass wrote:
//!
//! 1. [`compute_face_normals`]: one unit normal per face from its first two
//!    edge directions.
//! 2. [`compute_vertex_normals`]: a normal supplied by the input file, or
//!    else the normalized sum of the face normals around the vertex fan.
//! 3. [`smooth_vertex_normals`]: one blending pass with the neighbors,
//!    `n' = sum over fan edges of (n + n_neighbor)`, normalized.
//!
//! Nothing is recomputed behind the caller's back. After moving vertices,
//! run [`estimate_normals`] again.
//!
//! # Example
//!
//! ```
//! use wingmesh::prelude::*;
//! use wingmesh::algo::normals::{estimate_normals, NormalOptions};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mut mesh: HalfEdgeMesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
//! estimate_normals(&mut mesh, &NormalOptions::default());
//!
//! let n = mesh.vertex_normal(VertexId::new(0)).unwrap();
//! assert!((n.z - 1.0).abs() < 1e-12);
//! ```

use nalgebra::Vector3;
use rayon::prelude::*;

use crate::mesh::{FaceId, HalfEdgeMesh, MeshIndex, VertexId};

/// Sums shorter than this are treated as having no direction.
pub const NORMAL_EPSILON: f64 = 1e-12;

/// Options for [`estimate_normals`].
#[derive(Debug, Clone)]
pub struct NormalOptions {
    /// Whether to run the neighbor smoothing pass.
    pub smooth: bool,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for NormalOptions {
    fn default() -> Self {
        Self {
            smooth: true,
            parallel: true,
        }
    }
}

impl NormalOptions {
    /// Set whether to run the smoothing pass.
    pub fn with_smoothing(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// Run every normal pass over the whole mesh.
pub fn estimate_normals<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, options: &NormalOptions) {
    compute_face_normals(mesh);
    compute_vertex_normals(mesh, options.parallel);
    if options.smooth {
        smooth_vertex_normals(mesh, options.parallel);
    }

    let missing = mesh.vertices().filter(|(_, v)| v.normal.is_none()).count();
    log::debug!(
        "estimated normals for {} vertices ({} without a normal)",
        mesh.num_vertices(),
        missing
    );
}

/// Unit normal of a face from its first two edge directions.
///
/// `None` when an edge has zero length or the edges are parallel.
pub fn face_normal<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, f: FaceId<I>) -> Option<Vector3<f64>> {
    let [e0, e1, _] = mesh.face_halfedges(f);
    let d0 = mesh.edge_vector(e0).try_normalize(NORMAL_EPSILON)?;
    let d1 = mesh.edge_vector(e1).try_normalize(NORMAL_EPSILON)?;
    d0.cross(&d1).try_normalize(NORMAL_EPSILON)
}

/// Cache the unit normal of every face.
pub fn compute_face_normals<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) {
    let normals: Vec<_> = mesh.face_ids().map(|f| face_normal(mesh, f)).collect();
    for (f, n) in normals.into_iter().enumerate() {
        mesh.face_mut(FaceId::new(f)).normal = n;
    }
}

/// First-pass normal of one vertex, from the cached face normals.
fn fan_normal<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, v: VertexId<I>) -> Option<Vector3<f64>> {
    if let Some(n) = mesh.vertex(v).file_normal {
        return Some(n);
    }
    let sum: Vector3<f64> = mesh
        .vertex_faces(v)
        .filter_map(|f| mesh.face_normal(f))
        .sum();
    sum.try_normalize(NORMAL_EPSILON)
}

/// Cache the first-pass normal of every vertex.
///
/// Expects [`compute_face_normals`] to have run.
pub fn compute_vertex_normals<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, parallel: bool) {
    let normals = per_vertex(mesh, parallel, fan_normal);
    assign_vertex_normals(mesh, normals);
}

/// Smoothed normal of one vertex, reading only the current cached normals.
fn blended_normal<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, v: VertexId<I>) -> Option<Vector3<f64>> {
    let own = mesh.vertex_normal(v);
    let center = own.unwrap_or_else(Vector3::zeros);
    let sum: Vector3<f64> = mesh
        .vertex_neighbors(v)
        .map(|w| center + mesh.vertex_normal(w).unwrap_or_else(Vector3::zeros))
        .sum();
    sum.try_normalize(NORMAL_EPSILON).or(own)
}

/// Compute the smoothed normal of every vertex without writing it back.
///
/// Every result depends only on the normals cached when this is called, so
/// the output does not depend on vertex order.
pub fn smoothed_normals<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    parallel: bool,
) -> Vec<Option<Vector3<f64>>> {
    per_vertex(mesh, parallel, blended_normal)
}

/// Replace every vertex normal by its smoothed version.
///
/// All new normals are computed first and assigned afterwards.
pub fn smooth_vertex_normals<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, parallel: bool) {
    let normals = smoothed_normals(mesh, parallel);
    assign_vertex_normals(mesh, normals);
}

fn per_vertex<I, F>(mesh: &HalfEdgeMesh<I>, parallel: bool, f: F) -> Vec<Option<Vector3<f64>>>
where
    I: MeshIndex,
    F: Fn(&HalfEdgeMesh<I>, VertexId<I>) -> Option<Vector3<f64>> + Sync,
{
    let n = mesh.num_vertices();
    if parallel {
        (0..n)
            .into_par_iter()
            .map(|i| f(mesh, VertexId::new(i)))
            .collect()
    } else {
        (0..n).map(|i| f(mesh, VertexId::new(i))).collect()
    }
}

fn assign_vertex_normals<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, normals: Vec<Option<Vector3<f64>>>) {
    for (i, n) in normals.into_iter().enumerate() {
        mesh.vertex_mut(VertexId::new(i)).normal = n;
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Point3;

    use super::*;
    use crate::mesh::build_from_triangles;

    fn create_tetrahedron() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    /// A bumpy open grid so that smoothing actually changes something.
    fn create_bumpy_grid(n: usize) -> HalfEdgeMesh {
        let mut vertices = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                let z = if (i + j) % 2 == 0 { 0.3 } else { 0.0 };
                vertices.push(Point3::new(i as f64, j as f64, z));
            }
        }
        let mut faces = Vec::new();
        for j in 0..n {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + n + 1;
                let v11 = v01 + 1;
                faces.push([v00, v10, v11]);
                faces.push([v00, v11, v01]);
            }
        }
        build_from_triangles(&vertices, &faces).unwrap()
    }

    fn assert_unit(n: &Vector3<f64>) {
        assert!((n.norm() - 1.0).abs() < 1e-10, "not unit: {:?}", n);
    }

    #[test]
    fn test_face_normal_follows_winding() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mut ccw: HalfEdgeMesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
        let mut cw: HalfEdgeMesh = build_from_triangles(&vertices, &[[0, 2, 1]]).unwrap();
        compute_face_normals(&mut ccw);
        compute_face_normals(&mut cw);

        let up = ccw.face_normal(FaceId::new(0)).unwrap();
        let down = cw.face_normal(FaceId::new(0)).unwrap();
        assert!((up - Vector3::z()).norm() < 1e-12);
        assert!((down + Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn test_degenerate_face_has_no_normal() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        let mut mesh: HalfEdgeMesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
        estimate_normals(&mut mesh, &NormalOptions::default());

        assert!(mesh.face_normal(FaceId::new(0)).is_none());
        for v in mesh.vertex_ids() {
            assert!(mesh.vertex_normal(v).is_none());
        }
    }

    #[test]
    fn test_tetrahedron_normals_point_outward() {
        let mut mesh = create_tetrahedron();
        estimate_normals(&mut mesh, &NormalOptions::default());

        let centroid = mesh
            .vertex_ids()
            .map(|v| mesh.position(v).coords)
            .sum::<Vector3<f64>>()
            / mesh.num_vertices() as f64;

        for v in mesh.vertex_ids() {
            let n = mesh.vertex_normal(v).unwrap();
            assert_unit(&n);
            let outward = mesh.position(v).coords - centroid;
            assert!(n.dot(&outward) > 0.0, "normal of {:?} points inward", v);
        }
    }

    #[test]
    fn test_file_normal_takes_precedence() {
        let mut mesh = create_tetrahedron();
        let v = VertexId::new(3);
        mesh.vertex_mut(v).file_normal = Some(Vector3::x());

        compute_face_normals(&mut mesh);
        compute_vertex_normals(&mut mesh, false);
        assert_eq!(mesh.vertex_normal(v), Some(Vector3::x()));
    }

    #[test]
    fn test_flat_mesh_stays_flat_after_smoothing() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let mut mesh: HalfEdgeMesh =
            build_from_triangles(&vertices, &[[0, 1, 2], [1, 3, 2]]).unwrap();
        estimate_normals(&mut mesh, &NormalOptions::default());

        for v in mesh.vertex_ids() {
            let n = mesh.vertex_normal(v).unwrap();
            assert!((n - Vector3::z()).norm() < 1e-12);
        }
    }

    #[test]
    fn test_smoothing_matches_neighbor_blend() {
        let mut mesh = create_bumpy_grid(4);
        compute_face_normals(&mut mesh);
        compute_vertex_normals(&mut mesh, false);

        let before: Vec<_> = mesh.vertex_ids().map(|v| mesh.vertex_normal(v).unwrap()).collect();
        smooth_vertex_normals(&mut mesh, false);

        for v in mesh.vertex_ids() {
            let degree = mesh.valence(v) as f64;
            let expected = (before[v.index()] * degree
                + mesh
                    .vertex_neighbors(v)
                    .map(|w| before[w.index()])
                    .sum::<Vector3<f64>>())
            .normalize();
            let got = mesh.vertex_normal(v).unwrap();
            assert!((got - expected).norm() < 1e-12, "vertex {:?}", v);
        }
    }

    #[test]
    fn test_smoothing_is_repeatable_from_same_inputs() {
        let mut mesh = create_bumpy_grid(5);
        compute_face_normals(&mut mesh);
        compute_vertex_normals(&mut mesh, false);

        let first = smoothed_normals(&mesh, false);
        let second = smoothed_normals(&mesh, false);
        assert_eq!(first, second);

        let mut a = mesh.clone();
        let mut b = mesh;
        smooth_vertex_normals(&mut a, false);
        smooth_vertex_normals(&mut b, false);
        for v in a.vertex_ids() {
            assert_eq!(a.vertex_normal(v), b.vertex_normal(v));
            assert_eq!(a.vertex_normal(v), first[v.index()]);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut seq = create_bumpy_grid(6);
        let mut par = seq.clone();
        estimate_normals(&mut seq, &NormalOptions::default().sequential());
        estimate_normals(&mut par, &NormalOptions::default());

        for v in seq.vertex_ids() {
            let a = seq.vertex_normal(v).unwrap();
            let b = par.vertex_normal(v).unwrap();
            assert!((a - b).norm() < 1e-12);
        }
    }

    #[test]
    fn test_isolated_vertex_keeps_no_normal() {
        let mut mesh = create_tetrahedron();
        let lonely = mesh.add_vertex(Point3::new(3.0, 3.0, 3.0));
        estimate_normals(&mut mesh, &NormalOptions::default());
        assert!(mesh.vertex_normal(lonely).is_none());
    }
}
