//! Mesh construction.
//!
//! Faces are appended one triangle at a time. Twins are resolved on the fly
//! through a map keyed by directed vertex pairs, so input faces may come in
//! any order. Once everything is appended,
//! [`HalfEdgeMesh::finalize_first_edges`] picks the canonical start of every
//! vertex fan.

use std::fmt;

use nalgebra::Point3;

use super::halfedge::{Face, HalfEdge, HalfEdgeMesh};
use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// A recoverable problem found while adding faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildWarning {
    /// Two faces both contain the directed edge `from -> to`, so at least
    /// one of them is wound the wrong way. The later half-edge replaces the
    /// earlier one in the edge map and the earlier one may lose its twin.
    InconsistentWinding {
        /// The face whose half-edge repeated an existing key.
        face: usize,
        /// Origin vertex of the repeated edge.
        from: usize,
        /// Target vertex of the repeated edge.
        to: usize,
    },

    /// A face uses the same vertex at two corners.
    DegenerateFace {
        /// The face index.
        face: usize,
    },
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            BuildWarning::InconsistentWinding { face, from, to } => write!(
                f,
                "bad orientation for face {}: edge {} -> {} already exists",
                face, from, to
            ),
            BuildWarning::DegenerateFace { face } => {
                write!(f, "face {} repeats a vertex", face)
            }
        }
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Add a new vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(super::halfedge::Vertex::new(position));
        id
    }

    /// Add the triangle `v1, v2, v3` (counter-clockwise) and return its ID.
    ///
    /// Creates the half-edges `v1 -> v2`, `v2 -> v3` and `v3 -> v1` and links
    /// each to the reverse half-edge if some earlier face created it. A
    /// repeated directed edge is recorded as
    /// [`BuildWarning::InconsistentWinding`] and does not stop construction.
    ///
    /// # Panics
    /// Panics if any vertex ID is not part of this mesh.
    pub fn add_face(&mut self, v1: VertexId<I>, v2: VertexId<I>, v3: VertexId<I>) -> FaceId<I> {
        let corners = [v1, v2, v3];
        for v in corners {
            assert!(
                v.index() < self.vertices.len(),
                "face corner {:?} is not a vertex of this mesh",
                v
            );
        }

        let face = FaceId::new(self.faces.len());
        let base = self.halfedges.len();
        let ids: [HalfEdgeId<I>; 3] = [
            HalfEdgeId::new(base),
            HalfEdgeId::new(base + 1),
            HalfEdgeId::new(base + 2),
        ];

        for i in 0..3 {
            self.halfedges.push(HalfEdge {
                origin: corners[i],
                twin: HalfEdgeId::none(),
                next: ids[(i + 1) % 3],
                face,
            });
        }
        self.faces.push(Face::new(ids[0]));

        if v1 == v2 || v2 == v3 || v3 == v1 {
            self.warn(BuildWarning::DegenerateFace {
                face: face.index(),
            });
        }

        for i in 0..3 {
            let from = corners[i];
            let to = corners[(i + 1) % 3];
            self.vertex_mut(from).halfedge = ids[i];
            if from != to {
                self.link_twin(ids[i], from, to, face);
            }
        }

        face
    }

    /// Register `he` under `(from, to)` and pair it with `to -> from`.
    fn link_twin(&mut self, he: HalfEdgeId<I>, from: VertexId<I>, to: VertexId<I>, face: FaceId<I>) {
        if self.edge_map.insert((from, to), he).is_some() {
            self.warn(BuildWarning::InconsistentWinding {
                face: face.index(),
                from: from.index(),
                to: to.index(),
            });
        }

        let Some(&reverse) = self.edge_map.get(&(to, from)) else {
            return;
        };

        // Keep twins symmetric: whoever `reverse` was paired with loses it.
        if let Some(stale) = self.twin(reverse) {
            self.halfedge_mut(stale).twin = HalfEdgeId::none();
        }
        self.halfedge_mut(reverse).twin = he;
        self.halfedge_mut(he).twin = reverse;
    }

    /// Check that `vertices` more vertices and `faces` more triangles still
    /// have handles.
    ///
    /// # Errors
    /// [`MeshError::CapacityExceeded`] naming the first element kind that
    /// would run out. Nothing is modified either way.
    pub fn check_capacity(&self, vertices: usize, faces: usize) -> Result<()> {
        let max = I::NONE.to_usize();
        let halfedges = faces
            .checked_mul(3)
            .and_then(|n| n.checked_add(self.halfedges.len()));
        let needed = [
            ("vertex", self.vertices.len().checked_add(vertices)),
            ("half-edge", halfedges),
        ];
        for (kind, count) in needed {
            match count {
                Some(count) if count <= max => {}
                count => {
                    return Err(MeshError::CapacityExceeded {
                        kind,
                        count: count.unwrap_or(usize::MAX),
                        max,
                    })
                }
            }
        }
        Ok(())
    }

    fn warn(&mut self, warning: BuildWarning) {
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Point every vertex at the first half-edge of its fan.
    ///
    /// Walks backwards around each vertex (`next(twin(e))`) from its recorded
    /// half-edge until reaching a half-edge with no twin, or until coming
    /// back to the start on a closed fan. Must be called after the last
    /// [`add_face`](Self::add_face) and before relying on fan order.
    pub fn finalize_first_edges(&mut self) {
        for i in 0..self.vertices.len() {
            let Some(start) = self.vertices[i].halfedge.get() else {
                continue;
            };

            let mut he = start;
            while let Some(twin) = self.twin(he) {
                he = self.next(twin);
                if he == start {
                    break;
                }
            }
            self.vertices[i].halfedge = he;
        }
    }
}

/// Build a half-edge mesh from vertices and triangle faces.
///
/// Runs [`HalfEdgeMesh::add_face`] for every triangle and then
/// [`HalfEdgeMesh::finalize_first_edges`].
///
/// # Example
/// ```
/// use wingmesh::mesh::{build_from_triangles, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
/// assert_eq!(mesh.num_halfedges(), 3);
/// ```
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<HalfEdgeMesh<I>> {
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    for (fi, face) in faces.iter().enumerate() {
        if let Some(&vi) = face.iter().find(|&&vi| vi >= vertices.len()) {
            return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
        }
    }

    let mut mesh = HalfEdgeMesh::with_capacity(vertices.len(), faces.len());
    for &p in vertices {
        mesh.add_vertex(p);
    }
    for &[a, b, c] in faces {
        mesh.add_face(VertexId::new(a), VertexId::new(b), VertexId::new(c));
    }
    mesh.finalize_first_edges();

    Ok(mesh)
}

/// Convert a half-edge mesh back to a face-vertex representation.
pub fn to_face_vertex<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();
    let faces = mesh
        .face_ids()
        .map(|f| mesh.face_triangle(f).map(|v| v.index()))
        .collect();
    (vertices, faces)
}
