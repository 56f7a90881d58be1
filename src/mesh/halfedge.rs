//! Winged half-edge mesh store.
//!
//! Every triangular face owns three directed half-edges linked into a cycle by
//! `next`. A half-edge records the vertex it leaves from; its target is the
//! origin of its `next`. Two faces that share an edge in opposite directions
//! have their half-edges linked as **twins**.
//!
//! # Boundary Handling
//!
//! No half-edges are created for the outside of an open surface. A half-edge
//! on the boundary simply has no twin, so [`HalfEdgeMesh::twin`] returns
//! `None` for it.

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use super::builder::BuildWarning;
use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};

/// A corner of the surface.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// An outgoing half-edge.
    ///
    /// While faces are being added this is the most recently created one.
    /// After [`HalfEdgeMesh::finalize_first_edges`] it is the start of the
    /// vertex's fan: for a vertex on an open boundary, the outgoing half-edge
    /// that has no twin.
    pub halfedge: HalfEdgeId<I>,

    /// Cached unit normal, written by the normal passes.
    pub normal: Option<Vector3<f64>>,

    /// Unit normal supplied by the input file, if any. Takes precedence over
    /// the estimated first-pass normal.
    pub file_normal: Option<Vector3<f64>>,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create a new vertex at the given position, not yet part of any face.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            halfedge: HalfEdgeId::none(),
            normal: None,
            file_normal: None,
        }
    }
}

/// One directed side of a triangular face.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge leaves from.
    pub origin: VertexId<I>,

    /// The oppositely directed half-edge of the adjacent face, if any.
    pub twin: HalfEdgeId<I>,

    /// The next half-edge around the same face (counter-clockwise).
    pub next: HalfEdgeId<I>,

    /// The face to the left of this half-edge.
    pub face: FaceId<I>,
}

impl<I: MeshIndex> Default for HalfEdge<I> {
    fn default() -> Self {
        Self {
            origin: VertexId::none(),
            twin: HalfEdgeId::none(),
            next: HalfEdgeId::none(),
            face: FaceId::none(),
        }
    }
}

/// A triangular face.
#[derive(Debug, Clone, Copy)]
pub struct Face<I: MeshIndex = u32> {
    /// The half-edge leaving corner 0. Corners 1 and 2 follow via `next`.
    pub halfedge: HalfEdgeId<I>,

    /// Cached unit normal, written by the face-normal pass.
    pub normal: Option<Vector3<f64>>,
}

impl<I: MeshIndex> Face<I> {
    /// Create a face whose corner-0 half-edge is `halfedge`.
    pub fn new(halfedge: HalfEdgeId<I>) -> Self {
        Self {
            halfedge,
            normal: None,
        }
    }
}

/// A triangle mesh in winged half-edge form.
///
/// Vertices, half-edges and faces are stored in arrays owned by the mesh and
/// referred to by typed handles. Elements are only ever appended, so a
/// handle stays valid for the lifetime of the mesh.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh<I: MeshIndex = u32> {
    pub(crate) vertices: Vec<Vertex<I>>,
    pub(crate) halfedges: Vec<HalfEdge<I>>,
    pub(crate) faces: Vec<Face<I>>,

    /// Directed `(origin, target)` vertex pair to the half-edge created for it.
    pub(crate) edge_map: HashMap<(VertexId<I>, VertexId<I>), HalfEdgeId<I>>,

    pub(crate) warnings: Vec<BuildWarning>,
}

impl<I: MeshIndex> Default for HalfEdgeMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Create a mesh with room for the given number of vertices and faces.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            halfedges: Vec::with_capacity(num_faces * 3),
            faces: Vec::with_capacity(num_faces),
            edge_map: HashMap::with_capacity(num_faces * 3),
            warnings: Vec::new(),
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of half-edges. Always three per face.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get a vertex by ID.
    ///
    /// # Panics
    /// Panics if `id` is not a vertex of this mesh.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// Get a mutable vertex by ID.
    #[inline]
    pub fn vertex_mut(&mut self, id: VertexId<I>) -> &mut Vertex<I> {
        &mut self.vertices[id.index()]
    }

    /// Get a vertex by ID, or `None` if out of range.
    pub fn try_vertex(&self, id: VertexId<I>) -> Option<&Vertex<I>> {
        self.vertices.get(id.index())
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        &self.halfedges[id.index()]
    }

    #[inline]
    pub(crate) fn halfedge_mut(&mut self, id: HalfEdgeId<I>) -> &mut HalfEdge<I> {
        &mut self.halfedges[id.index()]
    }

    /// Get a face by ID.
    ///
    /// # Panics
    /// Panics if `id` is not a face of this mesh.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    #[inline]
    pub(crate) fn face_mut(&mut self, id: FaceId<I>) -> &mut Face<I> {
        &mut self.faces[id.index()]
    }

    /// Get a face by ID, or `None` if out of range.
    pub fn try_face(&self, id: FaceId<I>) -> Option<&Face<I>> {
        self.faces.get(id.index())
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Set the position of a vertex.
    ///
    /// Cached normals are not touched; rerun the normal passes afterwards.
    #[inline]
    pub fn set_position(&mut self, v: VertexId<I>, pos: Point3<f64>) {
        self.vertex_mut(v).position = pos;
    }

    /// Cached normal of a vertex.
    #[inline]
    pub fn vertex_normal(&self, v: VertexId<I>) -> Option<Vector3<f64>> {
        self.vertex(v).normal
    }

    /// Cached normal of a face.
    #[inline]
    pub fn face_normal(&self, f: FaceId<I>) -> Option<Vector3<f64>> {
        self.face(f).normal
    }

    /// Warnings recorded while faces were added.
    pub fn warnings(&self) -> &[BuildWarning] {
        &self.warnings
    }

    // ==================== Topology Queries ====================

    /// Get the twin half-edge, or `None` on the boundary.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId<I>) -> Option<HalfEdgeId<I>> {
        self.halfedge(he).twin.get()
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.next(self.next(he))
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).origin
    }

    /// Get the target vertex of a half-edge.
    #[inline]
    pub fn target(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.origin(self.next(he))
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedge(he).face
    }

    /// Look up the half-edge running from `from` to `to`.
    pub fn find_halfedge(&self, from: VertexId<I>, to: VertexId<I>) -> Option<HalfEdgeId<I>> {
        self.edge_map.get(&(from, to)).copied()
    }

    /// Check if a half-edge is on the boundary.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        self.twin(he).is_none()
    }

    /// Check if a vertex is on the boundary (or belongs to no face).
    pub fn is_boundary_vertex(&self, v: VertexId<I>) -> bool {
        let mut fan = self.fan(v).peekable();
        if fan.peek().is_none() {
            return true;
        }
        fan.any(|he| {
            self.is_boundary_halfedge(he) || self.is_boundary_halfedge(self.prev(he))
        })
    }

    /// The half-edge leaving corner `i` (0, 1 or 2) of a face.
    pub fn face_halfedge(&self, f: FaceId<I>, i: usize) -> HalfEdgeId<I> {
        assert!(i < 3, "triangle corner {} out of range", i);
        let mut he = self.face(f).halfedge;
        for _ in 0..i {
            he = self.next(he);
        }
        he
    }

    /// The face on the other side of a half-edge, `None` on the boundary.
    pub fn face_across(&self, he: HalfEdgeId<I>) -> Option<FaceId<I>> {
        self.twin(he).map(|t| self.face_of(t))
    }

    /// The face sharing the edge that leaves corner `i` of `f`.
    pub fn adjacent_face(&self, f: FaceId<I>, i: usize) -> Option<FaceId<I>> {
        self.face_across(self.face_halfedge(f, i))
    }

    /// The three half-edges of a face, in winding order.
    pub fn face_halfedges(&self, f: FaceId<I>) -> [HalfEdgeId<I>; 3] {
        let he0 = self.face(f).halfedge;
        let he1 = self.next(he0);
        [he0, he1, self.next(he1)]
    }

    /// Get the three vertices of a face.
    pub fn face_triangle(&self, f: FaceId<I>) -> [VertexId<I>; 3] {
        self.face_halfedges(f).map(|he| self.origin(he))
    }

    /// Get the positions of the three vertices of a face.
    pub fn face_positions(&self, f: FaceId<I>) -> [Point3<f64>; 3] {
        self.face_triangle(f).map(|v| *self.position(v))
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all vertices with their IDs.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId<I>, &Vertex<I>)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::new(i), v))
    }

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all half-edges with their IDs.
    pub fn halfedges(&self) -> impl Iterator<Item = (HalfEdgeId<I>, &HalfEdge<I>)> + '_ {
        self.halfedges
            .iter()
            .enumerate()
            .map(|(i, he)| (HalfEdgeId::new(i), he))
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over all faces with their IDs.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId<I>, &Face<I>)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .map(|(i, f)| (FaceId::new(i), f))
    }

    /// Iterate over the vertices at the far end of each fan half-edge.
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.fan(v).map(|he| self.target(he))
    }

    /// Iterate over the faces around a vertex, one per fan half-edge.
    pub fn vertex_faces(&self, v: VertexId<I>) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.fan(v).map(|he| self.face_of(he))
    }

    /// Number of half-edges in a vertex's fan.
    pub fn valence(&self, v: VertexId<I>) -> usize {
        self.fan(v).count()
    }

    // ==================== Geometry ====================

    /// Vector from the origin to the target of a half-edge.
    pub fn edge_vector(&self, he: HalfEdgeId<I>) -> Vector3<f64> {
        self.position(self.target(he)) - self.position(self.origin(he))
    }

    /// Compute the area of a face.
    pub fn face_area(&self, f: FaceId<I>) -> f64 {
        let [p0, p1, p2] = self.face_positions(f);
        0.5 * (p1 - p0).cross(&(p2 - p0)).norm()
    }

    /// Compute the centroid of a face.
    pub fn face_centroid(&self, f: FaceId<I>) -> Point3<f64> {
        let [p0, p1, p2] = self.face_positions(f);
        Point3::from((p0.coords + p1.coords + p2.coords) / 3.0)
    }

    /// Compute the axis-aligned bounding box of all vertices.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), v| {
            (lo.inf(&v.position), hi.sup(&v.position))
        }))
    }

    /// Compute the total surface area of the mesh.
    pub fn surface_area(&self) -> f64 {
        self.face_ids().map(|f| self.face_area(f)).sum()
    }

    // ==================== Validation ====================

    /// Check that all connectivity invariants hold.
    ///
    /// - every `next` cycle has length three and stays within one face
    /// - twins are symmetric and join the same two vertices in reverse
    /// - every vertex's recorded half-edge leaves from that vertex
    pub fn is_valid(&self) -> bool {
        for (vid, v) in self.vertices() {
            if let Some(he) = v.halfedge.get() {
                if self.origin(he) != vid {
                    return false;
                }
            }
        }

        for (heid, he) in self.halfedges() {
            let n1 = he.next;
            let n2 = self.next(n1);
            if self.next(n2) != heid || n1 == heid {
                return false;
            }
            if self.face_of(n1) != he.face || self.face_of(n2) != he.face {
                return false;
            }

            if let Some(twin) = he.twin.get() {
                if self.twin(twin) != Some(heid) {
                    return false;
                }
                if self.origin(twin) != self.target(heid) || self.target(twin) != he.origin {
                    return false;
                }
            }
        }

        self.faces.iter().all(|f| f.halfedge.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_creation() {
        let v = Vertex::<u32>::new(Point3::new(1.0, 2.0, 3.0));
        assert_eq!(v.position, Point3::new(1.0, 2.0, 3.0));
        assert!(!v.halfedge.is_some());
        assert!(v.normal.is_none());
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = HalfEdgeMesh::<u32>::new();
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_halfedges(), 0);
        assert_eq!(mesh.num_faces(), 0);
        assert!(mesh.bounding_box().is_none());
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_add_vertex_ids_are_dense() {
        let mut mesh = HalfEdgeMesh::<u32>::new();
        let v0 = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let v1 = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));

        assert_eq!(mesh.num_vertices(), 2);
        assert_eq!(v0.index(), 0);
        assert_eq!(v1.index(), 1);
        assert!(mesh.is_boundary_vertex(v0));
    }

    #[test]
    fn test_bounding_box() {
        let mut mesh = HalfEdgeMesh::<u32>::new();
        mesh.add_vertex(Point3::new(-1.0, 2.0, 0.5));
        mesh.add_vertex(Point3::new(3.0, -2.0, 0.0));

        let (lo, hi) = mesh.bounding_box().unwrap();
        assert_eq!(lo, Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(hi, Point3::new(3.0, 2.0, 0.5));
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_lookup_panics() {
        let mesh = HalfEdgeMesh::<u32>::new();
        let _ = mesh.vertex(VertexId::new(0));
    }

    #[test]
    fn test_adjacent_face_across_edges() {
        let vertices = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let mesh: HalfEdgeMesh =
            crate::mesh::build_from_triangles(&vertices, &[[0, 1, 2], [1, 3, 2]]).unwrap();
        let (f0, f1) = (FaceId::new(0), FaceId::new(1));

        // Corner 1 of face 0 starts the shared 1-2 diagonal
        assert_eq!(mesh.adjacent_face(f0, 1), Some(f1));
        assert_eq!(mesh.adjacent_face(f1, 2), Some(f0));

        assert_eq!(mesh.adjacent_face(f0, 0), None);
        assert_eq!(mesh.adjacent_face(f0, 2), None);
        assert_eq!(mesh.adjacent_face(f1, 0), None);

        let boundary = mesh.find_halfedge(VertexId::new(1), VertexId::new(3)).unwrap();
        assert_eq!(mesh.face_across(boundary), None);
        let diagonal = mesh.find_halfedge(VertexId::new(2), VertexId::new(1)).unwrap();
        assert_eq!(mesh.face_across(diagonal), Some(f0));
    }

    #[test]
    fn test_try_lookup_out_of_range() {
        let mesh = HalfEdgeMesh::<u32>::new();
        assert!(mesh.try_vertex(VertexId::new(0)).is_none());
        assert!(mesh.try_face(FaceId::new(3)).is_none());
    }
}
