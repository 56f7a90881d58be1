//! Traversal of the half-edges around a vertex.

use super::halfedge::HalfEdgeMesh;
use super::index::{HalfEdgeId, MeshIndex, VertexId};

/// Iterator over the outgoing half-edges of a vertex, in rotational order.
///
/// Starts at the vertex's first edge and steps to `twin(prev(e))`, the
/// outgoing half-edge of the neighbouring face. It stops after the half-edge
/// whose incoming partner has no twin (open fan) or just before coming back
/// to the first edge (closed fan). Each step is an injective map on
/// half-edges, so the walk always ends.
///
/// The iterator only borrows the mesh; any number of fans can be walked at
/// once.
#[derive(Debug, Clone)]
pub struct Fan<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    first: HalfEdgeId<I>,
    current: Option<HalfEdgeId<I>>,
}

impl<'a, I: MeshIndex> Fan<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, v: VertexId<I>) -> Self {
        let first = mesh.vertex(v).halfedge;
        Self {
            mesh,
            first,
            current: first.get(),
        }
    }
}

impl<I: MeshIndex> Iterator for Fan<'_, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        let he = self.current?;
        self.current = self
            .mesh
            .twin(self.mesh.prev(he))
            .filter(|&twin| twin != self.first);
        Some(he)
    }
}

impl<I: MeshIndex> std::iter::FusedIterator for Fan<'_, I> {}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Walk the fan of outgoing half-edges around `v`.
    ///
    /// Empty for a vertex that belongs to no face. Call
    /// [`finalize_first_edges`](Self::finalize_first_edges) first, or open
    /// fans may be cut short.
    pub fn fan(&self, v: VertexId<I>) -> Fan<'_, I> {
        Fan::new(self, v)
    }
}
