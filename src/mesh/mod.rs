//! Core mesh data structures.
//!
//! The primary type is [`HalfEdgeMesh`], a triangle mesh in winged half-edge
//! form. It owns every vertex, half-edge and face; connectivity is stored as
//! typed handles into those arrays:
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a face
//!
//! # Construction
//!
//! ```
//! use wingmesh::mesh::HalfEdgeMesh;
//! use nalgebra::Point3;
//!
//! let mut mesh: HalfEdgeMesh = HalfEdgeMesh::new();
//! let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
//! let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
//! let c = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
//! mesh.add_face(a, b, c);
//! mesh.finalize_first_edges();
//!
//! assert_eq!(mesh.fan(a).count(), 1);
//! ```

mod builder;
mod fan;
mod flatten;
mod halfedge;
mod index;

pub use builder::{build_from_triangles, to_face_vertex, BuildWarning};
pub use fan::Fan;
pub use flatten::{flatten, flatten_with, FlatArrays, DEFAULT_COLOR};
pub use halfedge::{Face, HalfEdge, HalfEdgeMesh, Vertex};
pub use index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
