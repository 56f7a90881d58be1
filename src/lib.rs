//! # Wingmesh
//!
//! Triangle meshes in winged half-edge form, loaded from polygon-list files
//! and prepared for display and picking.
//!
//! Wingmesh reads the `v`/`vn`/`f` subset of Wavefront OBJ, links the
//! triangles into a half-edge mesh, estimates and smooths vertex normals,
//! recenters and rescales the model into a canonical box, and answers ray
//! picking queries against it.
//!
//! ## Features
//!
//! - **Half-edge data structure**: arena storage with type-safe handles
//! - **Flexible indexing**: 16-bit, 32-bit, and 64-bit indices
//! - **Open surfaces**: boundary edges simply have no twin
//! - **Normals**: file normals, fan-summed face normals, one smoothing pass
//! - **Picking**: ray/triangle tests over every face
//!
//! ## Quick Start
//!
//! ```no_run
//! use wingmesh::prelude::*;
//! use nalgebra::{Point3, Vector3};
//!
//! let mut scene: Scene = Scene::new();
//! scene.load("model.obj").unwrap();
//!
//! let mesh = scene.mesh();
//! println!("Vertices: {}", mesh.num_vertices());
//! println!("Faces: {}", mesh.num_faces());
//!
//! let hit = scene.intersect(&Point3::new(0.0, 0.0, 5.0), &Vector3::new(0.0, 0.0, -1.0));
//! if let Some(hit) = hit {
//!     println!("picked face {:?}", hit.face);
//! }
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use wingmesh::prelude::*;
//! use nalgebra::Point3;
//!
//! // A unit square split along its 1-2 diagonal
//! let corners = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
//! let vertices: Vec<_> = corners.iter().map(|c| Point3::new(c[0], c[1], 0.0)).collect();
//!
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &[[0, 1, 2], [1, 3, 2]]).unwrap();
//!
//! // Only the diagonal is shared, so one twin pair and four boundary half-edges
//! let shared = mesh.halfedge_ids().filter(|&he| mesh.twin(he).is_some()).count();
//! assert_eq!(shared, 2);
//! ```
//!
//! ## Mesh Traversal
//!
//! Call [`mesh::HalfEdgeMesh::fan`] to walk the outgoing half-edges of a
//! vertex in rotational order, starting from a boundary edge if it has one:
//!
//! ```
//! use wingmesh::prelude::*;
//! use nalgebra::Point3;
//!
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.0, 1.0, 0.0),
//! #     Point3::new(1.0, 1.0, 0.0),
//! # ];
//! # let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &[[0, 1, 2], [1, 3, 2]]).unwrap();
//! let targets: Vec<usize> = mesh
//!     .fan(VertexId::new(1))
//!     .map(|he| mesh.target(he).index())
//!     .collect();
//! assert_eq!(targets, vec![3, 2]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;
pub mod scene;

/// Prelude module for convenient imports.
///
/// ```
/// use wingmesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::{NormalOptions, PickOptions, PickPolicy, Ray, RayHit};
    pub use crate::error::{MeshError, RecordKind, Result};
    pub use crate::mesh::{
        build_from_triangles, to_face_vertex, BuildWarning, Face, FaceId, FlatArrays, HalfEdge,
        HalfEdgeId, HalfEdgeMesh, MeshIndex, Vertex, VertexId,
    };
    pub use crate::scene::{LoadOptions, ReadSummary, Scene};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
