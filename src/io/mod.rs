//! Mesh file input.
//!
//! Only the polygon-list subset of Wavefront OBJ is read: `v`, `vn` and `f`
//! records. Everything else in a file is skipped.
//!
//! # Usage
//!
//! ```no_run
//! use wingmesh::io::obj;
//! use wingmesh::mesh::HalfEdgeMesh;
//!
//! let mesh: HalfEdgeMesh = obj::load("model.obj").unwrap();
//! ```
//!
//! To combine several files into one mesh, read them through a
//! [`Scene`](crate::scene::Scene).

pub mod obj;

pub use obj::{load, parse, read, PolygonList};
