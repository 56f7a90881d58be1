//! Algorithms that run over a built mesh.
//!
//! - **Normals**: face normals, fan-summed vertex normals, neighbor smoothing
//! - **Normalize**: recenter and rescale positions into a canonical box
//! - **Pick**: ray/triangle intersection over all faces

pub mod normalize;
pub mod normals;
pub mod pick;

pub use normalize::{rebox, Reboxing, CANONICAL_DIAGONAL};
pub use normals::{estimate_normals, NormalOptions};
pub use pick::{intersect, intersect_with, PickOptions, PickPolicy, Ray, RayHit};
