//! A mesh assembled from one or more polygon-list files.
//!
//! [`Scene`] is the only way to get a loaded mesh, and it only hands the mesh
//! out once every preparation pass has run. Each `read` appends a file,
//! then recomputes first edges and normals for the whole mesh and reboxes it.
//! A file that fails to parse leaves the scene as it was.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use nalgebra::{Point3, Vector3};

use crate::algo::normalize::{rebox, CANONICAL_DIAGONAL};
use crate::algo::normals::{estimate_normals, NormalOptions};
use crate::algo::pick::{self, PickOptions, Ray, RayHit};
use crate::error::{MeshError, Result};
use crate::io::obj;
use crate::mesh::{self, FaceId, FlatArrays, HalfEdgeMesh, MeshIndex, VertexId};

/// Options controlling what happens after a file is read.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Normal estimation settings.
    pub normals: NormalOptions,

    /// Whether to recenter and rescale positions after each read.
    pub rebox: bool,

    /// Bounding-box diagonal after reboxing.
    pub canonical_diagonal: f64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            normals: NormalOptions::default(),
            rebox: true,
            canonical_diagonal: CANONICAL_DIAGONAL,
        }
    }
}

impl LoadOptions {
    /// Set the normal estimation settings.
    pub fn with_normals(mut self, normals: NormalOptions) -> Self {
        self.normals = normals;
        self
    }

    /// Keep positions exactly as read.
    pub fn without_rebox(mut self) -> Self {
        self.rebox = false;
        self
    }

    /// Set the bounding-box diagonal used when reboxing.
    pub fn with_diagonal(mut self, diagonal: f64) -> Result<Self> {
        if !(diagonal.is_finite() && diagonal > 0.0) {
            return Err(MeshError::invalid_param(
                "diagonal",
                diagonal,
                "must be finite and positive",
            ));
        }
        self.canonical_diagonal = diagonal;
        Ok(self)
    }
}

/// What one call to [`Scene::read`] added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadSummary {
    /// Vertices added.
    pub vertices: usize,
    /// Triangles added.
    pub faces: usize,
    /// Build warnings raised by the new faces.
    pub warnings: usize,
}

/// A prepared mesh built from polygon-list files.
#[derive(Debug, Clone)]
pub struct Scene<I: MeshIndex = u32> {
    mesh: HalfEdgeMesh<I>,
    options: LoadOptions,
}

impl<I: MeshIndex> Default for Scene<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> Scene<I> {
    /// Create an empty scene with default options.
    pub fn new() -> Self {
        Self::with_options(LoadOptions::default())
    }

    /// Create an empty scene.
    pub fn with_options(options: LoadOptions) -> Self {
        Self {
            mesh: HalfEdgeMesh::new(),
            options,
        }
    }

    /// The options used for every read.
    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// The prepared mesh.
    pub fn mesh(&self) -> &HalfEdgeMesh<I> {
        &self.mesh
    }

    /// Take the prepared mesh out of the scene.
    pub fn into_mesh(self) -> HalfEdgeMesh<I> {
        self.mesh
    }

    /// Whether nothing has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.mesh.num_vertices() == 0
    }

    /// Append one polygon list and prepare the combined mesh.
    ///
    /// # Errors
    /// Any parse or I/O error, or [`MeshError::CapacityExceeded`] when the
    /// combined mesh would not fit the index type. The scene is unchanged in
    /// that case.
    pub fn read<R: BufRead>(&mut self, reader: R) -> Result<ReadSummary> {
        let list = obj::parse(reader)?;
        self.mesh.check_capacity(list.positions().len(), list.num_triangles())?;

        let warnings_before = self.mesh.warnings().len();
        let (first_vertex, first_face) = list.append_to(&mut self.mesh);
        self.prepare();

        let summary = ReadSummary {
            vertices: self.mesh.num_vertices() - first_vertex.index(),
            faces: self.mesh.num_faces() - first_face.index(),
            warnings: self.mesh.warnings().len() - warnings_before,
        };
        log::info!(
            "read {} vertices, {} faces ({} warnings); scene now has {} faces",
            summary.vertices,
            summary.faces,
            summary.warnings,
            self.mesh.num_faces()
        );
        Ok(summary)
    }

    /// Append one polygon-list file and prepare the combined mesh.
    ///
    /// # Errors
    /// As [`read`](Self::read), with the path attached.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<ReadSummary> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| MeshError::from(e).at_path(path))?;
        self.read(BufReader::new(file)).map_err(|e| e.at_path(path))
    }

    fn prepare(&mut self) {
        self.mesh.finalize_first_edges();
        estimate_normals(&mut self.mesh, &self.options.normals);
        if self.options.rebox {
            rebox(&mut self.mesh, self.options.canonical_diagonal);
        }
    }

    /// Flattened per-corner arrays with the default color.
    pub fn flatten(&self) -> FlatArrays {
        mesh::flatten(&self.mesh)
    }

    /// Flattened per-corner arrays with caller-supplied colors.
    ///
    /// See [`mesh::flatten_with`] for the hook's arguments.
    pub fn flatten_with<F>(&self, color: F) -> FlatArrays
    where
        F: FnMut(FaceId<I>, usize, VertexId<I>) -> [f32; 3],
    {
        mesh::flatten_with(&self.mesh, color)
    }

    /// Pick a face with the default policy.
    pub fn intersect(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> Option<RayHit<I>> {
        pick::intersect(&self.mesh, origin, direction)
    }

    /// Pick a face with explicit options.
    pub fn intersect_with(&self, ray: &Ray, options: &PickOptions) -> Option<RayHit<I>> {
        pick::intersect_with(&self.mesh, ray, options)
    }
}
