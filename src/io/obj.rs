//! Polygon-list (Wavefront OBJ subset) reading.
//!
//! Three record kinds are understood, one per line:
//!
//! ```text
//! v  <x> <y> <z>        vertex position
//! vn <dx> <dy> <dz>     normal of the next vertex still without one
//! f  <i1> <i2> ... <ik> polygon, 1-based indices, k >= 3
//! ```
//!
//! Face indices may carry `/texture/normal` suffixes, which are ignored.
//! Polygons are split into `k - 2` triangles that share the first vertex.
//! Comments, blank lines and any other record keyword are skipped.
//!
//! A file is parsed and checked completely before anything is added to a
//! mesh, so a malformed file never leaves a half-built mesh behind.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

use nalgebra::{Point3, Vector3};

use crate::algo::normals::NORMAL_EPSILON;
use crate::error::{MeshError, RecordKind, Result};
use crate::mesh::{FaceId, HalfEdgeMesh, MeshIndex, VertexId};
use crate::scene::{LoadOptions, Scene};

/// The validated contents of one polygon-list file.
///
/// Only [`parse`] creates one, so every polygon has at least three corners
/// and every index points at one of the list's own positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonList {
    positions: Vec<Point3<f64>>,
    normals: Vec<Option<Vector3<f64>>>,
    polygons: Vec<Vec<usize>>,
}

impl PolygonList {
    /// Vertex positions in file order.
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Unit normals in file order; the k-th belongs to the k-th vertex.
    /// `None` for a zero-length `vn` record.
    pub fn normals(&self) -> &[Option<Vector3<f64>>] {
        &self.normals
    }

    /// Polygons as 0-based indices into [`positions`](Self::positions).
    pub fn polygons(&self) -> &[Vec<usize>] {
        &self.polygons
    }

    /// Number of triangles the polygons split into.
    pub fn num_triangles(&self) -> usize {
        self.polygons.iter().map(|p| p.len() - 2).sum()
    }

    /// Append these vertices and triangles to `mesh`.
    ///
    /// Indices are shifted by the number of vertices already in the mesh.
    /// Returns the IDs of the first new vertex and face. First edges are not
    /// finalized here.
    pub fn append_to<I: MeshIndex>(&self, mesh: &mut HalfEdgeMesh<I>) -> (VertexId<I>, FaceId<I>) {
        let offset = mesh.num_vertices();
        let first_face = FaceId::new(mesh.num_faces());

        for &p in &self.positions {
            mesh.add_vertex(p);
        }
        for (k, n) in self.normals.iter().enumerate() {
            mesh.vertex_mut(VertexId::new(offset + k)).file_normal = *n;
        }
        for polygon in &self.polygons {
            let v1 = VertexId::new(offset + polygon[0]);
            for pair in polygon[1..].windows(2) {
                mesh.add_face(
                    v1,
                    VertexId::new(offset + pair[0]),
                    VertexId::new(offset + pair[1]),
                );
            }
        }

        (VertexId::new(offset), first_face)
    }
}

/// Parse a polygon list from a reader.
///
/// # Errors
/// [`MeshError::Parse`] with the 1-based line number for a wrong field
/// count, a non-numeric field, a face index outside the file's vertices, or
/// more normals than vertices, or a line that is not UTF-8.
/// [`MeshError::Io`] if reading fails.
pub fn parse<R: BufRead>(reader: R) -> Result<PolygonList> {
    let mut list = PolygonList::default();
    let mut normal_lines = Vec::new();
    let mut face_lines = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let lineno = i + 1;
        let line = line.map_err(|e| match e.kind() {
            ErrorKind::InvalidData => {
                MeshError::parse(lineno, RecordKind::Text, "not valid UTF-8")
            }
            _ => MeshError::from(e),
        })?;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let [x, y, z] = parse_triple(tokens, lineno, RecordKind::Vertex)?;
                list.positions.push(Point3::new(x, y, z));
            }
            Some("vn") => {
                let [dx, dy, dz] = parse_triple(tokens, lineno, RecordKind::Normal)?;
                let n = Vector3::new(dx, dy, dz).try_normalize(NORMAL_EPSILON);
                if n.is_none() {
                    log::warn!("line {}: zero-length vertex normal ignored", lineno);
                }
                list.normals.push(n);
                normal_lines.push(lineno);
            }
            Some("f") => {
                list.polygons.push(parse_polygon(tokens, lineno)?);
                face_lines.push(lineno);
            }
            _ => {}
        }
    }

    let count = list.positions.len();
    if let Some(&lineno) = normal_lines.get(count) {
        return Err(MeshError::parse(
            lineno,
            RecordKind::Normal,
            format!("normal {} has no matching vertex ({} vertices)", count + 1, count),
        ));
    }
    for (polygon, &lineno) in list.polygons.iter_mut().zip(&face_lines) {
        for index in polygon.iter_mut() {
            if *index == 0 || *index > count {
                return Err(MeshError::parse(
                    lineno,
                    RecordKind::Face,
                    format!("vertex index {} out of range 1..={}", index, count),
                ));
            }
            *index -= 1;
        }
    }

    Ok(list)
}

fn parse_triple(tokens: SplitWhitespace<'_>, lineno: usize, kind: RecordKind) -> Result<[f64; 3]> {
    let fields: Vec<&str> = tokens.collect();
    if fields.len() != 3 {
        return Err(MeshError::parse(
            lineno,
            kind,
            format!("expected 3 numbers, found {} fields", fields.len()),
        ));
    }

    let mut out = [0.0; 3];
    for (slot, field) in out.iter_mut().zip(&fields) {
        *slot = parse_field(field, lineno, kind)?;
    }
    Ok(out)
}

fn parse_polygon(tokens: SplitWhitespace<'_>, lineno: usize) -> Result<Vec<usize>> {
    let indices = tokens
        .map(|token| {
            let index = token.split('/').next().unwrap_or(token);
            parse_field::<usize>(index, lineno, RecordKind::Face)
        })
        .collect::<Result<Vec<_>>>()?;

    if indices.len() < 3 {
        return Err(MeshError::parse(
            lineno,
            RecordKind::Face,
            format!("expected at least 3 vertex indices, found {}", indices.len()),
        ));
    }
    Ok(indices)
}

fn parse_field<T: FromStr>(field: &str, lineno: usize, kind: RecordKind) -> Result<T> {
    field
        .parse()
        .map_err(|_| MeshError::parse(lineno, kind, format!("invalid number {:?}", field)))
}

/// Read a polygon list into a new, fully prepared mesh.
///
/// Runs the whole load pipeline with `options`: first edges, normals, and
/// reboxing.
pub fn read<R: BufRead, I: MeshIndex>(reader: R, options: &LoadOptions) -> Result<HalfEdgeMesh<I>> {
    let mut scene = Scene::with_options(options.clone());
    scene.read(reader)?;
    Ok(scene.into_mesh())
}

/// Load a polygon-list file into a new mesh with default options.
///
/// # Example
///
/// ```no_run
/// use wingmesh::io::obj;
/// use wingmesh::mesh::HalfEdgeMesh;
///
/// let mesh: HalfEdgeMesh = obj::load("model.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<HalfEdgeMesh<I>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| MeshError::from(e).at_path(path))?;
    read(BufReader::new(file), &LoadOptions::default()).map_err(|e| e.at_path(path))
}
