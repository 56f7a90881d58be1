//! Error types for wingmesh.
//!
//! Only conditions that abort an operation are errors. Recoverable oddities
//! found while building a mesh are reported as
//! [`BuildWarning`](crate::mesh::BuildWarning)s instead.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Kind of polygon-list record a parse error was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// A `v` position record.
    Vertex,
    /// A `vn` normal record.
    Normal,
    /// An `f` polygon record.
    Face,
    /// A line that is not valid UTF-8.
    Text,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordKind::Vertex => "vertex",
            RecordKind::Normal => "vertex normal",
            RecordKind::Face => "face",
            RecordKind::Text => "text",
        })
    }
}

/// Errors that can occur while building, loading or querying a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The input contained no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references a vertex that does not exist.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A record in a polygon-list file could not be parsed.
    #[error("line {line}: malformed {kind} record: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// Which record kind failed.
        kind: RecordKind,
        /// What was wrong with it.
        message: String,
    },

    /// Adding elements would overflow the mesh's index type.
    #[error("{kind} count {count} exceeds the {max} allowed by the index type")]
    CapacityExceeded {
        /// Which element kind overflowed.
        kind: &'static str,
        /// The count that would have been reached.
        count: usize,
        /// Largest count the index type can address.
        max: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading a mesh file, wrapping the underlying cause with its path.
    #[error("failed to load mesh from {path}: {source}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: Box<MeshError>,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create a parse error for the record on `line`.
    pub fn parse(line: usize, kind: RecordKind, message: impl Into<String>) -> Self {
        MeshError::Parse {
            line,
            kind,
            message: message.into(),
        }
    }

    /// Create an invalid parameter error.
    pub fn invalid_param<T: fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Attach the path of the file being loaded.
    pub fn at_path(self, path: impl Into<PathBuf>) -> Self {
        MeshError::LoadError {
            path: path.into(),
            source: Box::new(self),
        }
    }
}
