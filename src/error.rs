//! Crate-level error types.

use std::fmt;

use naga_oil::compose::ComposerError;

use crate::geometry::{Column, GeometryType};
use crate::gpu::render_context::RenderContextError;

/// A renderer refused a point cloud.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererError {
    /// The cloud has no points to draw.
    EmptyGeometry,
    /// An optional column is neither absent nor as long as `positions`.
    ColumnLength {
        /// Offending column.
        column: Column,
        /// Number of positions.
        expected: usize,
        /// Length of the column.
        found: usize,
    },
}

impl fmt::Display for RendererError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGeometry => write!(f, "point cloud has no points"),
            Self::ColumnLength {
                column,
                expected,
                found,
            } => write!(
                f,
                "{} column has {found} entries, expected {expected}",
                column.name()
            ),
        }
    }
}

impl std::error::Error for RendererError {}

/// Failures of [`PointCloudEditor`](crate::editor::PointCloudEditor)
/// operations. A failed operation leaves the editor unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// No live rendering context to attach geometry to.
    NotInitialized,
    /// Geometry type the editor cannot merge.
    UnsupportedGeometry(GeometryType),
    /// The renderer rejected the geometry.
    Renderer(RendererError),
    /// An appended cloud's optional column presence differs from the
    /// merged buffer's.
    ColumnMismatch {
        /// First column whose presence differs.
        column: Column,
    },
    /// No segment carries the given id.
    NotFound(String),
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => {
                write!(f, "editor has no active rendering context")
            }
            Self::UnsupportedGeometry(kind) => {
                write!(f, "unsupported geometry type: {kind:?}")
            }
            Self::Renderer(e) => write!(f, "renderer rejected geometry: {e}"),
            Self::ColumnMismatch { column } => write!(
                f,
                "{} column presence differs from the merged cloud",
                column.name()
            ),
            Self::NotFound(id) => write!(f, "no segment with id '{id}'"),
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Renderer(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RendererError> for EditorError {
    fn from(e: RendererError) -> Self {
        Self::Renderer(e)
    }
}

/// Errors produced by the cloud-interpreter crate outside the editor core.
#[derive(Debug)]
pub enum CloudError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// WGSL composition failure.
    Shader(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Malformed line in an ASCII point file.
    PointFile {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        message: String,
    },
    /// Editor rejected a geometry while loading.
    Editor(EditorError),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for CloudError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Shader(msg) => write!(f, "shader error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::PointFile { line, message } => {
                write!(f, "point file line {line}: {message}")
            }
            Self::Editor(e) => write!(f, "editor error: {e}"),
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for CloudError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Editor(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for CloudError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<Box<ComposerError>> for CloudError {
    fn from(e: Box<ComposerError>) -> Self {
        Self::Shader(e.to_string())
    }
}

impl From<std::io::Error> for CloudError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<EditorError> for CloudError {
    fn from(e: EditorError) -> Self {
        Self::Editor(e)
    }
}
