//! Error types for mesh decoding.

use mesh_transform::TransformError;
use thiserror::Error;

use crate::MeshFormat;

/// Result type for mesh I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while turning an uploaded file into triangles.
#[derive(Debug, Error)]
pub enum IoError {
    /// The file extension is not one of the supported formats.
    #[error("unsupported file format: .{extension}")]
    UnsupportedFormat {
        /// The unrecognized extension, lower-cased; empty if there was none.
        extension: String,
    },

    /// The bytes are not valid for the detected format.
    #[error("invalid {format} data: {message}")]
    Parse {
        /// Format the bytes were decoded as.
        format: MeshFormat,
        /// Description of what was invalid.
        message: String,
    },

    /// The file decoded cleanly but contains no triangles.
    #[error("model contains no triangles")]
    EmptyModel,

    /// Decoded geometry could not be normalized (bad indices, ragged buffers).
    #[error("invalid geometry: {0}")]
    Normalize(#[from] TransformError),

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IoError {
    /// Create a `Parse` error for the given format.
    #[must_use]
    pub fn parse(format: MeshFormat, message: impl Into<String>) -> Self {
        Self::Parse {
            format,
            message: message.into(),
        }
    }

    /// Whether the file content itself was at fault, as opposed to the
    /// extension or the file system.
    #[must_use]
    pub const fn is_content_error(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Normalize(_))
    }
}
