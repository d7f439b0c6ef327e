//! Error types for mesh normalization.

use thiserror::Error;

/// Result type for normalization operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Errors that can occur while normalizing decoded geometry.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A face references a vertex that is not in the pool.
    #[error("face {face} references vertex {index}, but only {vertex_count} vertices exist")]
    IndexOutOfBounds {
        /// Index of the offending face.
        face: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Number of vertices in the pool.
        vertex_count: usize,
    },

    /// A raw coordinate or index buffer is not a whole number of entries.
    #[error("malformed {what} buffer: length {len} is not a multiple of {stride}")]
    MalformedBuffer {
        /// Which buffer was malformed.
        what: &'static str,
        /// Actual buffer length.
        len: usize,
        /// Required stride.
        stride: usize,
    },
}
