//! Decoding of uploaded triangle-mesh files.
//!
//! Two formats are recognized, by file extension (case-insensitive):
//!
//! - **STL** (Stereolithography) - binary and ASCII, told apart from the bytes
//! - **OBJ** (Wavefront) - vertex pool plus polygon faces, possibly split into
//!   named objects
//!
//! Every decoder yields a [`SceneNode`] tree, which [`parse_mesh`] flattens
//! into one world-space [`TriangleMesh`].
//!
//! # Example
//!
//! ```
//! use mesh_io::{MeshFormat, encode_stl_binary, parse_mesh};
//! use mesh_transform::expand_indexed;
//! use mesh_types::{MeshTopology, cuboid};
//!
//! let cube = expand_indexed(&cuboid(10.0, 10.0, 10.0)).unwrap();
//! let bytes = encode_stl_binary(&cube);
//!
//! let format = MeshFormat::from_file_name("part.STL").unwrap();
//! let mesh = parse_mesh(&bytes, format).unwrap();
//! assert_eq!(mesh.triangle_count(), 12);
//! ```
//!
//! Unsupported extensions are rejected before any bytes are looked at:
//!
//! ```
//! use mesh_io::{IoError, MeshFormat};
//!
//! let err = MeshFormat::from_file_name("scan.ply").unwrap_err();
//! assert!(matches!(err, IoError::UnsupportedFormat { .. }));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod obj;
mod stl;

pub use error::{IoError, IoResult};
pub use obj::decode_obj;
pub use stl::{decode_stl, encode_stl_binary, write_stl_binary};

use std::fmt;
use std::path::Path;

use mesh_transform::{SceneNode, flatten_scene};
use mesh_types::{MeshTopology, TriangleMesh};
use tracing::info;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    /// STL (Stereolithography) format.
    /// Supports binary and ASCII variants.
    Stl,
    /// OBJ (Wavefront) format.
    /// ASCII only, supports polygons and multiple objects.
    Obj,
}

impl MeshFormat {
    /// Detect format from a bare extension, ignoring case.
    ///
    /// Returns `None` if the extension is not recognized.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "stl" => Some(Self::Stl),
            "obj" => Some(Self::Obj),
            _ => None,
        }
    }

    /// Detect format from a path's extension.
    ///
    /// Returns `None` if the extension is missing or not recognized.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        Self::from_extension(path.as_ref().extension()?.to_str()?)
    }

    /// Detect format from an uploaded file name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::UnsupportedFormat`] carrying the lower-cased
    /// extension (empty if there is none).
    pub fn from_file_name(name: &str) -> IoResult<Self> {
        Self::from_path(name).ok_or_else(|| IoError::UnsupportedFormat {
            extension: Path::new(name)
                .extension()
                .map(|e| e.to_string_lossy().to_ascii_lowercase())
                .unwrap_or_default(),
        })
    }

    /// Get the canonical file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Stl => "stl",
            Self::Obj => "obj",
        }
    }
}

impl fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stl => f.write_str("STL"),
            Self::Obj => f.write_str("OBJ"),
        }
    }
}

/// Decode bytes into a scene tree without flattening it.
///
/// STL files always produce a single leaf; OBJ files produce one leaf
/// per object.
///
/// # Errors
///
/// Returns [`IoError::Parse`] for malformed or truncated content.
pub fn parse_scene(bytes: &[u8], format: MeshFormat) -> IoResult<SceneNode> {
    match format {
        MeshFormat::Stl => Ok(SceneNode::leaf("", decode_stl(bytes)?)),
        MeshFormat::Obj => decode_obj(bytes),
    }
}

/// Decode bytes into one flat, world-space triangle mesh.
///
/// A file that decodes cleanly but holds no triangles (an STL with zero
/// facets, an OBJ of bare vertices) is rejected rather than measured as a
/// zero-size model.
///
/// # Errors
///
/// - [`IoError::Parse`] for malformed or truncated content
/// - [`IoError::Normalize`] if decoded faces reference missing vertices
/// - [`IoError::EmptyModel`] if the file holds no triangles
pub fn parse_mesh(bytes: &[u8], format: MeshFormat) -> IoResult<TriangleMesh> {
    let scene = parse_scene(bytes, format)?;
    let flat = flatten_scene(&scene)?;
    if flat.sub_meshes == 0 || flat.mesh.is_empty() {
        return Err(IoError::EmptyModel);
    }

    info!(
        %format,
        bytes = bytes.len(),
        sub_meshes = flat.sub_meshes,
        triangles = flat.mesh.triangle_count(),
        "parsed mesh"
    );
    Ok(flat.mesh)
}

/// Detect the format from `file_name` and decode `bytes`.
///
/// # Errors
///
/// [`IoError::UnsupportedFormat`] before any decoding is attempted, or any
/// error from [`parse_mesh`].
pub fn parse_upload(file_name: &str, bytes: &[u8]) -> IoResult<TriangleMesh> {
    let format = MeshFormat::from_file_name(file_name)?;
    parse_mesh(bytes, format)
}

/// Load a mesh from a file, detecting format from extension.
///
/// # Errors
///
/// Returns an error if:
/// - The file format cannot be determined from the extension
/// - The file cannot be read
/// - The file content is invalid for the detected format
///
/// # Example
///
/// ```no_run
/// use mesh_io::load_mesh;
///
/// let mesh = load_mesh("model.stl").unwrap();
/// ```
pub fn load_mesh<P: AsRef<Path>>(path: P) -> IoResult<TriangleMesh> {
    let path = path.as_ref();
    let format = MeshFormat::from_path(path).ok_or_else(|| IoError::UnsupportedFormat {
        extension: path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default(),
    })?;

    let bytes = std::fs::read(path)?;
    parse_mesh(&bytes, format)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn format_from_path_stl() {
        assert_eq!(MeshFormat::from_path("model.stl"), Some(MeshFormat::Stl));
        assert_eq!(MeshFormat::from_path("model.STL"), Some(MeshFormat::Stl));
        assert_eq!(
            MeshFormat::from_path("/path/to/model.stl"),
            Some(MeshFormat::Stl)
        );
    }

    #[test]
    fn format_from_path_obj() {
        assert_eq!(MeshFormat::from_path("model.obj"), Some(MeshFormat::Obj));
        assert_eq!(MeshFormat::from_path("model.Obj"), Some(MeshFormat::Obj));
    }

    #[test]
    fn format_from_path_unknown() {
        assert_eq!(MeshFormat::from_path("model.3mf"), None);
        assert_eq!(MeshFormat::from_path("model"), None);
        assert_eq!(MeshFormat::from_path(""), None);
        assert_eq!(MeshFormat::from_path("model.stl.zip"), None);
    }

    #[test]
    fn unsupported_file_name_reports_extension() {
        match MeshFormat::from_file_name("Scan.PLY") {
            Err(IoError::UnsupportedFormat { extension }) => assert_eq!(extension, "ply"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
        match MeshFormat::from_file_name("README") {
            Err(IoError::UnsupportedFormat { extension }) => assert!(extension.is_empty()),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn format_extension_and_display() {
        assert_eq!(MeshFormat::Stl.extension(), "stl");
        assert_eq!(MeshFormat::Obj.extension(), "obj");
        assert_eq!(MeshFormat::Obj.to_string(), "OBJ");
    }

    #[test]
    fn obj_without_faces_is_empty_model() {
        let err = parse_mesh(b"# nothing here\nv 0 0 0\n", MeshFormat::Obj).unwrap_err();
        assert!(matches!(err, IoError::EmptyModel));
    }

    #[test]
    fn stl_without_facets_is_empty_model() {
        let err = parse_mesh(b"solid empty\nendsolid empty\n", MeshFormat::Stl).unwrap_err();
        assert!(matches!(err, IoError::EmptyModel));

        let mut binary = vec![0u8; 80];
        binary.extend_from_slice(&0u32.to_le_bytes());
        let err = parse_mesh(&binary, MeshFormat::Stl).unwrap_err();
        assert!(matches!(err, IoError::EmptyModel));
    }

    #[test]
    fn parse_upload_dispatches_on_name() {
        let obj = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        assert_eq!(parse_upload("tri.OBJ", obj).unwrap().triangle_count(), 1);
        assert!(matches!(
            parse_upload("tri.glb", obj),
            Err(IoError::UnsupportedFormat { .. })
        ));
    }
}
