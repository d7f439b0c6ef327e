//! Wavefront OBJ decoding via `tobj`.
//!
//! Each `o`/`g` object becomes one child of the returned scene root, in
//! file order. Polygons are fan-triangulated from their first vertex and
//! negative (relative) indices are resolved by `tobj`. OBJ carries no
//! per-object transforms, so every child has the identity transform.
//! Materials, normals and texture coordinates are ignored.

use std::io::Cursor;

use mesh_transform::{SceneNode, TransformError};
use mesh_types::IndexedMesh;
use tracing::debug;

use crate::MeshFormat;
use crate::error::{IoError, IoResult};

/// Decode OBJ bytes into a scene with one leaf per object.
///
/// # Errors
///
/// Returns [`IoError::Parse`] if `tobj` rejects the content (bad numbers,
/// out-of-range face indices) or a vertex is NaN or infinite, and
/// [`IoError::Normalize`] if a decoded buffer is ragged. Objects without
/// faces are skipped, so a file of bare vertices yields an empty scene.
pub fn decode_obj(bytes: &[u8]) -> IoResult<SceneNode> {
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };

    let mut reader = Cursor::new(bytes);
    let (models, _materials) =
        tobj::load_obj_buf(&mut reader, &options, |_| Ok((Vec::new(), Default::default())))
            .map_err(|e| IoError::parse(MeshFormat::Obj, e.to_string()))?;

    let mut root = SceneNode::group("");
    for model in models {
        if model.mesh.indices.is_empty() {
            debug!(name = %model.name, "skipping OBJ object without faces");
            continue;
        }
        if model.mesh.positions.iter().any(|c| !c.is_finite()) {
            return Err(IoError::parse(
                MeshFormat::Obj,
                format!("object {:?} has a non-finite vertex coordinate", model.name),
            ));
        }
        let positions: Vec<f64> = model.mesh.positions.iter().copied().map(f64::from).collect();
        let mesh = IndexedMesh::from_raw(&positions, &model.mesh.indices).ok_or(
            TransformError::MalformedBuffer {
                what: "OBJ position",
                len: positions.len(),
                stride: 3,
            },
        )?;

        debug!(
            name = %model.name,
            vertices = mesh.positions.len(),
            triangles = mesh.faces.len(),
            "decoded OBJ object"
        );
        root.push_child(SceneNode::leaf(model.name, mesh));
    }

    Ok(root)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mesh_transform::flatten_scene;
    use mesh_types::MeshTopology;

    const QUAD: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";

    #[test]
    fn quad_is_fan_triangulated() {
        let scene = decode_obj(QUAD.as_bytes()).unwrap();
        assert_eq!(scene.geometry_count(), 1);

        let flat = flatten_scene(&scene).unwrap().mesh;
        assert_eq!(flat.triangle_count(), 2);

        // Both triangles fan out from the first vertex
        for tri in flat.triangles() {
            assert_eq!(tri.v0, mesh_types::Point3::new(0.0, 0.0, 0.0));
        }
    }

    #[test]
    fn negative_indices_are_relative() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let scene = decode_obj(obj.as_bytes()).unwrap();
        let flat = flatten_scene(&scene).unwrap().mesh;

        assert_eq!(flat.as_slice(), &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn named_objects_become_children() {
        let obj = "\
o first
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
o second
v 0 0 1
v 1 0 1
v 0 1 1
f 4 5 6
";
        let scene = decode_obj(obj.as_bytes()).unwrap();
        let names: Vec<&str> = scene.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn vertices_without_faces_yield_no_geometry() {
        let scene = decode_obj(b"v 0 0 0\nv 1 0 0\n").unwrap();
        assert_eq!(scene.geometry_count(), 0);
    }

    #[test]
    fn comment_only_file_yields_no_geometry() {
        let scene = decode_obj(b"# only a comment\n").unwrap();
        assert_eq!(scene.geometry_count(), 0);
    }

    #[test]
    fn non_finite_vertex_is_parse_error() {
        let err = decode_obj(b"v 0 0 0\nv inf 0 0\nv 0 1 0\nf 1 2 3\n").unwrap_err();
        assert!(matches!(
            err,
            IoError::Parse {
                format: MeshFormat::Obj,
                ..
            }
        ));
    }

    #[test]
    fn bad_number_is_parse_error() {
        let err = decode_obj(b"v 0 nope 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap_err();
        assert!(matches!(
            err,
            IoError::Parse {
                format: MeshFormat::Obj,
                ..
            }
        ));
    }
}
