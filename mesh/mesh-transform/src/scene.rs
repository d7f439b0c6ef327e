//! Scene trees and their reduction to one flat triangle buffer.
//!
//! Decoders produce a [`SceneNode`] tree: every node carries a local
//! transform, may own geometry, and may have children. [`flatten_scene`]
//! walks the tree root to leaf, composing transforms on the way down, and
//! appends each geometry's world-space triangles to a single
//! [`TriangleMesh`] in pre-order.

use mesh_types::{IndexedMesh, MeshTopology, TriangleMesh};
use tracing::debug;

use crate::Transform3D;
use crate::error::{TransformError, TransformResult};

/// Geometry attached to a scene node, in whichever layout the decoder produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Shared vertex pool plus index triples.
    Indexed(IndexedMesh),
    /// Already-flat triangle stream.
    Flat(TriangleMesh),
}

impl Geometry {
    /// Number of triangles this geometry will contribute.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        match self {
            Self::Indexed(mesh) => mesh.triangle_count(),
            Self::Flat(mesh) => mesh.triangle_count(),
        }
    }
}

impl From<IndexedMesh> for Geometry {
    fn from(mesh: IndexedMesh) -> Self {
        Self::Indexed(mesh)
    }
}

impl From<TriangleMesh> for Geometry {
    fn from(mesh: TriangleMesh) -> Self {
        Self::Flat(mesh)
    }
}

/// One node of a decoded scene.
///
/// # Example
///
/// ```
/// use mesh_transform::{SceneNode, Transform3D, flatten_scene};
/// use mesh_types::{MeshTopology, unit_cube};
///
/// let scene = SceneNode::group("root")
///     .with_child(SceneNode::leaf("a", unit_cube()))
///     .with_child(
///         SceneNode::leaf("b", unit_cube())
///             .with_transform(Transform3D::translation(5.0, 0.0, 0.0)),
///     );
///
/// let flat = flatten_scene(&scene).unwrap();
/// assert_eq!(flat.sub_meshes, 2);
/// assert_eq!(flat.mesh.triangle_count(), 24);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneNode {
    /// Object or group name from the source file, possibly empty.
    pub name: String,
    /// Transform relative to the parent node.
    pub transform: Transform3D,
    /// Geometry owned by this node.
    pub geometry: Option<Geometry>,
    /// Child nodes, in file order.
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Create a node without geometry.
    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create a node that owns geometry.
    #[must_use]
    pub fn leaf(name: impl Into<String>, geometry: impl Into<Geometry>) -> Self {
        Self {
            name: name.into(),
            geometry: Some(geometry.into()),
            ..Self::default()
        }
    }

    /// Set the local transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform3D) -> Self {
        self.transform = transform;
        self
    }

    /// Append a child node.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child node in place.
    pub fn push_child(&mut self, child: Self) {
        self.children.push(child);
    }

    /// Count nodes in this subtree that own geometry.
    #[must_use]
    pub fn geometry_count(&self) -> usize {
        usize::from(self.geometry.is_some())
            + self.children.iter().map(Self::geometry_count).sum::<usize>()
    }
}

/// Result of flattening a scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenedScene {
    /// All triangles, in world space, in traversal order.
    pub mesh: TriangleMesh,
    /// Number of geometry-bearing nodes that were visited.
    pub sub_meshes: usize,
}

/// Flatten a scene tree into one world-space triangle buffer.
///
/// Nodes are visited in pre-order (a node's own geometry, then its
/// children in order), so the output order is deterministic. Each
/// geometry is placed by the product of every transform from the root
/// down to its node.
///
/// # Errors
///
/// Returns [`TransformError::IndexOutOfBounds`] if any indexed geometry
/// references a vertex outside its pool.
pub fn flatten_scene(root: &SceneNode) -> TransformResult<FlattenedScene> {
    let mut out = FlattenedScene::default();
    let mut stack = vec![(root, root.transform)];

    while let Some((node, world)) = stack.pop() {
        if let Some(geometry) = &node.geometry {
            let before = out.mesh.triangle_count();
            append_geometry(geometry, &world, &mut out.mesh)?;
            out.sub_meshes += 1;
            debug!(
                name = %node.name,
                triangles = out.mesh.triangle_count() - before,
                identity = world.is_identity(),
                "flattened sub-mesh"
            );
        }

        // Reverse so the first child is popped first
        for child in node.children.iter().rev() {
            stack.push((child, child.transform.then(&world)));
        }
    }

    Ok(out)
}

/// Expand an indexed mesh into a flat buffer, duplicating shared vertices.
///
/// Face order is preserved.
///
/// # Errors
///
/// Returns [`TransformError::IndexOutOfBounds`] if a face references a
/// vertex outside the pool.
///
/// # Example
///
/// ```
/// use mesh_transform::expand_indexed;
/// use mesh_types::{MeshTopology, cuboid};
///
/// let flat = expand_indexed(&cuboid(1.0, 2.0, 3.0)).unwrap();
/// assert_eq!(flat.triangle_count(), 12);
/// assert_eq!(flat.vertex_count(), 36);
/// ```
pub fn expand_indexed(mesh: &IndexedMesh) -> TransformResult<TriangleMesh> {
    let mut out = TriangleMesh::with_capacity(mesh.triangle_count());
    append_indexed(mesh, &Transform3D::identity(), &mut out)?;
    Ok(out)
}

/// Concatenate flat sources into one buffer, in iteration order.
#[must_use]
pub fn merge_flat<'a>(sources: impl IntoIterator<Item = &'a TriangleMesh>) -> TriangleMesh {
    let mut out = TriangleMesh::new();
    for source in sources {
        out.extend_from(source);
    }
    out
}

fn append_geometry(
    geometry: &Geometry,
    world: &Transform3D,
    out: &mut TriangleMesh,
) -> TransformResult<()> {
    match geometry {
        Geometry::Indexed(mesh) => append_indexed(mesh, world, out),
        Geometry::Flat(mesh) if world.is_identity() => {
            out.extend_from(mesh);
            Ok(())
        }
        Geometry::Flat(mesh) => {
            for tri in mesh.triangles() {
                out.push_triangle(&world.transform_triangle(&tri));
            }
            Ok(())
        }
    }
}

fn append_indexed(
    mesh: &IndexedMesh,
    world: &Transform3D,
    out: &mut TriangleMesh,
) -> TransformResult<()> {
    if let Some((face, index)) = mesh.first_invalid_index() {
        return Err(TransformError::IndexOutOfBounds {
            face,
            index,
            vertex_count: mesh.positions.len(),
        });
    }

    if world.is_identity() {
        for tri in mesh.triangles() {
            out.push_triangle(&tri);
        }
    } else {
        for tri in mesh.triangles() {
            out.push_triangle(&world.transform_triangle(&tri));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{MeshBounds, Point3, Triangle, Vector3, cuboid, unit_cube};

    fn volume(mesh: &TriangleMesh) -> f64 {
        mesh.triangles().map(|t| t.signed_volume()).sum::<f64>()
    }

    #[test]
    fn expand_preserves_face_order() {
        let mesh = IndexedMesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
            ],
            vec![[0, 1, 2], [3, 1, 0]],
        );
        let flat = expand_indexed(&mesh).unwrap();

        assert_eq!(
            flat.as_slice(),
            &[
                0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, //
                0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0,
            ]
        );
    }

    #[test]
    fn expand_rejects_out_of_range_index() {
        let mut mesh = unit_cube();
        mesh.faces.push([0, 8, 1]);

        match expand_indexed(&mesh) {
            Err(TransformError::IndexOutOfBounds {
                face,
                index,
                vertex_count,
            }) => {
                assert_eq!(face, 12);
                assert_eq!(index, 8);
                assert_eq!(vertex_count, 8);
            }
            other => panic!("expected IndexOutOfBounds, got {other:?}"),
        }
    }

    #[test]
    fn transforms_accumulate_root_to_leaf() {
        // Leaf is scaled by 2, its parent shifts by 10 in x.
        let scene = SceneNode::group("root").with_child(
            SceneNode::group("offset")
                .with_transform(Transform3D::translation(10.0, 0.0, 0.0))
                .with_child(
                    SceneNode::leaf("cube", unit_cube())
                        .with_transform(Transform3D::uniform_scale(2.0)),
                ),
        );

        let flat = flatten_scene(&scene).unwrap();
        let bounds = flat.mesh.bounds();

        assert_eq!(flat.sub_meshes, 1);
        assert_relative_eq!(bounds.min.x, 10.0, epsilon = 1e-12);
        assert_relative_eq!(bounds.max.x, 12.0, epsilon = 1e-12);
        assert_relative_eq!(volume(&flat.mesh), 8.0, epsilon = 1e-9);
    }

    #[test]
    fn rotated_leaf_under_translated_parent() {
        // Quarter turn about Z maps x in [0, 10], y in [0, 20] to
        // x in [-20, 0], y in [0, 10]; the parent then shifts x by 100.
        let scene = SceneNode::group("root").with_child(
            SceneNode::group("shelf")
                .with_transform(Transform3D::translation(100.0, 0.0, 0.0))
                .with_child(
                    SceneNode::leaf("part", cuboid(10.0, 20.0, 30.0)).with_transform(
                        Transform3D::rotation(Vector3::z(), std::f64::consts::FRAC_PI_2),
                    ),
                ),
        );

        let flat = flatten_scene(&scene).unwrap();
        let bounds = flat.mesh.bounds();

        assert_relative_eq!(volume(&flat.mesh), 6000.0, epsilon = 1e-6);
        assert_relative_eq!(bounds.min.x, 80.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.max.x, 100.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.min.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.max.y, 10.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.max.z, 30.0, epsilon = 1e-9);
    }

    #[test]
    fn root_transform_applies_to_everything() {
        let scene = SceneNode::leaf("root", unit_cube())
            .with_transform(Transform3D::translation(0.0, 0.0, 5.0))
            .with_child(SceneNode::leaf("child", unit_cube()));

        let flat = flatten_scene(&scene).unwrap();
        assert_eq!(flat.sub_meshes, 2);
        assert_relative_eq!(flat.mesh.bounds().min.z, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn traversal_is_pre_order() {
        let tri = |z: f64| {
            TriangleMesh::from_triangles([Triangle::from_arrays(
                [0.0, 0.0, z],
                [1.0, 0.0, z],
                [0.0, 1.0, z],
            )])
        };
        let scene = SceneNode::leaf("a", tri(0.0))
            .with_child(SceneNode::leaf("b", tri(1.0)).with_child(SceneNode::leaf("c", tri(2.0))))
            .with_child(SceneNode::leaf("d", tri(3.0)));

        let flat = flatten_scene(&scene).unwrap();
        let zs: Vec<f64> = flat.mesh.triangles().map(|t| t.v0.z).collect();
        assert_eq!(zs, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn empty_groups_contribute_nothing() {
        let scene = SceneNode::group("root").with_child(SceneNode::group("empty"));
        let flat = flatten_scene(&scene).unwrap();

        assert_eq!(scene.geometry_count(), 0);
        assert_eq!(flat.sub_meshes, 0);
        assert!(flat.mesh.is_empty());
    }

    #[test]
    fn flat_geometry_is_transformed() {
        let flat_cube = expand_indexed(&cuboid(2.0, 2.0, 2.0)).unwrap();
        let scene = SceneNode::leaf("stl", flat_cube.clone())
            .with_transform(Transform3D::translation(-1.0, -1.0, -1.0));

        let flat = flatten_scene(&scene).unwrap();
        assert_relative_eq!(flat.mesh.center().x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(volume(&flat.mesh), volume(&flat_cube), epsilon = 1e-9);
    }

    #[test]
    fn merge_flat_concatenates_in_order() {
        let a = expand_indexed(&unit_cube()).unwrap();
        let b = expand_indexed(&cuboid(2.0, 2.0, 2.0)).unwrap();

        let merged = merge_flat([&a, &b]);
        assert_eq!(merged.triangle_count(), 24);
        assert_eq!(&merged.as_slice()[..a.as_slice().len()], a.as_slice());
        assert_relative_eq!(volume(&merged), 9.0, epsilon = 1e-9);
    }
}
