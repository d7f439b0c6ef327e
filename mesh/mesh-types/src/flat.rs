//! Flat, non-indexed triangle storage.

use crate::{Aabb, MeshBounds, MeshTopology, Triangle};
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of `f64` values that make up one triangle (3 vertices × 3 axes).
pub const FLOATS_PER_TRIANGLE: usize = 9;

/// A flat, non-indexed triangle mesh.
///
/// Triangle `i` occupies `coords[9i..9i + 9]` as
/// `[ax, ay, az, bx, by, bz, cx, cy, cz]`. There is no index buffer: shared
/// vertices are duplicated per triangle, so every triangle can be read from
/// a contiguous window. The buffer length is always a multiple of
/// [`FLOATS_PER_TRIANGLE`].
///
/// Coordinates are in the source file's native units, treated as
/// millimeters by the measurement stage.
///
/// # Example
///
/// ```
/// use mesh_types::{MeshTopology, TriangleMesh};
///
/// let mesh = TriangleMesh::from_flat(vec![
///     0.0, 0.0, 0.0,
///     1.0, 0.0, 0.0,
///     0.0, 1.0, 0.0,
/// ])
/// .unwrap();
///
/// assert_eq!(mesh.triangle_count(), 1);
/// assert_eq!(mesh.vertex_count(), 3);
///
/// // Not a whole number of triangles
/// assert!(TriangleMesh::from_flat(vec![0.0; 10]).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TriangleMesh {
    coords: Vec<f64>,
}

impl TriangleMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { coords: Vec::new() }
    }

    /// Create an empty mesh with room for `triangles` triangles.
    #[inline]
    #[must_use]
    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            coords: Vec::with_capacity(triangles * FLOATS_PER_TRIANGLE),
        }
    }

    /// Wrap an existing coordinate buffer.
    ///
    /// Returns `None` if the length is not a multiple of
    /// [`FLOATS_PER_TRIANGLE`].
    #[must_use]
    pub fn from_flat(coords: Vec<f64>) -> Option<Self> {
        (coords.len() % FLOATS_PER_TRIANGLE == 0).then_some(Self { coords })
    }

    /// Build a mesh from an iterator of triangles, preserving order.
    #[must_use]
    pub fn from_triangles(triangles: impl IntoIterator<Item = Triangle>) -> Self {
        let triangles = triangles.into_iter();
        let mut mesh = Self::with_capacity(triangles.size_hint().0);
        for tri in triangles {
            mesh.push_triangle(&tri);
        }
        mesh
    }

    /// Append one triangle.
    #[inline]
    pub fn push_triangle(&mut self, triangle: &Triangle) {
        self.coords.extend_from_slice(&triangle.to_flat());
    }

    /// Append every triangle of `other`, after the existing ones.
    pub fn extend_from(&mut self, other: &Self) {
        self.coords.extend_from_slice(&other.coords);
    }

    /// Borrow the raw coordinate buffer.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.coords
    }

    /// Consume the mesh and return the raw coordinate buffer.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.coords
    }

    /// Iterate over all vertex positions, three per triangle.
    pub fn positions(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        self.coords
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
    }

    /// Translate every vertex by `offset`.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for vertex in self.coords.chunks_exact_mut(3) {
            vertex[0] += offset.x;
            vertex[1] += offset.y;
            vertex[2] += offset.z;
        }
    }

    /// Return a copy moved so its bounding-box center sits at the origin.
    ///
    /// Viewers frame the centered copy; measurements are taken on the
    /// original, so the reported statistics stay in the file's own frame.
    #[must_use]
    pub fn centered(&self) -> Self {
        let mut copy = self.clone();
        copy.translate(-self.center().coords);
        copy
    }

    /// Radius of the sphere around the bounding-box center that encloses
    /// every vertex.
    ///
    /// Returns 0.0 for an empty mesh.
    #[must_use]
    pub fn bounding_radius(&self) -> f64 {
        let center = self.center();
        self.positions()
            .map(|p| (p - center).norm())
            .fold(0.0, f64::max)
    }
}

impl MeshTopology for TriangleMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.coords.len() / 3
    }

    #[inline]
    fn triangle_count(&self) -> usize {
        self.coords.len() / FLOATS_PER_TRIANGLE
    }

    fn triangle(&self, index: usize) -> Option<Triangle> {
        let start = index.checked_mul(FLOATS_PER_TRIANGLE)?;
        let window = self.coords.get(start..start + FLOATS_PER_TRIANGLE)?;
        let window: &[f64; FLOATS_PER_TRIANGLE] = window.try_into().ok()?;
        Some(Triangle::from_flat(window))
    }

    fn triangles(&self) -> impl Iterator<Item = Triangle> {
        self.coords
            .chunks_exact(FLOATS_PER_TRIANGLE)
            .filter_map(|c| <&[f64; FLOATS_PER_TRIANGLE]>::try_from(c).ok())
            .map(Triangle::from_flat)
    }
}

impl MeshBounds for TriangleMesh {
    fn bounds(&self) -> Aabb {
        let mut aabb = Aabb::empty();
        for p in self.positions() {
            aabb.expand_to_include(&p);
        }
        aabb
    }
}
