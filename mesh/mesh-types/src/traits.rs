//! Behavior shared by flat and indexed meshes.

use crate::{Aabb, Triangle};
use nalgebra::Point3;

/// Facet access independent of storage layout.
///
/// Implemented by [`TriangleMesh`](crate::TriangleMesh) and
/// [`IndexedMesh`](crate::IndexedMesh).
pub trait MeshTopology {
    /// Stored vertices. Flat storage holds three per facet.
    fn vertex_count(&self) -> usize;

    /// Number of facets.
    fn triangle_count(&self) -> usize;

    /// No facets at all.
    fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }

    /// Facet `index` with its corners resolved, or `None` when the index
    /// or one of its vertex references is out of range.
    fn triangle(&self, index: usize) -> Option<Triangle>;

    /// Every facet, corners resolved, in storage order.
    fn triangles(&self) -> impl Iterator<Item = Triangle>;
}

/// Bounding-box queries.
pub trait MeshBounds {
    /// Box around every stored vertex; [`Aabb::empty`] without vertices.
    fn bounds(&self) -> Aabb;

    /// Like [`bounds`](Self::bounds), but `None` for a mesh with no vertices.
    fn bounds_opt(&self) -> Option<Aabb> {
        Some(self.bounds()).filter(|b| !b.is_empty())
    }

    /// Midpoint of the bounding box.
    fn center(&self) -> Point3<f64> {
        self.bounds().center()
    }
}
