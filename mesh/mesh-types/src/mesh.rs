//! Vertex-pool mesh, the shape file decoders produce.

use crate::{Aabb, MeshBounds, MeshTopology, Triangle};
use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shared positions plus index triples.
///
/// OBJ objects arrive in this form. Measurement never reads it directly:
/// the normalizer expands it into a [`TriangleMesh`](crate::TriangleMesh)
/// (see `mesh_transform::expand_indexed`). Faces wind counter-clockwise
/// seen from outside.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, MeshTopology, Point3};
///
/// let mesh = IndexedMesh::from_parts(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(8.0, 0.0, 0.0),
///         Point3::new(0.0, 8.0, 0.0),
///         Point3::new(8.0, 8.0, 0.0),
///     ],
///     vec![[0, 1, 2], [2, 1, 3]],
/// );
///
/// assert_eq!(mesh.vertex_count(), 4);
/// assert_eq!(mesh.triangle_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Vertex pool.
    pub positions: Vec<Point3<f64>>,
    /// Index triples into `positions`.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// No vertices, no faces.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            positions: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Wrap an existing pool and face list.
    #[must_use]
    pub const fn from_parts(positions: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> Self {
        Self { positions, faces }
    }

    /// Build from decoder buffers: `xyzxyz...` coordinates and `abcabc...`
    /// indices.
    ///
    /// `None` when either buffer is not a whole number of triples. Indices
    /// are not range-checked; see [`first_invalid_index`](Self::first_invalid_index).
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, MeshTopology};
    ///
    /// let coords = [0.0, 0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 5.0, 0.0];
    /// let mesh = IndexedMesh::from_raw(&coords, &[0, 1, 2]).unwrap();
    /// assert_eq!(mesh.triangle_count(), 1);
    ///
    /// assert!(IndexedMesh::from_raw(&coords[..7], &[0, 1, 2]).is_none());
    /// ```
    #[must_use]
    pub fn from_raw(coords: &[f64], indices: &[u32]) -> Option<Self> {
        if coords.len() % 3 != 0 || indices.len() % 3 != 0 {
            return None;
        }
        Some(Self {
            positions: coords
                .chunks_exact(3)
                .map(|xyz| Point3::new(xyz[0], xyz[1], xyz[2]))
                .collect(),
            faces: indices
                .chunks_exact(3)
                .map(|abc| [abc[0], abc[1], abc[2]])
                .collect(),
        })
    }

    /// First face pointing past the vertex pool, as `(face, index)`.
    #[must_use]
    pub fn first_invalid_index(&self) -> Option<(usize, u32)> {
        let count = self.positions.len();
        self.faces.iter().enumerate().find_map(|(face, indices)| {
            indices
                .iter()
                .find(|&&i| i as usize >= count)
                .map(|&i| (face, i))
        })
    }

    /// Swap the second and third index of every face.
    pub fn flip_winding(&mut self) {
        self.faces.iter_mut().for_each(|face| face.swap(1, 2));
    }

    fn resolve(&self, [i0, i1, i2]: [u32; 3]) -> Option<Triangle> {
        Some(Triangle {
            v0: *self.positions.get(i0 as usize)?,
            v1: *self.positions.get(i1 as usize)?,
            v2: *self.positions.get(i2 as usize)?,
        })
    }
}

impl MeshTopology for IndexedMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    fn triangle(&self, index: usize) -> Option<Triangle> {
        self.faces.get(index).and_then(|&face| self.resolve(face))
    }

    /// Faces with out-of-range indices are skipped.
    fn triangles(&self) -> impl Iterator<Item = Triangle> {
        self.faces.iter().filter_map(|&face| self.resolve(face))
    }
}

impl MeshBounds for IndexedMesh {
    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.positions.iter())
    }
}

/// Closed box from the origin to `(length, width, height)`: eight shared
/// corners, twelve outward-wound faces.
///
/// # Example
///
/// ```
/// use mesh_types::{cuboid, MeshBounds, MeshTopology};
///
/// let block = cuboid(20.0, 10.0, 5.0);
/// assert_eq!(block.vertex_count(), 8);
/// assert_eq!(block.triangle_count(), 12);
/// assert_eq!(block.bounds().volume(), 1000.0);
/// ```
#[must_use]
pub fn cuboid(length: f64, width: f64, height: f64) -> IndexedMesh {
    let (l, w, h) = (length, width, height);
    let positions = vec![
        Point3::new(0.0, 0.0, 0.0), // 0
        Point3::new(l, 0.0, 0.0),   // 1
        Point3::new(l, w, 0.0),     // 2
        Point3::new(0.0, w, 0.0),   // 3
        Point3::new(0.0, 0.0, h),   // 4
        Point3::new(l, 0.0, h),     // 5
        Point3::new(l, w, h),       // 6
        Point3::new(0.0, w, h),     // 7
    ];

    let faces = vec![
        // Bottom (z=0), normal -Z
        [0, 2, 1],
        [0, 3, 2],
        // Top (z=h), normal +Z
        [4, 5, 6],
        [4, 6, 7],
        // Front (y=0), normal -Y
        [0, 1, 5],
        [0, 5, 4],
        // Back (y=w), normal +Y
        [3, 7, 6],
        [3, 6, 2],
        // Left (x=0), normal -X
        [0, 4, 7],
        [0, 7, 3],
        // Right (x=l), normal +X
        [1, 2, 6],
        [1, 6, 5],
    ];

    IndexedMesh { positions, faces }
}

/// `cuboid(1.0, 1.0, 1.0)`.
#[must_use]
pub fn unit_cube() -> IndexedMesh {
    cuboid(1.0, 1.0, 1.0)
}
