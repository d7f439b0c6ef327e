//! Geometry containers shared by the quoting pipeline.
//!
//! Every stage after decoding works on a [`TriangleMesh`]: a flat buffer of
//! nine coordinates per facet, in millimeters. Decoders may produce an
//! [`IndexedMesh`] first (a vertex pool plus index triples); the normalizer
//! expands it.
//!
//! - [`Triangle`] - one facet, with area and signed-volume helpers
//! - [`Aabb`] - axis-aligned bounds in the model's own frame
//! - [`MeshTopology`] / [`MeshBounds`] - what both containers share
//!
//! Facets wind counter-clockwise seen from outside the part; Z is up.
//!
//! # Example
//!
//! ```
//! use mesh_types::{MeshBounds, MeshTopology, Triangle, TriangleMesh};
//!
//! let mut mesh = TriangleMesh::new();
//! mesh.push_triangle(&Triangle::from_arrays(
//!     [0.0, 0.0, 0.0],
//!     [20.0, 0.0, 0.0],
//!     [0.0, 10.0, 5.0],
//! ));
//!
//! assert_eq!(mesh.triangle_count(), 1);
//! assert_eq!(mesh.as_slice().len(), 9);
//! assert_eq!(mesh.bounds().extents().z, 5.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod flat;
mod mesh;
mod traits;
mod triangle;

pub use bounds::Aabb;
pub use flat::{FLOATS_PER_TRIANGLE, TriangleMesh};
pub use mesh::{IndexedMesh, cuboid, unit_cube};
pub use traits::{MeshBounds, MeshTopology};
pub use triangle::Triangle;

pub use nalgebra::{Point3, Vector3};
