//! Mesh normalization: transforms and scene flattening.
//!
//! Decoders hand over a tree of objects, each with its own transform and
//! geometry that may be indexed or already flat. This crate reduces that to
//! the single flat [`TriangleMesh`](mesh_types::TriangleMesh) every
//! downstream stage consumes:
//!
//! - [`Transform3D`] - per-node placement matrix (translate, rotate, scale, compose)
//! - [`SceneNode`] / [`Geometry`] - the decoded object tree
//! - [`flatten_scene`] - tree walk that threads the accumulated transform to the leaves
//! - [`expand_indexed`] - duplicate shared vertices into a flat stream
//!
//! # Example
//!
//! ```
//! use mesh_transform::{SceneNode, Transform3D, flatten_scene};
//! use mesh_types::{MeshBounds, unit_cube};
//!
//! let scene = SceneNode::leaf("part", unit_cube())
//!     .with_transform(Transform3D::translation(1.0, 2.0, 3.0));
//!
//! let flat = flatten_scene(&scene).unwrap();
//! assert_eq!(flat.mesh.bounds().min.z, 3.0);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod error;
mod scene;
mod transform;

pub use error::{TransformError, TransformResult};
pub use scene::{FlattenedScene, Geometry, SceneNode, expand_indexed, flatten_scene, merge_flat};
pub use transform::Transform3D;
