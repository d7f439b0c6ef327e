//! Geometric measurement of uploaded models.
//!
//! Given one flat triangle buffer (coordinates in millimeters), this crate
//! computes what a print quote needs:
//!
//! - **Volume**: signed tetrahedron integral, reported as its magnitude in cm³
//! - **Surface area**: sum of triangle areas in cm²
//! - **Bounding box**: extents in cm and box volume in cm³
//! - **Polygon count**: number of triangles
//!
//! The analysis is a pure function of the triangle data.
//!
//! # Example
//!
//! ```
//! use mesh_measure::{MeasurementAdvisory, measure};
//! use mesh_transform::expand_indexed;
//! use mesh_types::cuboid;
//!
//! let mesh = expand_indexed(&cuboid(30.0, 20.0, 10.0)).unwrap();
//! let m = measure(&mesh);
//!
//! assert!((m.statistics.volume_cm3 - 6.0).abs() < 1e-9);
//! assert_eq!(m.advisories, vec![MeasurementAdvisory::OpenMeshBias]);
//! ```
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system**:
//! - X: width (left/right)
//! - Y: depth (front/back)
//! - Z: height (up/down)

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod dimensions;
mod statistics;

pub use dimensions::{Dimensions, dimensions};
pub use statistics::{
    DimensionsCm, MM2_PER_CM2, MM3_PER_CM3, MM_PER_CM, Measurement, MeasurementAdvisory,
    MeshIntegrals, ModelStatistics, analyze, integrate, measure,
};
