//! Model ingestion, measurement and print pricing.
//!
//! This umbrella crate re-exports the mesh-* crates that take an uploaded
//! STL or OBJ file to a print quote:
//!
//! ```text
//! bytes ──io──▶ SceneNode ──transform──▶ TriangleMesh ──measure──▶ ModelStatistics
//!                                                                        │
//!                                         PrintSettings ──pricing──▶ PriceEstimate
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use mesh::prelude::*;
//!
//! let mesh = mesh::io::load_mesh("model.stl").unwrap();
//! let stats = analyze(&mesh);
//!
//! let settings = PrintSettings::default().with_material("asa-abs");
//! let estimate = estimate(Some(&stats), &settings, &MaterialCatalog::default()).unwrap();
//! if let Some(quote) = estimate.quote() {
//!     println!("{:.2} {}", quote.total, quote.currency);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - Flat and indexed meshes, triangles, bounding boxes
//! - [`transform`] - Affine transforms, scene trees, flattening
//! - [`io`] - STL and OBJ decoding
//! - [`measure`] - Volume, surface area and bounding-box statistics
//! - [`pricing`] - Material catalog, shell correction, quotes
//! - [`ingest`] - Upload pipeline and last-file-wins session
//!
//! # Feature Flags
//!
//! - `serde` - Serialize meshes and statistics

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![doc(html_root_url = "https://docs.rs/mesh/0.7.0")]

// =============================================================================
// Re-exports
// =============================================================================

/// Flat and indexed meshes, triangles, bounding boxes.
pub use mesh_types as types;

/// Affine transforms, scene trees, flattening.
pub use mesh_transform as transform;

/// STL and OBJ decoding.
pub use mesh_io as io;

/// Volume, surface area and bounding-box statistics.
pub use mesh_measure as measure;

/// Material catalog, shell correction, quotes.
pub use mesh_pricing as pricing;

/// Upload pipeline and last-file-wins session.
pub use mesh_ingest as ingest;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for quoting a model.
///
/// # Usage
///
/// ```
/// use mesh::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use mesh_types::{Aabb, IndexedMesh, MeshBounds, MeshTopology, Triangle, TriangleMesh};

    // I/O
    pub use mesh_io::{MeshFormat, load_mesh, parse_mesh, parse_upload};

    // Measurement
    pub use mesh_measure::{ModelStatistics, analyze, measure};

    // Pricing
    pub use mesh_pricing::{
        MaterialCatalog, PriceEstimate, PrintSettings, QualityTier, ShellCorrectionConfig,
        estimate,
    };

    // Session
    pub use mesh_ingest::{IngestState, UploadSession, ingest_bytes};
}

// =============================================================================
// Tests
// =============================================================================
