//! Volume, surface area and bounding-box statistics for a flat triangle mesh.
//!
//! Coordinates are taken as millimeters and results are reported in
//! centimeter units: cm³ for volumes, cm² for area, cm for lengths.

use mesh_types::{MeshTopology, TriangleMesh};
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dimensions::dimensions;

/// Cubic millimeters per cubic centimeter.
pub const MM3_PER_CM3: f64 = 1000.0;

/// Square millimeters per square centimeter.
pub const MM2_PER_CM2: f64 = 100.0;

/// Millimeters per centimeter.
pub const MM_PER_CM: f64 = 10.0;

/// Bounding-box extents in centimeters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DimensionsCm {
    /// Extent along X.
    pub x: f64,
    /// Extent along Y.
    pub y: f64,
    /// Extent along Z.
    pub z: f64,
}

/// Measurements of one uploaded model.
///
/// All fields are non-negative. `volume_cm3` is the magnitude of the
/// signed-volume integral; it is exact only for closed, consistently wound
/// meshes (see [`MeasurementAdvisory::OpenMeshBias`]).
///
/// Serializes with camelCase keys (`volumeCm3`, `surfaceAreaCm2`,
/// `bboxVolumeCm3`, `polygons`, `dimensionsCm`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ModelStatistics {
    /// Enclosed volume in cm³.
    pub volume_cm3: f64,
    /// Total surface area in cm².
    pub surface_area_cm2: f64,
    /// Volume of the axis-aligned bounding box in cm³.
    pub bbox_volume_cm3: f64,
    /// Number of triangles.
    pub polygons: usize,
    /// Bounding-box extents in cm.
    pub dimensions_cm: DimensionsCm,
}

impl ModelStatistics {
    /// Bounding-box extents converted back to millimeters.
    #[must_use]
    pub fn dimensions_mm(&self) -> [f64; 3] {
        [
            self.dimensions_cm.x * MM_PER_CM,
            self.dimensions_cm.y * MM_PER_CM,
            self.dimensions_cm.z * MM_PER_CM,
        ]
    }
}

/// Raw integrals over a triangle set, in source units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeshIntegrals {
    /// Sum of per-triangle signed tetrahedron volumes (mm³). Negative for
    /// inward-wound surfaces.
    pub signed_volume: f64,
    /// Sum of triangle areas (mm²).
    pub surface_area: f64,
}

/// Integrate signed volume and area over every triangle.
///
/// Degenerate triangles contribute zero to both sums.
#[must_use]
pub fn integrate(mesh: &TriangleMesh) -> MeshIntegrals {
    mesh.triangles()
        .fold(MeshIntegrals::default(), |acc, tri| MeshIntegrals {
            signed_volume: acc.signed_volume + tri.signed_volume(),
            surface_area: acc.surface_area + tri.area(),
        })
}

/// Advisory notes attached to a measurement. These are not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum MeasurementAdvisory {
    /// The signed-volume integral underestimates open or non-manifold
    /// meshes. Always attached: closedness is not checked.
    OpenMeshBias,
    /// The integral came out negative, meaning the faces are wound inward.
    /// The reported volume is its magnitude.
    InvertedWinding,
}

impl MeasurementAdvisory {
    /// Short user-facing disclaimer.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::OpenMeshBias => {
                "Volume is computed from the surface and may be 5-15% lower than the \
                 material actually needed for open or non-watertight models."
            }
            Self::InvertedWinding => {
                "The model's faces point inward; the volume shown is its absolute value."
            }
        }
    }
}

/// Statistics plus the advisories that qualify them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Measurement {
    /// The measured statistics.
    pub statistics: ModelStatistics,
    /// Notes about the reliability of `statistics`.
    pub advisories: Vec<MeasurementAdvisory>,
}

/// Compute [`ModelStatistics`] for a flat triangle mesh.
///
/// A pure function of the triangle data. Zero triangles yield all-zero
/// statistics.
///
/// # Example
///
/// ```
/// use mesh_measure::analyze;
/// use mesh_transform::expand_indexed;
/// use mesh_types::cuboid;
///
/// let mesh = expand_indexed(&cuboid(10.0, 10.0, 10.0)).unwrap();
/// let stats = analyze(&mesh);
///
/// assert_eq!(stats.polygons, 12);
/// assert!((stats.volume_cm3 - 1.0).abs() < 1e-9);
/// assert!((stats.surface_area_cm2 - 6.0).abs() < 1e-9);
/// assert!((stats.dimensions_cm.z - 1.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn analyze(mesh: &TriangleMesh) -> ModelStatistics {
    measure(mesh).statistics
}

/// Compute statistics and advisories for a flat triangle mesh.
#[must_use]
pub fn measure(mesh: &TriangleMesh) -> Measurement {
    let polygons = mesh.vertex_count() / 3;
    if polygons == 0 {
        return Measurement {
            statistics: ModelStatistics::default(),
            advisories: Vec::new(),
        };
    }

    let integrals = integrate(mesh);
    let dims = dimensions(mesh);

    let statistics = ModelStatistics {
        volume_cm3: integrals.signed_volume.abs() / MM3_PER_CM3,
        surface_area_cm2: integrals.surface_area / MM2_PER_CM2,
        bbox_volume_cm3: dims.bounding_volume() / MM3_PER_CM3,
        polygons,
        dimensions_cm: dims.to_cm(),
    };

    let mut advisories = vec![MeasurementAdvisory::OpenMeshBias];
    if integrals.signed_volume < 0.0 {
        warn!(
            signed_volume_mm3 = integrals.signed_volume,
            "negative signed volume; faces are wound inward"
        );
        advisories.push(MeasurementAdvisory::InvertedWinding);
    }

    debug!(
        polygons,
        volume_cm3 = statistics.volume_cm3,
        surface_area_cm2 = statistics.surface_area_cm2,
        bbox_volume_cm3 = statistics.bbox_volume_cm3,
        "measured model"
    );

    Measurement {
        statistics,
        advisories,
    }
}
