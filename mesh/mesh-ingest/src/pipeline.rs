//! The synchronous pipeline: bytes to mesh to statistics.

use mesh_io::{MeshFormat, parse_mesh};
use mesh_measure::{Measurement, ModelStatistics, measure};
use mesh_pricing::{MaterialCatalog, PriceEstimate, PrintSettings, estimate};
use mesh_types::TriangleMesh;
use tracing::info;

use crate::error::IngestResult;

/// A parsed and measured upload.
///
/// Owns the flat mesh and its statistics for as long as the file stays
/// selected. Pricing borrows the statistics; it never touches the mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedModel {
    /// Name the file was uploaded under.
    pub file_name: String,
    /// Format detected from the name.
    pub format: MeshFormat,
    /// World-space triangles, as measured.
    pub mesh: TriangleMesh,
    /// Statistics and advisories.
    pub measurement: Measurement,
}

impl AnalyzedModel {
    /// The measured statistics.
    #[must_use]
    pub const fn statistics(&self) -> &ModelStatistics {
        &self.measurement.statistics
    }

    /// Price this model. Cheap; call on every settings change.
    ///
    /// # Errors
    ///
    /// Any [`PricingError`](mesh_pricing::PricingError) from [`estimate`].
    pub fn quote(
        &self,
        settings: &PrintSettings,
        catalog: &MaterialCatalog,
    ) -> IngestResult<PriceEstimate> {
        Ok(estimate(Some(self.statistics()), settings, catalog)?)
    }

    /// A copy of the mesh centered on its bounding box, for display.
    /// Statistics are always taken from the uncentered mesh.
    #[must_use]
    pub fn centered_mesh(&self) -> TriangleMesh {
        self.mesh.centered()
    }
}

/// Parse and measure an uploaded file held in memory.
///
/// # Example
///
/// ```
/// use mesh_ingest::ingest_bytes;
///
/// let obj = b"v 0 0 0\nv 10 0 0\nv 0 10 0\nv 0 0 10\nf 1 3 2\nf 1 2 4\nf 1 4 3\nf 2 3 4\n";
/// let model = ingest_bytes("tetra.obj", obj).unwrap();
///
/// assert_eq!(model.statistics().polygons, 4);
/// assert!((model.statistics().volume_cm3 - 1000.0 / 6.0 / 1000.0).abs() < 1e-12);
/// ```
///
/// # Errors
///
/// [`IngestError::Mesh`](crate::IngestError::Mesh) for an unsupported
/// extension or undecodable content.
pub fn ingest_bytes(file_name: &str, bytes: &[u8]) -> IngestResult<AnalyzedModel> {
    let format = MeshFormat::from_file_name(file_name)?;
    analyze_bytes(file_name, format, bytes)
}

pub(crate) fn analyze_bytes(
    file_name: &str,
    format: MeshFormat,
    bytes: &[u8],
) -> IngestResult<AnalyzedModel> {
    let mesh = parse_mesh(bytes, format)?;
    let measurement = measure(&mesh);

    info!(
        file_name,
        polygons = measurement.statistics.polygons,
        volume_cm3 = measurement.statistics.volume_cm3,
        "analyzed upload"
    );

    Ok(AnalyzedModel {
        file_name: file_name.to_string(),
        format,
        mesh,
        measurement,
    })
}
