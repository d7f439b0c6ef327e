//! Bounding-box extents of a model, in millimeters.

use mesh_types::MeshBounds;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::statistics::{DimensionsCm, MM_PER_CM};

/// Width, depth and height of a model's axis-aligned bounding box.
///
/// Measured in the model's native frame: a rotated part reports the
/// extents of its rotated box, not its tightest fit.
///
/// # Example
///
/// ```
/// use mesh_types::cuboid;
/// use mesh_measure::dimensions;
///
/// let dims = dimensions(&cuboid(20.0, 10.0, 5.0));
///
/// assert!((dims.depth - 10.0).abs() < 1e-10);
/// assert!((dims.bounding_volume() - 1000.0).abs() < 1e-10);
/// assert!((dims.to_cm().x - 2.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dimensions {
    /// Extent along X.
    pub width: f64,
    /// Extent along Y.
    pub depth: f64,
    /// Extent along Z.
    pub height: f64,
}

impl Dimensions {
    /// Volume of the bounding box in mm³.
    #[must_use]
    pub fn bounding_volume(&self) -> f64 {
        self.width * self.depth * self.height
    }

    /// Same extents in centimeters.
    #[must_use]
    pub fn to_cm(&self) -> DimensionsCm {
        DimensionsCm {
            x: self.width / MM_PER_CM,
            y: self.depth / MM_PER_CM,
            z: self.height / MM_PER_CM,
        }
    }
}

/// Measure the bounding box of any mesh, flat or indexed.
///
/// An empty mesh has all-zero dimensions.
#[must_use]
pub fn dimensions<M: MeshBounds>(mesh: &M) -> Dimensions {
    mesh.bounds_opt().map_or_else(Dimensions::default, |bounds| {
        let extents = bounds.extents();
        Dimensions {
            width: extents.x,
            depth: extents.y,
            height: extents.z,
        }
    })
}
