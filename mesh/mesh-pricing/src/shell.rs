//! Open-top shell approximation of printed material volume.
//!
//! The bounding box is treated as a thin-walled container open on its top
//! face: four side walls of `wall_thickness_mm` and a floor of
//! `bottom_thickness_mm`. The material volume is the box volume minus the
//! cavity. This is a quick estimate from the box alone; it does not look at
//! the mesh's actual holes.

use mesh_measure::{MM3_PER_CM3, ModelStatistics};
use serde::{Deserialize, Serialize};

use crate::error::{PricingError, PricingResult};

/// Shell correction settings.
///
/// # Example
///
/// ```
/// use mesh_pricing::ShellCorrectionConfig;
///
/// let config = ShellCorrectionConfig::default()
///     .with_wall_thickness(2.0)
///     .with_bottom_thickness(2.0);
///
/// assert!(config.enabled);
/// assert!(config.validate().is_ok());
/// assert!(!ShellCorrectionConfig::disabled().enabled);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellCorrectionConfig {
    /// Whether the shell model replaces the measured volume.
    pub enabled: bool,
    /// Thickness of each of the four side walls, in mm.
    pub wall_thickness_mm: f64,
    /// Thickness of the floor, in mm. The top is open.
    pub bottom_thickness_mm: f64,
}

impl Default for ShellCorrectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            wall_thickness_mm: 2.2,
            bottom_thickness_mm: 2.4,
        }
    }
}

impl ShellCorrectionConfig {
    /// Default thicknesses with correction switched off.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Set whether correction is applied.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the side wall thickness in mm.
    #[must_use]
    pub const fn with_wall_thickness(mut self, mm: f64) -> Self {
        self.wall_thickness_mm = mm;
        self
    }

    /// Set the floor thickness in mm.
    #[must_use]
    pub const fn with_bottom_thickness(mut self, mm: f64) -> Self {
        self.bottom_thickness_mm = mm;
        self
    }

    /// Check that both thicknesses are finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidConfig`] naming the offending value.
    pub fn validate(&self) -> PricingResult<()> {
        for (what, value) in [
            ("wall thickness", self.wall_thickness_mm),
            ("bottom thickness", self.bottom_thickness_mm),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(PricingError::invalid_config(format!(
                    "{what} must be a non-negative number of mm, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// The shell model's intermediate values, for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellEstimate {
    /// Bounding-box volume in cm³.
    pub outer_volume_cm3: f64,
    /// Cavity volume in cm³.
    pub inner_volume_cm3: f64,
    /// `max(outer - inner, 0)` in cm³.
    pub effective_volume_cm3: f64,
    /// Cavity extents in mm, each clamped at zero.
    pub inner_dimensions_mm: [f64; 3],
}

/// Apply the shell model to measured statistics.
///
/// Ignores `config.enabled`; callers decide whether to use the result.
///
/// # Example
///
/// ```
/// use mesh_measure::{DimensionsCm, ModelStatistics};
/// use mesh_pricing::{ShellCorrectionConfig, shell_estimate};
///
/// let stats = ModelStatistics {
///     dimensions_cm: DimensionsCm { x: 10.0, y: 10.0, z: 10.0 },
///     ..ModelStatistics::default()
/// };
/// let config = ShellCorrectionConfig::default()
///     .with_wall_thickness(2.0)
///     .with_bottom_thickness(2.0);
///
/// let shell = shell_estimate(&stats, &config);
/// assert!((shell.effective_volume_cm3 - 96.832).abs() < 1e-9);
/// assert_eq!(shell.inner_dimensions_mm, [96.0, 96.0, 98.0]);
/// ```
#[must_use]
pub fn shell_estimate(stats: &ModelStatistics, config: &ShellCorrectionConfig) -> ShellEstimate {
    let [x, y, z] = stats.dimensions_mm();
    let wall = config.wall_thickness_mm;

    let inner = [
        (x - 2.0 * wall).max(0.0),
        (y - 2.0 * wall).max(0.0),
        (z - config.bottom_thickness_mm).max(0.0),
    ];

    let outer_mm3 = x * y * z;
    let inner_mm3 = inner[0] * inner[1] * inner[2];

    ShellEstimate {
        outer_volume_cm3: outer_mm3 / MM3_PER_CM3,
        inner_volume_cm3: inner_mm3 / MM3_PER_CM3,
        effective_volume_cm3: (outer_mm3 - inner_mm3).max(0.0) / MM3_PER_CM3,
        inner_dimensions_mm: inner,
    }
}

/// Volume fed to pricing: the shell estimate when enabled, otherwise the
/// measured volume.
#[must_use]
pub fn effective_volume_cm3(stats: &ModelStatistics, config: &ShellCorrectionConfig) -> f64 {
    if config.enabled {
        shell_estimate(stats, config).effective_volume_cm3
    } else {
        stats.volume_cm3
    }
}
