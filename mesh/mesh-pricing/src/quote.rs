//! The pricing reducer: statistics plus settings in, a quote out.

use mesh_measure::ModelStatistics;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{MaterialCatalog, QualityTier};
use crate::error::{PricingError, PricingResult};
use crate::shell::{ShellCorrectionConfig, ShellEstimate, shell_estimate};

/// Everything the user can change without re-uploading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintSettings {
    /// Material id from the catalog.
    pub material: String,
    /// Quality tier.
    pub quality: QualityTier,
    /// Shell correction settings.
    pub shell: ShellCorrectionConfig,
    /// Number of copies, at least 1.
    pub quantity: u32,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            material: "pla-petg".to_string(),
            quality: QualityTier::Standard,
            shell: ShellCorrectionConfig::default(),
            quantity: 1,
        }
    }
}

impl PrintSettings {
    /// Set the material id.
    #[must_use]
    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = material.into();
        self
    }

    /// Set the quality tier.
    #[must_use]
    pub const fn with_quality(mut self, quality: QualityTier) -> Self {
        self.quality = quality;
        self
    }

    /// Set the shell correction settings.
    #[must_use]
    pub const fn with_shell(mut self, shell: ShellCorrectionConfig) -> Self {
        self.shell = shell;
        self
    }

    /// Set the number of copies.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Check quantity and shell settings.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidConfig`] for a zero quantity or bad
    /// shell thicknesses.
    pub fn validate(&self) -> PricingResult<()> {
        if self.quantity == 0 {
            return Err(PricingError::invalid_config("quantity must be at least 1"));
        }
        self.shell.validate()
    }
}

/// Which volume model fed the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VolumeSource {
    /// The measured signed-volume integral.
    SignedVolume,
    /// The open-top shell estimate.
    ShellCorrected,
}

/// A computed price with every intermediate step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBreakdown {
    /// Volume the price is based on, in cm³.
    pub effective_volume_cm3: f64,
    /// Where `effective_volume_cm3` came from.
    pub source: VolumeSource,
    /// Shell model details, when it was used.
    pub shell: Option<ShellEstimate>,
    /// Material id.
    pub material: String,
    /// Quality tier.
    pub quality: QualityTier,
    /// Material density in g/cm³.
    pub density_g_cm3: f64,
    /// Weight of one copy in grams.
    pub weight_g: f64,
    /// Price per gram for the material and tier.
    pub price_per_gram: f64,
    /// Price of one copy.
    pub unit_price: f64,
    /// Number of copies.
    pub quantity: u32,
    /// `unit_price * quantity`. Not rounded.
    pub total: f64,
    /// Currency code.
    pub currency: String,
}

/// Result of [`estimate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum PriceEstimate {
    /// Nothing measured yet, or the volume is zero. A UI state, not an error.
    NotComputable,
    /// A price.
    Quoted(QuoteBreakdown),
}

impl PriceEstimate {
    /// The breakdown, if a price was computed.
    #[must_use]
    pub const fn quote(&self) -> Option<&QuoteBreakdown> {
        match self {
            Self::NotComputable => None,
            Self::Quoted(q) => Some(q),
        }
    }

    /// The total price, if one was computed.
    #[must_use]
    pub fn total(&self) -> Option<f64> {
        self.quote().map(|q| q.total)
    }
}

/// Price a measured model.
///
/// A pure function: re-run it on every settings change, the model is never
/// re-parsed. `stats` is `None` until a model has been measured.
///
/// price = effective volume × density × price per gram, times quantity.
///
/// # Example
///
/// ```
/// use mesh_measure::ModelStatistics;
/// use mesh_pricing::{
///     MaterialCatalog, PriceEstimate, PrintSettings, ShellCorrectionConfig, estimate,
/// };
///
/// let catalog = MaterialCatalog::default();
/// let settings = PrintSettings::default().with_shell(ShellCorrectionConfig::disabled());
///
/// let stats = ModelStatistics { volume_cm3: 10.0, ..ModelStatistics::default() };
/// let quote = estimate(Some(&stats), &settings, &catalog).unwrap();
/// // 10 cm³ × 1.255 g/cm³ × 0.55 /g
/// assert!((quote.total().unwrap() - 6.9025).abs() < 1e-9);
///
/// assert_eq!(
///     estimate(None, &settings, &catalog).unwrap(),
///     PriceEstimate::NotComputable
/// );
/// ```
///
/// # Errors
///
/// - [`PricingError::UnknownMaterial`] if the material is not in `catalog`
/// - [`PricingError::InvalidConfig`] if `settings` fail validation
pub fn estimate(
    stats: Option<&ModelStatistics>,
    settings: &PrintSettings,
    catalog: &MaterialCatalog,
) -> PricingResult<PriceEstimate> {
    settings.validate()?;
    let material = catalog.get(&settings.material)?;

    let Some(stats) = stats else {
        return Ok(PriceEstimate::NotComputable);
    };

    let (effective_volume_cm3, source, shell) = if settings.shell.enabled {
        let shell = shell_estimate(stats, &settings.shell);
        (
            shell.effective_volume_cm3,
            VolumeSource::ShellCorrected,
            Some(shell),
        )
    } else {
        (stats.volume_cm3, VolumeSource::SignedVolume, None)
    };

    if effective_volume_cm3.is_nan() || effective_volume_cm3 <= 0.0 {
        debug!(effective_volume_cm3, "no volume to price");
        return Ok(PriceEstimate::NotComputable);
    }

    let density_g_cm3 = material.density_g_cm3;
    let price_per_gram = material.price_per_gram.get(settings.quality);
    let weight_g = effective_volume_cm3 * density_g_cm3;
    let unit_price = weight_g * price_per_gram;
    let total = unit_price * f64::from(settings.quantity);

    debug!(
        material = %material.id,
        quality = %settings.quality,
        ?source,
        effective_volume_cm3,
        weight_g,
        total,
        "priced model"
    );

    Ok(PriceEstimate::Quoted(QuoteBreakdown {
        effective_volume_cm3,
        source,
        shell,
        material: material.id.clone(),
        quality: settings.quality,
        density_g_cm3,
        weight_g,
        price_per_gram,
        unit_price,
        quantity: settings.quantity,
        total,
        currency: catalog.currency.clone(),
    }))
}
