//! Materials, print quality tiers and the price list.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PricingError, PricingResult};

/// Density assumed for a catalog entry that does not state one (g/cm³).
pub const DEFAULT_DENSITY_G_CM3: f64 = 1.24;

/// Print quality tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    /// 0.2 mm layers.
    #[default]
    Standard,
    /// 0.1 mm layers.
    Fine,
}

impl QualityTier {
    /// All tiers, coarsest first.
    pub const ALL: [Self; 2] = [Self::Standard, Self::Fine];

    /// Get the identifier used in catalogs and on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Fine => "fine",
        }
    }

    /// Nominal layer height in mm.
    #[must_use]
    pub const fn layer_height_mm(&self) -> f64 {
        match self {
            Self::Standard => 0.2,
            Self::Fine => 0.1,
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityTier {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PricingError::invalid_config(format!("unknown quality tier: {s}")))
    }
}

/// Price per gram for each quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierPrices {
    /// Price per gram at standard quality.
    pub standard: f64,
    /// Price per gram at fine quality.
    pub fine: f64,
}

impl TierPrices {
    /// Look up the price per gram for a tier.
    #[must_use]
    pub const fn get(&self, tier: QualityTier) -> f64 {
        match tier {
            QualityTier::Standard => self.standard,
            QualityTier::Fine => self.fine,
        }
    }
}

/// One printable material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialProfile {
    /// Stable identifier, e.g. `pla-petg`.
    pub id: String,
    /// Display name, e.g. `PLA / PETG`.
    pub name: String,
    /// Density in g/cm³.
    #[serde(default = "default_density")]
    pub density_g_cm3: f64,
    /// Price per gram by quality tier.
    pub price_per_gram: TierPrices,
}

const fn default_density() -> f64 {
    DEFAULT_DENSITY_G_CM3
}

impl MaterialProfile {
    /// Create a profile.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        density_g_cm3: f64,
        standard: f64,
        fine: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            density_g_cm3,
            price_per_gram: TierPrices { standard, fine },
        }
    }

    fn validate(&self) -> PricingResult<()> {
        if !(self.density_g_cm3.is_finite() && self.density_g_cm3 > 0.0) {
            return Err(PricingError::invalid_config(format!(
                "material {}: density must be positive, got {}",
                self.id, self.density_g_cm3
            )));
        }
        for tier in QualityTier::ALL {
            let price = self.price_per_gram.get(tier);
            if !(price.is_finite() && price >= 0.0) {
                return Err(PricingError::invalid_config(format!(
                    "material {}: {tier} price must be non-negative, got {price}",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

/// The price list: every material that can be quoted.
///
/// # Example
///
/// ```
/// use mesh_pricing::{MaterialCatalog, QualityTier};
///
/// let catalog = MaterialCatalog::default();
/// let pla = catalog.get("pla-petg").unwrap();
///
/// assert_eq!(pla.density_g_cm3, 1.255);
/// assert_eq!(pla.price_per_gram.get(QualityTier::Fine), 0.75);
/// assert!(catalog.get("unobtainium").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCatalog {
    /// Currency code the prices are in.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Materials, in display order.
    pub materials: Vec<MaterialProfile>,
}

fn default_currency() -> String {
    "AUD".to_string()
}

impl Default for MaterialCatalog {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            materials: vec![
                MaterialProfile::new("pla-petg", "PLA / PETG", 1.255, 0.55, 0.75),
                MaterialProfile::new("asa-abs", "ASA / ABS", 1.055, 0.65, 0.85),
                MaterialProfile::new("tpu", "TPU", 1.21, 0.75, 0.95),
                MaterialProfile::new("nylon-cf", "Nylon / CF-Nylon", 1.22, 0.90, 1.10),
            ],
        }
    }
}

impl MaterialCatalog {
    /// Create a catalog from profiles, validating them.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidConfig`] if the catalog is empty, an
    /// id repeats, a density is not positive, or a price is negative.
    pub fn new(currency: impl Into<String>, materials: Vec<MaterialProfile>) -> PricingResult<Self> {
        let catalog = Self {
            currency: currency.into(),
            materials,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse and validate a JSON catalog.
    ///
    /// ```
    /// use mesh_pricing::MaterialCatalog;
    ///
    /// let json = r#"{
    ///     "currency": "USD",
    ///     "materials": [
    ///         { "id": "pla", "name": "PLA", "pricePerGram": { "standard": 0.55, "fine": 0.75 } }
    ///     ]
    /// }"#;
    /// let catalog = MaterialCatalog::from_json_str(json).unwrap();
    ///
    /// // Missing densities fall back to 1.24 g/cm³
    /// assert_eq!(catalog.get("pla").unwrap().density_g_cm3, 1.24);
    /// ```
    ///
    /// # Errors
    ///
    /// [`PricingError::Catalog`] for malformed JSON, or any validation error
    /// from [`MaterialCatalog::new`].
    pub fn from_json_str(json: &str) -> PricingResult<Self> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read, parse and validate a JSON catalog file.
    ///
    /// # Errors
    ///
    /// [`PricingError::Io`] if the file cannot be read, otherwise as
    /// [`MaterialCatalog::from_json_str`].
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> PricingResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Look up a material by id.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::UnknownMaterial`] if no profile has that id.
    pub fn get(&self, id: &str) -> PricingResult<&MaterialProfile> {
        self.materials
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| PricingError::UnknownMaterial { id: id.to_string() })
    }

    /// Iterate over material ids in display order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.materials.iter().map(|m| m.id.as_str())
    }

    /// Check every profile and the catalog as a whole.
    ///
    /// # Errors
    ///
    /// See [`MaterialCatalog::new`].
    pub fn validate(&self) -> PricingResult<()> {
        if self.materials.is_empty() {
            return Err(PricingError::invalid_config("catalog has no materials"));
        }
        for (i, material) in self.materials.iter().enumerate() {
            material.validate()?;
            if self.materials[..i].iter().any(|m| m.id == material.id) {
                return Err(PricingError::invalid_config(format!(
                    "duplicate material id: {}",
                    material.id
                )));
            }
        }
        Ok(())
    }
}
