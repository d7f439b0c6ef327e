//! Print pricing for measured models.
//!
//! Turns [`ModelStatistics`](mesh_measure::ModelStatistics) into a price:
//!
//! - [`MaterialCatalog`]: densities and per-gram prices, by [`QualityTier`]
//! - [`ShellCorrectionConfig`]: the open-top shell volume model
//! - [`estimate`]: the reducer from statistics and [`PrintSettings`] to a
//!   [`PriceEstimate`]
//!
//! Nothing here is rounded. Minimum order charges and display precision
//! belong to the caller.
//!
//! # Example
//!
//! ```
//! use mesh_measure::analyze;
//! use mesh_pricing::{MaterialCatalog, PrintSettings, QualityTier, estimate};
//! use mesh_transform::expand_indexed;
//! use mesh_types::cuboid;
//!
//! let stats = analyze(&expand_indexed(&cuboid(40.0, 40.0, 20.0)).unwrap());
//! let settings = PrintSettings::default().with_quality(QualityTier::Fine);
//!
//! let estimate = estimate(Some(&stats), &settings, &MaterialCatalog::default()).unwrap();
//! let quote = estimate.quote().unwrap();
//! assert!(quote.effective_volume_cm3 < stats.volume_cm3);
//! assert!(quote.total > 0.0);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod catalog;
mod error;
mod quote;
mod shell;

pub use catalog::{
    DEFAULT_DENSITY_G_CM3, MaterialCatalog, MaterialProfile, QualityTier, TierPrices,
};
pub use error::{PricingError, PricingResult};
pub use quote::{PriceEstimate, PrintSettings, QuoteBreakdown, VolumeSource, estimate};
pub use shell::{ShellCorrectionConfig, ShellEstimate, effective_volume_cm3, shell_estimate};
