//! Error types for pricing.

use thiserror::Error;

/// Result type for pricing operations.
pub type PricingResult<T> = Result<T, PricingError>;

/// Errors that can occur while configuring or computing a quote.
#[derive(Debug, Error)]
pub enum PricingError {
    /// The requested material id is not in the catalog.
    #[error("unknown material: {id}")]
    UnknownMaterial {
        /// The id that was looked up.
        id: String,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// What was wrong.
        message: String,
    },

    /// A catalog document could not be decoded.
    #[error("invalid material catalog: {0}")]
    Catalog(#[from] serde_json::Error),

    /// A catalog file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PricingError {
    /// Create an `InvalidConfig` error with the given message.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
