//! Error types shared by the sizing and pricing engines.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A household input violates the caller contract.
    #[error("invalid input `{field}`: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// The equipment catalogue cannot support sizing.
    #[error("catalogue error: {0}")]
    Catalogue(String),

    /// A sizing assumption is out of range.
    #[error("invalid sizing assumption `{field}`: {reason}")]
    Assumption { field: &'static str, reason: String },

    /// A pricing parameter is missing or out of range.
    #[error("invalid price config `{field}`: {reason}")]
    PriceConfig { field: &'static str, reason: String },

    /// A sized scenario references a model absent from the catalogue.
    #[error("unknown product `{0}` in catalogue")]
    UnknownProduct(String),
}

impl Error {
    pub(crate) fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn price_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::PriceConfig {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
