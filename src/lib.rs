//! Photovoltaic sizing and pricing engine for residential solar quotes.
//!
//! [`sizing::calculate_simulation`] turns a household's consumption and roof
//! surface into five installation scenarios with savings projections.
//! [`pricing::price_scenarios`] layers cost, margin, and tax on top for
//! authenticated commercial use.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod equipment;
pub mod error;
pub mod io;
pub mod pricing;
pub mod sizing;

pub use error::{Error, Result};

/// Tolerance for rounding panel counts and comparing surfaces.
pub(crate) const EPSILON: f64 = 1e-9;
