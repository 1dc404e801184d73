//! Calibration constants for the sizing engine.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Physical and financial assumptions shared by every scenario.
///
/// These are calibration parameters, not user data: the default values
/// describe a south-facing residential roof in the Israeli market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizingAssumptions {
    /// Yearly energy produced per installed kWc (kWh/kWc/year).
    pub specific_yield_kwh_per_kwc: f64,
    /// Yearly tariff growth applied to savings projections (fraction).
    pub inflation_rate: f64,
    /// Length of the savings projection (years).
    pub projection_years: u32,
    /// Extra production targeted by resale scenarios, as a fraction of
    /// annual consumption.
    pub resale_share: f64,
    /// Storage per kWh of average daily night consumption.
    pub battery_night_ratio: f64,
}

impl Default for SizingAssumptions {
    fn default() -> Self {
        Self {
            specific_yield_kwh_per_kwc: 1650.0,
            inflation_rate: 0.015,
            projection_years: 20,
            resale_share: 0.5,
            battery_night_ratio: 1.0,
        }
    }
}

impl SizingAssumptions {
    /// # Errors
    ///
    /// Returns [`Error::Assumption`] for the first out-of-range field.
    pub fn validate(&self) -> Result<()> {
        let invalid = |field: &'static str, reason: &str| Error::Assumption {
            field,
            reason: reason.to_string(),
        };

        if !(self.specific_yield_kwh_per_kwc.is_finite() && self.specific_yield_kwh_per_kwc > 0.0) {
            return Err(invalid("specific_yield_kwh_per_kwc", "must be > 0"));
        }
        if !(self.inflation_rate.is_finite() && self.inflation_rate > -1.0) {
            return Err(invalid("inflation_rate", "must be > -1"));
        }
        if self.projection_years == 0 {
            return Err(invalid("projection_years", "must be > 0"));
        }
        if !(self.resale_share.is_finite() && self.resale_share >= 0.0) {
            return Err(invalid("resale_share", "must be >= 0"));
        }
        if !(self.battery_night_ratio.is_finite() && self.battery_night_ratio > 0.0) {
            return Err(invalid("battery_night_ratio", "must be > 0"));
        }
        Ok(())
    }
}
