//! Pricing parameters and priced scenario type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sizing::ScenarioResult;

/// Commercial pricing parameters, supplied per pricing call.
///
/// Every field except `margin_override` is required when read from a
/// configuration file: a silently zeroed margin or tax would under-price
/// every quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PriceConfig {
    /// Global markup over cost (fraction, e.g. 0.20).
    pub margin: f64,
    /// Per-commercial markup replacing `margin` when present.
    #[serde(default)]
    pub margin_override: Option<f64>,
    /// VAT (fraction, e.g. 0.17).
    pub tax_rate: f64,
    /// Labour and mounting cost per installed kWc (₪).
    pub installation_per_kwc: f64,
    /// Fixed fees per installation (₪).
    pub fixed_fees: f64,
}

/// Pricing used when no administrator override is configured.
pub const DEFAULT_PRICE_CONFIG: PriceConfig = PriceConfig {
    margin: 0.20,
    margin_override: None,
    tax_rate: 0.17,
    installation_per_kwc: 1000.0,
    fixed_fees: 2500.0,
};

impl Default for PriceConfig {
    fn default() -> Self {
        DEFAULT_PRICE_CONFIG
    }
}

impl PriceConfig {
    /// Same configuration with a commercial's personal margin.
    ///
    /// ```
    /// use pv_quote::pricing::DEFAULT_PRICE_CONFIG;
    ///
    /// let cfg = DEFAULT_PRICE_CONFIG.with_commercial_margin(0.05);
    /// assert_eq!(cfg.effective_margin(), 0.05);
    /// assert_eq!(DEFAULT_PRICE_CONFIG.effective_margin(), 0.20);
    /// ```
    pub fn with_commercial_margin(self, margin: f64) -> Self {
        Self {
            margin_override: Some(margin),
            ..self
        }
    }

    /// Margin applied to cost: the override if set, else the global margin.
    pub fn effective_margin(&self) -> f64 {
        self.margin_override.unwrap_or(self.margin)
    }

    /// # Errors
    ///
    /// Returns [`Error::PriceConfig`] for the first invalid field.
    pub fn validate(&self) -> Result<()> {
        let non_negative = |field: &'static str, v: f64| {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(Error::price_config(field, "must be a finite number >= 0"))
            }
        };

        non_negative("margin", self.margin)?;
        if let Some(m) = self.margin_override {
            non_negative("margin_override", m)?;
        }
        non_negative("tax_rate", self.tax_rate)?;
        if self.tax_rate >= 1.0 {
            return Err(Error::price_config("tax_rate", "must be < 1"));
        }
        non_negative("installation_per_kwc", self.installation_per_kwc)?;
        non_negative("fixed_fees", self.fixed_fees)
    }
}

/// A sized scenario with its commercial price breakdown.
///
/// Only built by [`crate::pricing::price_scenarios`]; never returned to
/// public callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioWithPrice {
    #[serde(flatten)]
    scenario: ScenarioResult,
    material_cost: f64,
    installation_cost: f64,
    price_excl_tax: f64,
    price_incl_tax: f64,
    payback_years: Option<u32>,
}

impl ScenarioWithPrice {
    pub(super) fn new(
        scenario: ScenarioResult,
        material_cost: f64,
        installation_cost: f64,
        price_excl_tax: f64,
        price_incl_tax: f64,
        payback_years: Option<u32>,
    ) -> Self {
        Self {
            scenario,
            material_cost,
            installation_cost,
            price_excl_tax,
            price_incl_tax,
            payback_years,
        }
    }

    pub fn scenario(&self) -> &ScenarioResult {
        &self.scenario
    }

    /// Equipment cost from catalogue unit prices (₪).
    pub fn material_cost(&self) -> f64 {
        self.material_cost
    }

    pub fn installation_cost(&self) -> f64 {
        self.installation_cost
    }

    /// Cost plus margin, before tax (₪).
    pub fn price_excl_tax(&self) -> f64 {
        self.price_excl_tax
    }

    /// Customer-facing price, tax included (₪).
    pub fn price_incl_tax(&self) -> f64 {
        self.price_incl_tax
    }

    /// Whole years to recover the tax-inclusive price; `None` without savings.
    pub fn payback_years(&self) -> Option<u32> {
        self.payback_years
    }
}

impl AsRef<ScenarioResult> for ScenarioWithPrice {
    fn as_ref(&self) -> &ScenarioResult {
        &self.scenario
    }
}

impl fmt::Display for ScenarioWithPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<3} | material={:>10.2} ₪  install={:>9.2} ₪  HT={:>10.2} ₪  TTC={:>10.2} ₪ | payback=",
            self.scenario.id.as_str(),
            self.material_cost,
            self.installation_cost,
            self.price_excl_tax,
            self.price_incl_tax,
        )?;
        match self.payback_years {
            Some(years) => write!(f, "{years} yr"),
            None => write!(f, "n/a"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(DEFAULT_PRICE_CONFIG.validate().is_ok());
    }

    #[test]
    fn override_replaces_global_margin() {
        let cfg = DEFAULT_PRICE_CONFIG.with_commercial_margin(0.05);
        assert_eq!(cfg.effective_margin(), 0.05);
        assert_eq!(cfg.margin, DEFAULT_PRICE_CONFIG.margin);
    }

    #[test]
    fn negative_override_is_rejected() {
        let cfg = DEFAULT_PRICE_CONFIG.with_commercial_margin(-0.1);
        let err = cfg.validate().expect_err("must fail");
        assert!(matches!(err, Error::PriceConfig { field: "margin_override", .. }));
    }

    #[test]
    fn nan_margin_is_rejected() {
        let cfg = PriceConfig {
            margin: f64::NAN,
            ..DEFAULT_PRICE_CONFIG
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn full_tax_is_rejected() {
        let cfg = PriceConfig {
            tax_rate: 1.0,
            ..DEFAULT_PRICE_CONFIG
        };
        assert!(matches!(
            cfg.validate(),
            Err(Error::PriceConfig { field: "tax_rate", .. })
        ));
    }

    #[test]
    fn missing_margin_fails_to_parse() {
        let raw = r#"
tax_rate = 0.17
installation_per_kwc = 1000.0
fixed_fees = 2500.0
"#;
        let parsed: std::result::Result<PriceConfig, _> = toml::from_str(raw);
        assert!(parsed.is_err());
    }

    #[test]
    fn missing_tax_fails_to_parse() {
        let raw = r#"
margin = 0.2
installation_per_kwc = 1000.0
fixed_fees = 2500.0
"#;
        let parsed: std::result::Result<PriceConfig, _> = toml::from_str(raw);
        assert!(parsed.is_err());
    }
}
