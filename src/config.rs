//! TOML-based quote configuration, household input files, and presets.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::equipment::Catalogue;
use crate::error::Error;
use crate::pricing::PriceConfig;
use crate::sizing::{SimulationInput, SizingAssumptions};

/// Top-level configuration parsed from TOML.
///
/// Each section defaults to the standard preset when omitted. Inside a
/// `[pricing]` section, `margin` and `tax_rate` are mandatory. Load with
/// [`QuoteConfig::from_toml_file`] or use [`QuoteConfig::standard`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuoteConfig {
    /// Physical and financial calibration for sizing.
    #[serde(default)]
    pub assumptions: SizingAssumptions,
    /// Equipment available for installation, with unit costs.
    #[serde(default)]
    pub catalogue: Catalogue,
    /// Administrator pricing parameters.
    #[serde(default)]
    pub pricing: PriceConfig,
}

/// Configuration error with field path and constraint description.
#[derive(Debug, thiserror::Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"pricing.tax_rate"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<Error> for ConfigError {
    fn from(err: Error) -> Self {
        match err {
            Error::Assumption { field, reason } => {
                Self::new(format!("assumptions.{field}"), reason)
            }
            Error::PriceConfig { field, reason } => Self::new(format!("pricing.{field}"), reason),
            Error::Catalogue(message) => Self::new("catalogue", message),
            Error::InvalidInput { field, reason } => Self::new(format!("input.{field}"), reason),
            other => Self::new("config", other.to_string()),
        }
    }
}

impl QuoteConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["standard", "high_yield"];

    /// Reference calibration and catalogue.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Sunnier site with a higher-output panel.
    pub fn high_yield() -> Self {
        let mut catalogue = Catalogue::standard();
        catalogue.panel.model = "PV-650".to_string();
        catalogue.panel.watt_peak = 650.0;
        catalogue.panel.footprint_m2 = 2.8;
        catalogue.panel.unit_cost = 720.0;

        Self {
            assumptions: SizingAssumptions {
                specific_yield_kwh_per_kwc: 1800.0,
                ..SizingAssumptions::default()
            },
            catalogue,
            pricing: PriceConfig::default(),
        }
    }

    /// Loads configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "standard" => Ok(Self::standard()),
            "high_yield" => Ok(Self::high_yield()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid, contains unknown
    /// fields, or omits a mandatory pricing field.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates every section and returns the list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        [
            self.assumptions.validate(),
            self.catalogue.validate(),
            self.pricing.validate(),
        ]
        .into_iter()
        .filter_map(Result::err)
        .map(ConfigError::from)
        .collect()
    }
}

/// Loads a household's inputs from a TOML file.
///
/// Keys use the same camelCase names as the JSON API
/// (`annualConsumptionKwh`, `dayShare`, `surfaceM2`, `buyTariff`,
/// `sellTariff`). Values are validated.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, does not parse, or
/// holds out-of-range values.
pub fn load_input(path: &Path) -> Result<SimulationInput, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| {
        ConfigError::new("input", format!("cannot read \"{}\": {e}", path.display()))
    })?;
    input_from_toml_str(&content)
}

/// Parses and validates household inputs from a TOML string.
///
/// # Errors
///
/// See [`load_input`].
pub fn input_from_toml_str(s: &str) -> Result<SimulationInput, ConfigError> {
    let input: SimulationInput =
        toml::from_str(s).map_err(|e| ConfigError::new("input", e.to_string()))?;
    input.validate()?;
    Ok(input)
}
