//! Pricing transform layered on top of the sizing engine.

use tracing::debug;

use super::types::{PriceConfig, ScenarioWithPrice};
use crate::EPSILON;
use crate::equipment::{Catalogue, EquipmentSet};
use crate::error::{Error, Result};
use crate::sizing::ScenarioResult;

/// Attaches cost, margin, tax, and payback to each scenario.
///
/// Order-preserving and idempotent: identifiers, statuses, and energy
/// figures are copied untouched, and pricing an already priced scenario
/// recomputes from its sizing, never from previous prices.
///
/// Must only be reached from authenticated commercial code paths.
///
/// # Arguments
///
/// * `scenarios` - Sized scenarios, in presentation order
/// * `catalogue` - Unit costs for every model the scenarios name
/// * `config` - Margin, tax and installation rates
///
/// # Returns
///
/// One priced scenario per input, in the same order.
///
/// # Errors
///
/// Returns [`Error::PriceConfig`] for an invalid configuration and
/// [`Error::UnknownProduct`] when a scenario names equipment missing from
/// `catalogue`.
pub fn price_scenarios<S: AsRef<ScenarioResult>>(
    scenarios: &[S],
    catalogue: &Catalogue,
    config: &PriceConfig,
) -> Result<Vec<ScenarioWithPrice>> {
    config.validate()?;
    let margin = config.effective_margin();

    scenarios
        .iter()
        .map(|s| {
            let scenario = s.as_ref();
            let material = material_cost(&scenario.equipment, catalogue)?;
            let installation = installation_cost(scenario.installed_kwc, config);
            let (excl_tax, incl_tax) = sale_price(material + installation, margin, config.tax_rate);
            let payback = payback_years(incl_tax, scenario.annual_savings);

            debug!(scenario = %scenario.id, margin, ?payback, "priced scenario");

            Ok(ScenarioWithPrice::new(
                scenario.clone(),
                material,
                installation,
                excl_tax,
                incl_tax,
                payback,
            ))
        })
        .collect()
}

/// Catalogue cost of panels, inverters, and batteries (₪).
///
/// # Errors
///
/// Returns [`Error::UnknownProduct`] for a model missing from `catalogue`.
pub fn material_cost(equipment: &EquipmentSet, catalogue: &Catalogue) -> Result<f64> {
    let cost_of = |model: &str, quantity: u32| -> Result<f64> {
        if quantity == 0 {
            return Ok(0.0);
        }
        catalogue
            .unit_cost(model)
            .map(|unit| unit * f64::from(quantity))
            .ok_or_else(|| Error::UnknownProduct(model.to_string()))
    };

    let mut total = cost_of(&equipment.panel_model, equipment.panel_count)?;
    if let Some(inv) = &equipment.inverter {
        total += cost_of(&inv.model, inv.quantity)?;
    }
    if let Some(bat) = &equipment.battery {
        total += cost_of(&bat.model, bat.quantity)?;
    }
    Ok(total)
}

/// Per-kWc labour plus fixed fees (₪).
pub fn installation_cost(installed_kwc: f64, config: &PriceConfig) -> f64 {
    installed_kwc * config.installation_per_kwc + config.fixed_fees
}

/// Returns `(price excluding tax, price including tax)` for a cost.
///
/// ```
/// use pv_quote::pricing::engine::sale_price;
///
/// let (ht, ttc) = sale_price(50_000.0, 0.05, 0.17);
/// assert!((ht - 52_500.0).abs() < 1e-6);
/// assert!((ttc - 61_425.0).abs() < 1e-6);
/// ```
pub fn sale_price(cost: f64, margin: f64, tax_rate: f64) -> (f64, f64) {
    let excl_tax = cost * (1.0 + margin);
    (excl_tax, excl_tax * (1.0 + tax_rate))
}

/// Whole years for savings to cover the price, rounded up.
///
/// A partial year counts as not yet recovered. Scenarios without savings
/// never pay back.
pub fn payback_years(price_incl_tax: f64, annual_savings: f64) -> Option<u32> {
    if annual_savings <= EPSILON {
        return None;
    }
    let years = (price_incl_tax / annual_savings - EPSILON).ceil().max(0.0);
    Some(years as u32)
}
