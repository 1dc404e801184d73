//! Sizing engine: runs every scenario and assembles the result set.

use tracing::{info, warn};

use super::assumptions::SizingAssumptions;
use super::scenario::size_scenario;
use super::selection::{select_best, summarize_feasibility};
use super::types::{ScenarioId, ScenarioResult, SimulationInput, SimulationResult};
use crate::equipment::Catalogue;
use crate::error::Result;

/// Tolerance used to decide that two scenarios carry the same figures.
const SAME_OUTCOME_TOLERANCE: f64 = 1e-6;

/// Sizes all scenarios for a household and picks the best one.
///
/// Pure and deterministic: identical inputs give identical results, and the
/// output never contains cost data.
///
/// # Arguments
///
/// * `input` - Household consumption, roof surface and tariffs
/// * `catalogue` - Equipment available for the arrays
/// * `assumptions` - Yield, inflation and resale parameters
///
/// # Returns
///
/// Every scenario in `A, B, C, D, D-2` order, the best one, and the
/// feasibility summary.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidInput`] for inputs outside the engine's
/// domain, or a catalogue/assumption error when the injected configuration
/// cannot size every scenario.
///
/// # Examples
///
/// ```
/// use pv_quote::equipment::Catalogue;
/// use pv_quote::sizing::{SimulationInput, SizingAssumptions, calculate_simulation};
///
/// let input = SimulationInput {
///     annual_consumption_kwh: 12_000.0,
///     day_share_pct: 50.0,
///     surface_m2: 50.0,
///     buy_tariff: 0.64,
///     sell_tariff: 0.54,
/// };
/// let result = calculate_simulation(&input, &Catalogue::standard(), &SizingAssumptions::default())
///     .expect("valid input");
/// assert_eq!(result.scenarios.len(), 5);
/// assert!(result.best().is_some());
/// ```
pub fn calculate_simulation(
    input: &SimulationInput,
    catalogue: &Catalogue,
    assumptions: &SizingAssumptions,
) -> Result<SimulationResult> {
    input.validate()?;
    assumptions.validate()?;
    catalogue.validate()?;

    let mut scenarios = ScenarioId::ALL
        .iter()
        .map(|&id| size_scenario(id, input, catalogue, assumptions))
        .collect::<Result<Vec<_>>>()?;
    hide_duplicate_variant(&mut scenarios);

    let best_scenario = select_best(&scenarios, input.surface_m2, input.sell_tariff > 0.0);
    let feasibility = summarize_feasibility(&scenarios, input.surface_m2);

    if !feasibility.possible {
        warn!(
            surface_m2 = input.surface_m2,
            "no scenario fits the roof in full"
        );
    }
    info!(
        best = %best_scenario,
        possible = feasibility.possible,
        warnings = feasibility.warnings.len(),
        "simulation complete"
    );

    Ok(SimulationResult {
        scenarios,
        best_scenario,
        feasibility,
        input: *input,
    })
}

/// Hides `D-2` when it carries exactly the same sizing and figures as `D`.
fn hide_duplicate_variant(scenarios: &mut [ScenarioResult]) {
    let d = scenarios.iter().find(|s| s.id == ScenarioId::D).cloned();
    let Some(d) = d else {
        return;
    };
    if let Some(d2) = scenarios.iter_mut().find(|s| s.id == ScenarioId::D2) {
        if same_outcome(&d, d2) {
            d2.show_in_results = false;
        }
    }
}

/// Equal equipment, status, and energy/financial figures.
pub fn same_outcome(a: &ScenarioResult, b: &ScenarioResult) -> bool {
    let close = |x: f64, y: f64| (x - y).abs() <= SAME_OUTCOME_TOLERANCE;
    a.equipment == b.equipment
        && a.status == b.status
        && close(a.annual_production_kwh, b.annual_production_kwh)
        && close(a.self_consumed_kwh, b.self_consumed_kwh)
        && close(a.exported_kwh, b.exported_kwh)
        && close(a.annual_savings, b.annual_savings)
        && close(a.annual_resale_revenue, b.annual_resale_revenue)
}
