//! Sizing of a single scenario: targets, roof cap, and energy allocation.

use tracing::debug;

use super::assumptions::SizingAssumptions;
use super::finance::cumulative_savings;
use super::types::{FeasibilityStatus, ScenarioId, ScenarioResult, SimulationInput};
use crate::EPSILON;
use crate::equipment::{Catalogue, EquipmentSet};
use crate::error::{Error, Result};

const DAYS_PER_YEAR: f64 = 365.0;

/// Where a year of production ends up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyAllocation {
    /// Production consumed directly during the day (kWh).
    pub day_used_kwh: f64,
    /// Production stored and consumed at night (kWh).
    pub night_served_kwh: f64,
    /// Production injected into the grid (kWh).
    pub exported_kwh: f64,
}

impl EnergyAllocation {
    pub fn self_consumed_kwh(&self) -> f64 {
        self.day_used_kwh + self.night_served_kwh
    }
}

/// Energy the scenario's policy aims to produce per year (kWh).
///
/// Day-use scenarios target day consumption, autonomy scenarios target the
/// whole consumption regardless of the day/night split. Resale scenarios
/// add `resale_share` of the annual consumption on top.
pub fn target_kwh(id: ScenarioId, input: &SimulationInput, assumptions: &SizingAssumptions) -> f64 {
    let base = if id.covers_night() {
        input.annual_consumption_kwh
    } else {
        input.day_consumption_kwh()
    };
    if id.resale_enabled() {
        base + resale_target_kwh(input, assumptions)
    } else {
        base
    }
}

fn resale_target_kwh(input: &SimulationInput, assumptions: &SizingAssumptions) -> f64 {
    input.annual_consumption_kwh * assumptions.resale_share
}

/// Splits `production_kwh` between day use, night use, and export.
///
/// Production serves day consumption first, then the battery for night
/// consumption (autonomy scenarios only), and the rest is exported. A
/// resale-first scenario reserves up to `resale_target_kwh` for export
/// before serving the household.
pub fn allocate(
    id: ScenarioId,
    production_kwh: f64,
    day_kwh: f64,
    night_kwh: f64,
    resale_target_kwh: f64,
) -> EnergyAllocation {
    let reserved = if id.resale_first() {
        production_kwh.min(resale_target_kwh)
    } else {
        0.0
    };
    let available = production_kwh - reserved;
    let day_used_kwh = available.min(day_kwh);
    let night_served_kwh = if id.covers_night() {
        (available - day_used_kwh).min(night_kwh)
    } else {
        0.0
    };

    EnergyAllocation {
        day_used_kwh,
        night_served_kwh,
        exported_kwh: production_kwh - day_used_kwh - night_served_kwh,
    }
}

/// Sizes one scenario against the roof and the catalogue.
///
/// # Errors
///
/// Returns a catalogue error if no inverter or battery fits the policy, and
/// [`Error::InvalidInput`] if the panel count would not fit a `u32`.
pub fn size_scenario(
    id: ScenarioId,
    input: &SimulationInput,
    catalogue: &Catalogue,
    assumptions: &SizingAssumptions,
) -> Result<ScenarioResult> {
    let panel = &catalogue.panel;
    let yield_per_panel_kwh = panel.watt_peak / 1000.0 * assumptions.specific_yield_kwh_per_kwc;

    let target = target_kwh(id, input, assumptions);
    let target_panels = whole_units_up(target / yield_per_panel_kwh)?;
    let target_surface_m2 = f64::from(target_panels) * panel.footprint_m2;

    let (panel_count, status) = if fits(target_surface_m2, input.surface_m2) {
        (target_panels, FeasibilityStatus::Full)
    } else {
        (
            panels_fitting(input.surface_m2, panel.footprint_m2)?
                .min(target_panels.saturating_sub(1)),
            FeasibilityStatus::Partial,
        )
    };

    let production_kwh = f64::from(panel_count) * yield_per_panel_kwh;
    let allocation = allocate(
        id,
        production_kwh,
        input.day_consumption_kwh(),
        input.night_consumption_kwh(),
        resale_target_kwh(input, assumptions),
    );

    let equipment = EquipmentSet {
        panel_model: panel.model.clone(),
        panel_count,
        panel_watt: panel.watt_peak,
        inverter: None,
        battery: None,
    };
    let installed_kwc = equipment.installed_kwc();
    let inverter = catalogue.select_inverter(id.inverter_kind(), installed_kwc)?;
    let battery = if id.covers_night() {
        let daily_night_kwh = allocation.night_served_kwh / DAYS_PER_YEAR;
        catalogue.select_battery(daily_night_kwh * assumptions.battery_night_ratio)?
    } else {
        None
    };
    let equipment = EquipmentSet {
        inverter,
        battery,
        ..equipment
    };

    let annual_resale_revenue = if id.resale_enabled() {
        allocation.exported_kwh * input.sell_tariff
    } else {
        0.0
    };
    let annual_savings = allocation.self_consumed_kwh() * input.buy_tariff + annual_resale_revenue;

    debug!(
        scenario = %id,
        %status,
        panels = panel_count,
        target_kwh = target,
        production_kwh,
        annual_savings,
        "sized scenario"
    );

    Ok(ScenarioResult {
        id,
        equipment,
        installed_kwc,
        target_kwh: target,
        target_surface_m2,
        surface_required_m2: f64::from(panel_count) * panel.footprint_m2,
        annual_production_kwh: production_kwh,
        self_consumed_kwh: allocation.self_consumed_kwh(),
        exported_kwh: allocation.exported_kwh,
        annual_savings,
        annual_resale_revenue,
        projected_savings: cumulative_savings(
            annual_savings,
            assumptions.inflation_rate,
            assumptions.projection_years,
        ),
        status,
        show_in_results: true,
    })
}

/// Whether `needed_m2` fits on `available_m2`, up to rounding noise.
fn fits(needed_m2: f64, available_m2: f64) -> bool {
    needed_m2 <= available_m2 + EPSILON
}

/// Ceiling to whole units; partial panels do not exist.
fn whole_units_up(units: f64) -> Result<u32> {
    counted((units - EPSILON).ceil().max(0.0))
}

/// Most panels whose footprint fits on the roof, under the same tolerance
/// as the full-target check.
fn panels_fitting(surface_m2: f64, footprint_m2: f64) -> Result<u32> {
    let floor = (surface_m2 / footprint_m2).floor().max(0.0);
    if fits((floor + 1.0) * footprint_m2, surface_m2) {
        counted(floor + 1.0)
    } else {
        counted(floor)
    }
}

fn counted(whole: f64) -> Result<u32> {
    if whole > f64::from(u32::MAX) {
        return Err(Error::invalid_input(
            "annualConsumptionKwh",
            format!("needs {whole:.0} panels, more than can be counted"),
        ));
    }
    Ok(whole as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> SimulationInput {
        SimulationInput {
            annual_consumption_kwh: 12_000.0,
            day_share_pct: 50.0,
            surface_m2: 50.0,
            buy_tariff: 0.64,
            sell_tariff: 0.54,
        }
    }

    fn size(id: ScenarioId, input: &SimulationInput) -> ScenarioResult {
        size_scenario(
            id,
            input,
            &Catalogue::standard(),
            &SizingAssumptions::default(),
        )
        .expect("standard catalogue sizes every scenario")
    }

    #[test]
    fn targets_follow_policy() {
        let a = SizingAssumptions::default();
        let i = input();
        assert_eq!(target_kwh(ScenarioId::A, &i, &a), 6_000.0);
        assert_eq!(target_kwh(ScenarioId::B, &i, &a), 12_000.0);
        assert_eq!(target_kwh(ScenarioId::C, &i, &a), 12_000.0);
        assert_eq!(target_kwh(ScenarioId::D, &i, &a), 18_000.0);
        assert_eq!(target_kwh(ScenarioId::D2, &i, &a), 18_000.0);
    }

    #[test]
    fn day_scenario_rounds_panels_up() {
        // 600 W x 1650 kWh/kWc = 990 kWh per panel; 6000 / 990 = 6.06 -> 7
        let a = size(ScenarioId::A, &input());
        assert_eq!(a.equipment.panel_count, 7);
        assert_eq!(a.status, FeasibilityStatus::Full);
        assert!((a.annual_production_kwh - 6_930.0).abs() < 1e-6);
        assert!((a.self_consumed_kwh - 6_000.0).abs() < 1e-6);
        assert_eq!(a.annual_resale_revenue, 0.0);
        assert!((a.annual_savings - 3_840.0).abs() < 1e-6);
        assert_eq!(
            a.equipment.inverter.as_ref().map(|i| i.model.as_str()),
            Some("GT-5K")
        );
        assert!(a.equipment.battery.is_none());
    }

    #[test]
    fn resale_scenario_pays_exported_energy() {
        let b = size(ScenarioId::B, &input());
        assert_eq!(b.equipment.panel_count, 13);
        assert!((b.exported_kwh - 6_870.0).abs() < 1e-6);
        assert!((b.annual_resale_revenue - 6_870.0 * 0.54).abs() < 1e-6);
        assert!((b.annual_savings - (3_840.0 + 6_870.0 * 0.54)).abs() < 1e-6);
    }

    #[test]
    fn autonomy_scenario_sizes_battery_for_night() {
        let c = size(ScenarioId::C, &input());
        assert_eq!(c.equipment.panel_count, 13);
        assert_eq!(c.status, FeasibilityStatus::Full);
        assert!((c.self_consumed_kwh - 12_000.0).abs() < 1e-6);
        assert!((c.annual_savings - 7_680.0).abs() < 1e-6);
        // 6000 kWh / 365 = 16.4 kWh per night -> 2 x BAT-10
        let battery = c.equipment.battery.as_ref();
        assert_eq!(battery.map(|b| b.model.as_str()), Some("BAT-10"));
        assert_eq!(battery.map(|b| b.quantity), Some(2));
        assert_eq!(
            c.equipment.inverter.as_ref().map(|i| i.model.as_str()),
            Some("HY-8K")
        );
    }

    #[test]
    fn partial_scenario_is_capped_to_roof() {
        // D needs 19 panels (51.3 m²) on a 50 m² roof -> 18 panels fit
        let d = size(ScenarioId::D, &input());
        assert_eq!(d.status, FeasibilityStatus::Partial);
        assert_eq!(d.equipment.panel_count, 18);
        assert!(d.surface_required_m2 <= 50.0);
        assert!(d.target_surface_m2 > 50.0);
        assert!((d.annual_production_kwh - 17_820.0).abs() < 1e-6);
        assert!((d.exported_kwh - 5_820.0).abs() < 1e-6);
    }

    #[test]
    fn resale_first_variant_diverges_when_partial() {
        let d = size(ScenarioId::D, &input());
        let d2 = size(ScenarioId::D2, &input());
        assert_eq!(d2.equipment.panel_count, d.equipment.panel_count);
        assert!((d2.exported_kwh - 6_000.0).abs() < 1e-6);
        assert!((d2.self_consumed_kwh - 11_820.0).abs() < 1e-6);
        assert!(d2.annual_savings < d.annual_savings);
    }

    #[test]
    fn zero_day_share_needs_no_day_panels() {
        let night_only = SimulationInput {
            day_share_pct: 0.0,
            ..input()
        };
        let a = size(ScenarioId::A, &night_only);
        assert_eq!(a.equipment.panel_count, 0);
        assert_eq!(a.annual_production_kwh, 0.0);
        assert!(a.equipment.inverter.is_none());

        let c = size(ScenarioId::C, &night_only);
        let c_ref = size(ScenarioId::C, &input());
        assert_eq!(c.target_kwh, c_ref.target_kwh);
        assert_eq!(c.equipment.panel_count, c_ref.equipment.panel_count);
    }

    #[test]
    fn roof_smaller_than_one_panel_installs_nothing() {
        let tiny = SimulationInput {
            surface_m2: 2.0,
            ..input()
        };
        let a = size(ScenarioId::A, &tiny);
        assert_eq!(a.status, FeasibilityStatus::Partial);
        assert_eq!(a.equipment.panel_count, 0);
        assert_eq!(a.annual_savings, 0.0);
    }

    #[test]
    fn exact_fit_is_not_partial() {
        // 7 panels x 2.7 m² = 18.9 m²
        let snug = SimulationInput {
            surface_m2: 18.9,
            ..input()
        };
        let a = size(ScenarioId::A, &snug);
        assert_eq!(a.status, FeasibilityStatus::Full);
        assert_eq!(a.equipment.panel_count, 7);
    }

    #[test]
    fn partial_count_never_overhangs_roof() {
        // 7 panels need 18.9 m²; a roof just short of that holds 6
        let short = SimulationInput {
            surface_m2: 18.9 - 2e-9,
            ..input()
        };
        let a = size(ScenarioId::A, &short);
        assert_eq!(a.status, FeasibilityStatus::Partial);
        assert_eq!(a.equipment.panel_count, 6);
        assert!(a.surface_required_m2 <= short.surface_m2);
    }

    #[test]
    fn uncountable_array_is_rejected() {
        let tiny_yield = SizingAssumptions {
            specific_yield_kwh_per_kwc: 1e-9,
            ..SizingAssumptions::default()
        };
        let err = size_scenario(ScenarioId::C, &input(), &Catalogue::standard(), &tiny_yield)
            .expect_err("panel count overflows u32");
        assert!(matches!(
            err,
            Error::InvalidInput {
                field: "annualConsumptionKwh",
                ..
            }
        ));
    }

    #[test]
    fn allocation_serves_day_then_night_then_export() {
        let alloc = allocate(ScenarioId::C, 10_000.0, 4_000.0, 5_000.0, 0.0);
        assert_eq!(alloc.day_used_kwh, 4_000.0);
        assert_eq!(alloc.night_served_kwh, 5_000.0);
        assert_eq!(alloc.exported_kwh, 1_000.0);
    }

    #[test]
    fn day_only_allocation_never_stores() {
        let alloc = allocate(ScenarioId::B, 10_000.0, 4_000.0, 5_000.0, 6_000.0);
        assert_eq!(alloc.night_served_kwh, 0.0);
        assert_eq!(alloc.exported_kwh, 6_000.0);
    }

    #[test]
    fn resale_first_reserves_export() {
        let alloc = allocate(ScenarioId::D2, 8_000.0, 4_000.0, 5_000.0, 3_000.0);
        assert_eq!(alloc.exported_kwh, 3_000.0);
        assert_eq!(alloc.day_used_kwh, 4_000.0);
        assert_eq!(alloc.night_served_kwh, 1_000.0);
    }
}
