//! Best-scenario selection and feasibility summary.

use super::types::{Feasibility, FeasibilityStatus, ScenarioGroup, ScenarioId, ScenarioResult};
use crate::EPSILON;

/// Presentation group relevant for a roof of `surface_m2`.
///
/// When the roof cannot hold scenario `C` in full, only the day-use group is
/// offered; otherwise the autonomy group is.
pub fn relevant_group(scenarios: &[ScenarioResult], surface_m2: f64) -> ScenarioGroup {
    match scenarios.iter().find(|s| s.id == ScenarioId::C) {
        Some(c) if c.target_surface_m2 <= surface_m2 + EPSILON => ScenarioGroup::Autonomy,
        _ => ScenarioGroup::DayUse,
    }
}

/// Picks the scenario to present first.
///
/// Among the visible scenarios of the relevant group, the fully feasible one
/// with the highest annual savings wins; if none is feasible, the partial
/// one with the highest savings.
///
/// When exports are paid (`resale_paid`), ties go to the later scenario in
/// catalogue order, so `B` beats `A` and `D` beats `C`. Otherwise resale
/// earns nothing and the smaller array wins, then the earlier scenario.
pub fn select_best(
    scenarios: &[ScenarioResult],
    surface_m2: f64,
    resale_paid: bool,
) -> ScenarioId {
    let group = relevant_group(scenarios, surface_m2);
    let candidates: Vec<&ScenarioResult> = scenarios
        .iter()
        .filter(|s| s.show_in_results && s.id.group() == group)
        .collect();

    let top = |status: FeasibilityStatus| {
        candidates
            .iter()
            .filter(|s| s.status == status)
            .max_by(|a, b| {
                let by_savings = a.annual_savings.total_cmp(&b.annual_savings);
                if resale_paid {
                    by_savings.then(a.id.cmp(&b.id))
                } else {
                    by_savings
                        .then(b.equipment.panel_count.cmp(&a.equipment.panel_count))
                        .then(b.id.cmp(&a.id))
                }
            })
            .map(|s| s.id)
    };

    top(FeasibilityStatus::Full)
        .or_else(|| top(FeasibilityStatus::Partial))
        .or_else(|| scenarios.first().map(|s| s.id))
        .unwrap_or(ScenarioId::A)
}

/// Summarizes which scenarios could not be installed in full.
pub fn summarize_feasibility(scenarios: &[ScenarioResult], surface_m2: f64) -> Feasibility {
    let mut warnings: Vec<String> = scenarios
        .iter()
        .filter(|s| s.status == FeasibilityStatus::Partial)
        .map(|s| {
            format!(
                "insufficient surface for {} (scenario {}): {:.1} m² required, {:.1} m² available",
                s.id.description(),
                s.id,
                s.target_surface_m2,
                surface_m2
            )
        })
        .collect();

    let possible = scenarios
        .iter()
        .any(|s| s.status == FeasibilityStatus::Full);
    if !possible {
        warnings.push("no scenario can be fully installed on the available roof".to_string());
    }

    Feasibility { possible, warnings }
}

#[cfg(test)]
mod tests {
    use super::FeasibilityStatus::{Full, Partial};
    use super::*;
    use crate::equipment::EquipmentSet;

    fn scenario(
        id: ScenarioId,
        status: FeasibilityStatus,
        savings: f64,
        target_surface_m2: f64,
    ) -> ScenarioResult {
        ScenarioResult {
            id,
            equipment: EquipmentSet {
                panel_model: "PV-600".to_string(),
                panel_count: 0,
                panel_watt: 600.0,
                inverter: None,
                battery: None,
            },
            installed_kwc: 0.0,
            target_kwh: 0.0,
            target_surface_m2,
            surface_required_m2: 0.0,
            annual_production_kwh: 0.0,
            self_consumed_kwh: 0.0,
            exported_kwh: 0.0,
            annual_savings: savings,
            annual_resale_revenue: 0.0,
            projected_savings: 0.0,
            status,
            show_in_results: true,
        }
    }

    #[test]
    fn small_roof_selects_day_group() {
        let set = vec![
            scenario(ScenarioId::A, Full, 3_000.0, 10.0),
            scenario(ScenarioId::B, Full, 5_000.0, 20.0),
            scenario(ScenarioId::C, Partial, 6_000.0, 40.0),
            scenario(ScenarioId::D, Partial, 7_000.0, 60.0),
            scenario(ScenarioId::D2, Partial, 6_500.0, 60.0),
        ];
        assert_eq!(relevant_group(&set, 30.0), ScenarioGroup::DayUse);
        assert_eq!(select_best(&set, 30.0, true), ScenarioId::B);
    }

    #[test]
    fn full_scenario_beats_richer_partial_one() {
        let set = vec![
            scenario(ScenarioId::A, Full, 3_000.0, 10.0),
            scenario(ScenarioId::B, Partial, 5_000.0, 50.0),
            scenario(ScenarioId::C, Partial, 6_000.0, 40.0),
            scenario(ScenarioId::D, Partial, 7_000.0, 60.0),
            scenario(ScenarioId::D2, Partial, 6_500.0, 60.0),
        ];
        assert_eq!(select_best(&set, 30.0, true), ScenarioId::A);
    }

    #[test]
    fn large_roof_selects_autonomy_group() {
        let set = vec![
            scenario(ScenarioId::A, Full, 3_000.0, 10.0),
            scenario(ScenarioId::B, Full, 9_000.0, 20.0),
            scenario(ScenarioId::C, Full, 6_000.0, 40.0),
            scenario(ScenarioId::D, Full, 8_000.0, 60.0),
            scenario(ScenarioId::D2, Full, 8_000.0, 60.0),
        ];
        assert_eq!(relevant_group(&set, 80.0), ScenarioGroup::Autonomy);
        // D-2 would tie, but only visible scenarios compete
        let mut set = set;
        set[4].show_in_results = false;
        assert_eq!(select_best(&set, 80.0, true), ScenarioId::D);
    }

    #[test]
    fn all_partial_falls_back_to_best_partial() {
        let set = vec![
            scenario(ScenarioId::A, Partial, 1_000.0, 10.0),
            scenario(ScenarioId::B, Partial, 1_200.0, 20.0),
            scenario(ScenarioId::C, Partial, 900.0, 40.0),
            scenario(ScenarioId::D, Partial, 1_300.0, 60.0),
            scenario(ScenarioId::D2, Partial, 1_250.0, 60.0),
        ];
        assert_eq!(select_best(&set, 5.0, true), ScenarioId::B);
    }

    #[test]
    fn ties_prefer_later_scenario() {
        let set = vec![
            scenario(ScenarioId::A, Full, 2_000.0, 10.0),
            scenario(ScenarioId::B, Full, 2_000.0, 10.0),
            scenario(ScenarioId::C, Partial, 0.0, 40.0),
        ];
        assert_eq!(select_best(&set, 15.0, true), ScenarioId::B);
    }

    #[test]
    fn unpaid_resale_ties_prefer_smaller_array() {
        let mut set = vec![
            scenario(ScenarioId::A, Full, 2_000.0, 10.0),
            scenario(ScenarioId::B, Full, 2_000.0, 10.0),
            scenario(ScenarioId::C, Partial, 0.0, 40.0),
        ];
        set[0].equipment.panel_count = 4;
        set[1].equipment.panel_count = 10;
        assert_eq!(select_best(&set, 15.0, false), ScenarioId::A);

        set[1].equipment.panel_count = 4;
        assert_eq!(select_best(&set, 15.0, false), ScenarioId::A);
    }

    #[test]
    fn feasibility_lists_every_partial_scenario() {
        let set = vec![
            scenario(ScenarioId::A, Full, 0.0, 10.0),
            scenario(ScenarioId::C, Partial, 0.0, 40.0),
        ];
        let summary = summarize_feasibility(&set, 20.0);
        assert!(summary.possible);
        assert_eq!(summary.warnings.len(), 1);
        assert!(summary.warnings[0].contains("insufficient surface for full autonomy"));
    }

    #[test]
    fn all_partial_is_not_possible() {
        let set = vec![
            scenario(ScenarioId::A, Partial, 0.0, 10.0),
            scenario(ScenarioId::C, Partial, 0.0, 40.0),
        ];
        let summary = summarize_feasibility(&set, 5.0);
        assert!(!summary.possible);
        assert_eq!(summary.warnings.len(), 3);
    }
}
