//! Core sizing types: household input, scenario identifiers, and results.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::equipment::{EquipmentSet, InverterKind};
use crate::error::{Error, Result};

/// Highest accepted electricity tariff (₪/kWh).
pub const MAX_TARIFF: f64 = 5.0;

/// Largest accepted yearly consumption (kWh).
pub const MAX_ANNUAL_CONSUMPTION_KWH: f64 = 1_000_000.0;

/// Largest accepted roof surface (m²).
pub const MAX_SURFACE_M2: f64 = 100_000.0;

/// Household parameters submitted by a visitor or a commercial.
///
/// Persisted verbatim next to the results so a calculation can be replayed.
///
/// # Examples
///
/// ```
/// use pv_quote::sizing::SimulationInput;
///
/// let input = SimulationInput {
///     annual_consumption_kwh: 12_000.0,
///     day_share_pct: 50.0,
///     surface_m2: 50.0,
///     buy_tariff: 0.64,
///     sell_tariff: 0.54,
/// };
/// assert!(input.validate().is_ok());
/// assert_eq!(input.day_consumption_kwh(), 6_000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SimulationInput {
    /// Yearly consumption (kWh, > 0).
    pub annual_consumption_kwh: f64,
    /// Share of consumption during daylight (percent, 0 to 100).
    #[serde(rename = "dayShare")]
    pub day_share_pct: f64,
    /// Usable roof surface (m², > 0).
    pub surface_m2: f64,
    /// Grid purchase price (₪/kWh).
    pub buy_tariff: f64,
    /// Feed-in price paid for exported energy (₪/kWh).
    pub sell_tariff: f64,
}

impl SimulationInput {
    /// Rejects inputs outside the engine's domain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("annualConsumptionKwh", self.annual_consumption_kwh),
            ("dayShare", self.day_share_pct),
            ("surfaceM2", self.surface_m2),
            ("buyTariff", self.buy_tariff),
            ("sellTariff", self.sell_tariff),
        ];
        if let Some(&(field, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::invalid_input(field, "must be a finite number"));
        }

        if self.annual_consumption_kwh <= 0.0
            || self.annual_consumption_kwh > MAX_ANNUAL_CONSUMPTION_KWH
        {
            return Err(Error::invalid_input(
                "annualConsumptionKwh",
                format!("must be in (0, {MAX_ANNUAL_CONSUMPTION_KWH}]"),
            ));
        }
        if !(0.0..=100.0).contains(&self.day_share_pct) {
            return Err(Error::invalid_input("dayShare", "must be in [0, 100]"));
        }
        if self.surface_m2 <= 0.0 || self.surface_m2 > MAX_SURFACE_M2 {
            return Err(Error::invalid_input(
                "surfaceM2",
                format!("must be in (0, {MAX_SURFACE_M2}]"),
            ));
        }
        if self.buy_tariff <= 0.0 || self.buy_tariff > MAX_TARIFF {
            return Err(Error::invalid_input(
                "buyTariff",
                format!("must be in (0, {MAX_TARIFF}]"),
            ));
        }
        if self.sell_tariff < 0.0 || self.sell_tariff > MAX_TARIFF {
            return Err(Error::invalid_input(
                "sellTariff",
                format!("must be in [0, {MAX_TARIFF}]"),
            ));
        }
        Ok(())
    }

    /// Yearly consumption during daylight hours (kWh).
    pub fn day_consumption_kwh(&self) -> f64 {
        self.annual_consumption_kwh * self.day_share_pct / 100.0
    }

    /// Yearly consumption outside daylight hours (kWh).
    pub fn night_consumption_kwh(&self) -> f64 {
        self.annual_consumption_kwh - self.day_consumption_kwh()
    }
}

/// The fixed catalogue of sizing policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScenarioId {
    /// Day-time self-consumption only.
    A,
    /// Day-time self-consumption plus paid resale.
    B,
    /// Full autonomy: day use plus battery-backed night use.
    C,
    /// Full autonomy plus paid resale, self-consumption served first.
    D,
    /// Same sizing as `D` with the resale target served first.
    #[serde(rename = "D-2")]
    D2,
}

/// Presentation group a scenario belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioGroup {
    /// `A` and `B`: panels and a grid-tied inverter.
    DayUse,
    /// `C`, `D` and `D-2`: hybrid inverter and battery.
    Autonomy,
}

impl ScenarioId {
    /// Every scenario, in calculation order.
    pub const ALL: [ScenarioId; 5] = [Self::A, Self::B, Self::C, Self::D, Self::D2];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::D2 => "D-2",
        }
    }

    /// Short human-readable policy name.
    pub fn description(self) -> &'static str {
        match self {
            Self::A => "day-time self-consumption",
            Self::B => "day-time use with resale",
            Self::C => "full autonomy",
            Self::D => "full autonomy with resale",
            Self::D2 => "resale-priority autonomy",
        }
    }

    /// Whether night consumption is covered through a battery.
    pub fn covers_night(self) -> bool {
        matches!(self, Self::C | Self::D | Self::D2)
    }

    /// Whether exported energy is paid at the sell tariff.
    pub fn resale_enabled(self) -> bool {
        matches!(self, Self::B | Self::D | Self::D2)
    }

    /// Whether the resale target is served before self-consumption.
    pub fn resale_first(self) -> bool {
        matches!(self, Self::D2)
    }

    pub fn inverter_kind(self) -> InverterKind {
        if self.covers_night() {
            InverterKind::Hybrid
        } else {
            InverterKind::GridTied
        }
    }

    pub fn group(self) -> ScenarioGroup {
        if self.covers_night() {
            ScenarioGroup::Autonomy
        } else {
            ScenarioGroup::DayUse
        }
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a scenario fits on the roof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeasibilityStatus {
    /// Required equipment exceeds the roof; figures are capped to what fits.
    #[serde(rename = "PARTIEL")]
    Partial,
    /// Fully realizable within the available surface.
    #[serde(rename = "OK")]
    Full,
}

impl fmt::Display for FeasibilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => f.write_str("OK"),
            Self::Partial => f.write_str("PARTIEL"),
        }
    }
}

/// One sizing outcome. Carries no cost data and is safe for public callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub id: ScenarioId,
    pub equipment: EquipmentSet,
    /// Installed DC capacity (kWc).
    pub installed_kwc: f64,
    /// Energy the policy aims to produce (kWh/year).
    pub target_kwh: f64,
    /// Surface the unconstrained target would need (m²).
    pub target_surface_m2: f64,
    /// Surface actually occupied by the installed panels (m²).
    pub surface_required_m2: f64,
    pub annual_production_kwh: f64,
    /// Production consumed on site, directly or through the battery (kWh/year).
    pub self_consumed_kwh: f64,
    /// Production injected into the grid (kWh/year).
    pub exported_kwh: f64,
    /// Avoided purchases plus resale revenue (₪/year).
    pub annual_savings: f64,
    /// Paid resale, zero for scenarios without resale (₪/year).
    pub annual_resale_revenue: f64,
    /// Savings accumulated over the projection horizon with tariff inflation (₪).
    pub projected_savings: f64,
    pub status: FeasibilityStatus,
    /// False when the scenario duplicates another and should not be displayed.
    pub show_in_results: bool,
}

impl AsRef<ScenarioResult> for ScenarioResult {
    fn as_ref(&self) -> &ScenarioResult {
        self
    }
}

impl fmt::Display for ScenarioResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<3} {:<7} | {:>3} panels {:>6.2} kWc {:>6.1} m² | prod={:>9.0} kWh  \
             self={:>9.0} kWh  export={:>8.0} kWh | savings={:>9.2} ₪/yr  total={:>10.2} ₪",
            self.id.as_str(),
            self.status.to_string(),
            self.equipment.panel_count,
            self.installed_kwc,
            self.surface_required_m2,
            self.annual_production_kwh,
            self.self_consumed_kwh,
            self.exported_kwh,
            self.annual_savings,
            self.projected_savings,
        )?;
        if !self.show_in_results {
            write!(f, " (hidden)")?;
        }
        Ok(())
    }
}

/// Whether the roof supports at least one scenario in full.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feasibility {
    pub possible: bool,
    pub warnings: Vec<String>,
}

/// Output of one sizing run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub scenarios: Vec<ScenarioResult>,
    /// Always the id of a member of `scenarios`.
    pub best_scenario: ScenarioId,
    pub feasibility: Feasibility,
    pub input: SimulationInput,
}

impl SimulationResult {
    pub fn scenario(&self, id: ScenarioId) -> Option<&ScenarioResult> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn best(&self) -> Option<&ScenarioResult> {
        self.scenario(self.best_scenario)
    }

    /// Scenarios a display layer should present.
    pub fn visible_scenarios(&self) -> impl Iterator<Item = &ScenarioResult> {
        self.scenarios.iter().filter(|s| s.show_in_results)
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Sizing Report ---")?;
        writeln!(
            f,
            "Consumption:           {:.0} kWh/yr ({:.0}% day)",
            self.input.annual_consumption_kwh, self.input.day_share_pct
        )?;
        writeln!(f, "Roof surface:          {:.1} m²", self.input.surface_m2)?;
        for scenario in &self.scenarios {
            writeln!(f, "{scenario}")?;
        }
        writeln!(f, "Best scenario:         {}", self.best_scenario)?;
        write!(f, "Feasible:              {}", self.feasibility.possible)?;
        for warning in &self.feasibility.warnings {
            write!(f, "\nwarning: {warning}")?;
        }
        Ok(())
    }
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

    fn invalid_field(input: SimulationInput) -> Option<&'static str> {
        match input.validate() {
            Err(Error::InvalidInput { field, .. }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn valid_input_passes() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn non_positive_consumption_is_rejected() {
        let bad = SimulationInput {
            annual_consumption_kwh: 0.0,
            ..input()
        };
        assert_eq!(invalid_field(bad), Some("annualConsumptionKwh"));
    }

    #[test]
    fn non_positive_surface_is_rejected() {
        let bad = SimulationInput {
            surface_m2: -3.0,
            ..input()
        };
        assert_eq!(invalid_field(bad), Some("surfaceM2"));
    }

    #[test]
    fn upper_bounds_are_inclusive() {
        let at_limit = SimulationInput {
            annual_consumption_kwh: MAX_ANNUAL_CONSUMPTION_KWH,
            surface_m2: MAX_SURFACE_M2,
            ..input()
        };
        assert!(at_limit.validate().is_ok());

        let heavy = SimulationInput {
            annual_consumption_kwh: MAX_ANNUAL_CONSUMPTION_KWH + 1.0,
            ..input()
        };
        assert_eq!(invalid_field(heavy), Some("annualConsumptionKwh"));
        let huge_roof = SimulationInput {
            surface_m2: MAX_SURFACE_M2 * 2.0,
            ..input()
        };
        assert_eq!(invalid_field(huge_roof), Some("surfaceM2"));
    }

    #[test]
    fn day_share_bounds_are_inclusive() {
        for share in [0.0, 100.0] {
            let ok = SimulationInput {
                day_share_pct: share,
                ..input()
            };
            assert!(ok.validate().is_ok(), "day share {share} should be valid");
        }
        let bad = SimulationInput {
            day_share_pct: 100.5,
            ..input()
        };
        assert_eq!(invalid_field(bad), Some("dayShare"));
    }

    #[test]
    fn nan_is_rejected_with_field_name() {
        let bad = SimulationInput {
            buy_tariff: f64::NAN,
            ..input()
        };
        assert_eq!(invalid_field(bad), Some("buyTariff"));
    }

    #[test]
    fn tariff_range_is_enforced() {
        let bad = SimulationInput {
            sell_tariff: MAX_TARIFF + 1.0,
            ..input()
        };
        assert_eq!(invalid_field(bad), Some("sellTariff"));
        let free_resale = SimulationInput {
            sell_tariff: 0.0,
            ..input()
        };
        assert!(free_resale.validate().is_ok());
    }

    #[test]
    fn day_and_night_split_sums_to_total() {
        let i = SimulationInput {
            day_share_pct: 30.0,
            ..input()
        };
        assert!((i.day_consumption_kwh() - 3_600.0).abs() < 1e-9);
        assert!((i.night_consumption_kwh() - 8_400.0).abs() < 1e-9);
    }

    #[test]
    fn scenario_policies() {
        assert!(!ScenarioId::A.resale_enabled());
        assert!(ScenarioId::B.resale_enabled());
        assert!(ScenarioId::C.covers_night());
        assert!(!ScenarioId::C.resale_enabled());
        assert!(ScenarioId::D2.resale_first());
        assert_eq!(ScenarioId::B.inverter_kind(), InverterKind::GridTied);
        assert_eq!(ScenarioId::D.inverter_kind(), InverterKind::Hybrid);
        assert_eq!(ScenarioId::D2.group(), ScenarioGroup::Autonomy);
    }

    #[test]
    fn input_wire_format_is_camel_case() {
        let raw = r#"annualConsumptionKwh = 9000.0
dayShare = 40.0
surfaceM2 = 30.0
buyTariff = 0.6
sellTariff = 0.5
"#;
        let parsed: std::result::Result<SimulationInput, _> = toml::from_str(raw);
        assert_eq!(parsed.ok().map(|i| i.day_share_pct), Some(40.0));
    }

    #[test]
    fn scenario_ids_display_with_dash() {
        let rendered: Vec<String> = ScenarioId::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["A", "B", "C", "D", "D-2"]);
    }
}
