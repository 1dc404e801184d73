//! Equipment choices attached to a sized scenario.

use serde::{Deserialize, Serialize};

/// Inverter family, which decides whether a battery can be attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InverterKind {
    /// Grid-tied string inverter, no storage.
    GridTied,
    /// Hybrid inverter with a battery port.
    Hybrid,
}

/// Inverter model and unit count chosen for an array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InverterChoice {
    pub model: String,
    pub kind: InverterKind,
    /// AC rating of a single unit (kW).
    pub rated_kw: f64,
    pub quantity: u32,
}

/// Battery model and unit count chosen for night coverage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryChoice {
    pub model: String,
    /// Usable capacity of a single unit (kWh).
    pub unit_kwh: f64,
    pub quantity: u32,
}

impl BatteryChoice {
    /// Total installed storage (kWh).
    pub fn capacity_kwh(&self) -> f64 {
        self.unit_kwh * f64::from(self.quantity)
    }
}

/// Complete bill of equipment for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentSet {
    pub panel_model: String,
    pub panel_count: u32,
    /// Nameplate power of a single panel (W).
    pub panel_watt: f64,
    pub inverter: Option<InverterChoice>,
    pub battery: Option<BatteryChoice>,
}

impl EquipmentSet {
    /// Installed DC capacity (kWc).
    pub fn installed_kwc(&self) -> f64 {
        f64::from(self.panel_count) * self.panel_watt / 1000.0
    }
}
