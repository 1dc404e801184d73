//! Equipment catalogue and per-scenario equipment choices.

/// Injected catalogue of panels, inverters, and batteries.
pub mod catalogue;
pub mod types;

pub use catalogue::{BatteryModel, Catalogue, InverterModel, PanelModel};
pub use types::{BatteryChoice, EquipmentSet, InverterChoice, InverterKind};
