//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use pv_quote::equipment::Catalogue;
use pv_quote::sizing::{SimulationInput, SimulationResult, SizingAssumptions, calculate_simulation};

/// Reference household (12000 kWh/yr, 50% day, 0.64/0.54 ₪/kWh) on `surface_m2` of roof.
pub fn reference_input(surface_m2: f64) -> SimulationInput {
    SimulationInput {
        annual_consumption_kwh: 12_000.0,
        day_share_pct: 50.0,
        surface_m2,
        buy_tariff: 0.64,
        sell_tariff: 0.54,
    }
}

/// Runs the sizing engine with the standard catalogue and default assumptions.
pub fn simulate(input: &SimulationInput) -> SimulationResult {
    calculate_simulation(input, &Catalogue::standard(), &SizingAssumptions::default())
        .expect("fixture input should be valid")
}

pub fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "{what}: expected {expected}, got {actual}"
    );
}
