//! Commercial pricing transform.
//!
//! Turns public [`crate::sizing::ScenarioResult`]s into
//! [`ScenarioWithPrice`]s carrying cost, margin, tax, and payback. The two
//! types are distinct so a public response cannot carry prices by accident.

pub mod engine;
pub mod types;

pub use engine::price_scenarios;
pub use types::{DEFAULT_PRICE_CONFIG, PriceConfig, ScenarioWithPrice};
