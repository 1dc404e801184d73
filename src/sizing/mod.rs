//! Photovoltaic sizing engine.
//!
//! Sizes the fixed scenario catalogue (`A`, `B`, `C`, `D`, `D-2`) against a
//! household's consumption and roof, classifies each as fully or partially
//! realizable, and projects savings. The output carries no cost data.

pub mod assumptions;
pub mod engine;
/// Multi-year savings projection.
pub mod finance;
pub mod scenario;
/// Best-scenario choice and feasibility summary.
pub mod selection;
pub mod types;

pub use assumptions::SizingAssumptions;
pub use engine::calculate_simulation;
pub use types::{
    Feasibility, FeasibilityStatus, ScenarioGroup, ScenarioId, ScenarioResult, SimulationInput,
    SimulationResult,
};
