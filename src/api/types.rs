//! API request and response bodies.
//!
//! Field names are camelCase to match the sizing types they wrap.

use serde::{Deserialize, Serialize};

use crate::pricing::ScenarioWithPrice;
use crate::sizing::{SimulationInput, SimulationResult};

/// Body of the commercial simulation endpoints.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommercialRequest {
    pub input: SimulationInput,
    /// Personal margin of the calling commercial; global margin when absent.
    #[serde(default)]
    pub margin: Option<f64>,
}

/// Sizing result plus prices. Only served behind commercial authentication.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommercialResponse {
    pub simulation: SimulationResult,
    pub priced_scenarios: Vec<ScenarioWithPrice>,
}

/// Error response body for 4xx/5xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
