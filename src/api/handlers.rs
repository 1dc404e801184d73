//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use super::AppState;
use super::types::{CommercialRequest, CommercialResponse, ErrorResponse};
use crate::error::Error;
use crate::pricing::price_scenarios;
use crate::sizing::{SimulationInput, calculate_simulation};

/// Sizes every scenario for a lead. Never returns prices.
///
/// `POST /simulation` → 200 + `SimulationResult` JSON
/// invalid body or out-of-range input → 400 + `ErrorResponse`
pub async fn simulate(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SimulationInput>, JsonRejection>,
) -> Response {
    let Json(input) = match body {
        Ok(body) => body,
        Err(rejection) => return error(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    let cfg = &state.config;
    match calculate_simulation(&input, &cfg.catalogue, &cfg.assumptions) {
        Ok(result) => {
            debug!(best = %result.best_scenario, "public simulation served");
            Json(result).into_response()
        }
        Err(e) => engine_error(&e),
    }
}

/// Sizes and prices every scenario for an authenticated commercial.
///
/// `POST|PUT /simulation/commercial` with `Authorization: Bearer <token>`
/// → 200 + `CommercialResponse` JSON
/// missing or wrong token → 401, no token configured → 403,
/// invalid input or margin → 400
pub async fn simulate_commercial(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<CommercialRequest>, JsonRejection>,
) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return error(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    let cfg = &state.config;
    let simulation = match calculate_simulation(&request.input, &cfg.catalogue, &cfg.assumptions) {
        Ok(result) => result,
        Err(e) => return engine_error(&e),
    };

    let pricing = match request.margin {
        Some(margin) => cfg.pricing.with_commercial_margin(margin),
        None => cfg.pricing,
    };
    match price_scenarios(&simulation.scenarios, &cfg.catalogue, &pricing) {
        Ok(priced_scenarios) => {
            debug!(best = %simulation.best_scenario, "commercial simulation served");
            Json(CommercialResponse {
                simulation,
                priced_scenarios,
            })
            .into_response()
        }
        Err(e) => engine_error(&e),
    }
}

/// Checks the bearer token against the configured commercial token.
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), Response> {
    let Some(expected) = state.commercial_token.as_deref() else {
        return Err(error(
            StatusCode::FORBIDDEN,
            "commercial access is disabled on this server",
        ));
    };

    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match presented {
        Some(token) if tokens_match(token.as_bytes(), expected.as_bytes()) => Ok(()),
        _ => {
            warn!("rejected commercial request with missing or invalid token");
            Err(error(StatusCode::UNAUTHORIZED, "missing or invalid bearer token"))
        }
    }
}

/// Compares two tokens in time independent of where they first differ.
fn tokens_match(presented: &[u8], expected: &[u8]) -> bool {
    if presented.len() != expected.len() {
        return false;
    }
    presented
        .iter()
        .zip(expected)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

/// Caller mistakes map to 400; configuration faults are the server's.
fn engine_error(e: &Error) -> Response {
    match e {
        Error::InvalidInput { .. } | Error::PriceConfig { .. } => {
            error(StatusCode::BAD_REQUEST, e.to_string())
        }
        Error::Catalogue(_) | Error::Assumption { .. } | Error::UnknownProduct(_) => {
            warn!(error = %e, "server configuration cannot serve request");
            error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}
