//! HTTP boundary for the two calculators.
//!
//! - `POST /calculate_advance` → [`AdvanceResult`]
//! - `POST /calculate_loan` → [`LoanResult`]
//! - `GET /health`

pub mod error;

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::advance::{AdvanceCalculator, AdvanceRequest, AdvanceResult};
use crate::config::CalculatorConfig;
use crate::loan::{LoanCalculator, LoanRequest, LoanResult};

pub use error::{ApiError, ErrorBody};

/// shared, read-only calculators
#[derive(Clone)]
pub struct AppState {
    pub advance: Arc<AdvanceCalculator>,
    pub loan: Arc<LoanCalculator>,
}

impl AppState {
    pub fn new(config: CalculatorConfig) -> Self {
        Self {
            advance: Arc::new(AdvanceCalculator::new(config.advance)),
            loan: Arc::new(LoanCalculator::new(config.loan)),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(CalculatorConfig::default())
    }
}

pub fn create_router(state: AppState) -> Router {
    // any origin, no credentials
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/calculate_advance", post(calculate_advance))
        .route("/calculate_loan", post(calculate_loan))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn calculate_advance(
    State(state): State<AppState>,
    payload: Result<Json<AdvanceRequest>, JsonRejection>,
) -> Result<Json<AdvanceResult>, ApiError> {
    let Json(request) = payload?;
    let result = state.advance.evaluate(&request)?;
    Ok(Json(result))
}

async fn calculate_loan(
    State(state): State<AppState>,
    payload: Result<Json<LoanRequest>, JsonRejection>,
) -> Result<Json<LoanResult>, ApiError> {
    let Json(request) = payload?;
    let result = state.loan.calculate(&request)?;
    Ok(Json(result))
}
