use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::errors::CalculatorError;

/// error body, `{"detail": "..."}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Calculation(#[from] CalculatorError),

    #[error(transparent)]
    Payload(#[from] JsonRejection),
}

impl ApiError {
    fn status_and_detail(&self) -> (StatusCode, String) {
        match self {
            ApiError::Calculation(CalculatorError::InvalidCurrency { .. }) => {
                (StatusCode::BAD_REQUEST, "Unsupported currency".to_string())
            }
            ApiError::Calculation(
                err @ (CalculatorError::InvalidNumericInput { .. }
                | CalculatorError::InvalidTerm { .. }),
            ) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Calculation(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            ApiError::Payload(rejection) => (rejection.status(), rejection.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();

        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(%status, error = %self, "request rejected");
        }

        (status, Json(ErrorBody { detail })).into_response()
    }
}
