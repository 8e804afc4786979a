//! HTTP error mapping for the prediction service.
//!
//! [`ApiError`] is the one error type handlers return. Validation failures
//! answer 422 with an entry per offending field; pipeline failures answer
//! 500 with the failing stage's message. Both bodies carry their payload
//! under a `detail` key.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use penjualan_core::{FieldError, PredictError};

/// Errors a request can surface through the HTTP boundary.
#[derive(Debug)]
pub enum ApiError {
    /// The body failed schema validation; the pipeline never ran.
    Validation(Vec<FieldError>),
    /// The scaler or model rejected the request's feature vector.
    Pipeline(PredictError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        ApiError::Pipeline(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::Validation(errors) => json!({ "detail": errors }),
            ApiError::Pipeline(err) => json!({ "detail": err.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
