//! Route definitions for the prediction service.
//!
//! Two endpoints: `POST /predict` runs the inference pipeline for one
//! observation, `GET /health` reports what the process loaded at startup.
//! All shared state is the immutable artifact bundle.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tower_http::trace::TraceLayer;

use penjualan_core::{parse_sales_data, Artifacts, Prediction};

use crate::error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    artifacts: Arc<Artifacts>,
}

impl AppState {
    pub fn new(artifacts: Artifacts) -> Self {
        Self {
            artifacts: Arc::new(artifacts),
        }
    }
}

/// Create the router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Prediction endpoint
///
/// The body is taken as raw JSON so validation can report every offending
/// field in one 422 response instead of stopping at the first.
async fn predict(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Prediction>, ApiError> {
    let data = parse_sales_data(&body).map_err(ApiError::Validation)?;

    let prediction = state.artifacts.predict(&data).map_err(|err| {
        tracing::error!(error = %err, "prediction pipeline failed");
        ApiError::from(err)
    })?;

    tracing::debug!(
        year = prediction.tahun_prediksi,
        value = prediction.prediksi_penjualan,
        "prediction served"
    );
    Ok(Json(prediction))
}

/// Health check endpoint
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.artifacts.model_name(),
        features: state.artifacts.num_features(),
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: &'static str,
    pub features: usize,
    pub version: &'static str,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use penjualan_core::{SavedModel, StandardScaler, FEATURE_COUNT};
    use serde_json::json;

    fn test_state() -> AppState {
        let scaler =
            StandardScaler::from_params(vec![0.0; FEATURE_COUNT], vec![1.0; FEATURE_COUNT]);
        let model = SavedModel::Linear {
            coefficients: vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            intercept: 100.0,
        };
        AppState::new(Artifacts::from_parts(scaler, Box::new(model)))
    }

    fn valid_body() -> Value {
        json!({
            "Produksi_kWh": 5.0,
            "Kesusutan_kWh": 1.0,
            "Persentase_": 2.0,
            "Efficiency_": 3.0,
            "Energy_Loss_kWh": 4.0,
            "Customer_Growth_Rate": 5.0,
            "Quarter_Q1": 1.0,
            "Quarter_Q2": 0.0,
            "Quarter_Q3": 0.0,
        })
    }

    #[tokio::test]
    async fn test_predict_handler_returns_labeled_prediction() {
        let Json(prediction) = predict(State(test_state()), Json(valid_body()))
            .await
            .unwrap();
        assert_eq!(prediction.tahun_prediksi, 2023);
        assert_eq!(prediction.prediksi_penjualan, 105.0);
    }

    #[tokio::test]
    async fn test_predict_handler_collects_validation_errors() {
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove("Quarter_Q2");
        body["Efficiency_"] = json!("high");

        let err = predict(State(test_state()), Json(body)).await.unwrap_err();
        match err {
            ApiError::Validation(errors) => {
                assert_eq!(errors.len(), 2);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_health_handler_reports_backend() {
        let Json(health) = health(State(test_state())).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.model, "linear");
        assert_eq!(health.features, FEATURE_COUNT);
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    }
}
