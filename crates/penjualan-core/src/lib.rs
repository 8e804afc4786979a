//! Penjualan Core
//!
//! Inference pipeline for the electricity sales prediction service: given
//! one quarter's grid observations, forecast annual electricity sales for
//! the year after the training data ends.
//!
//! ## Architecture
//!
//! The pipeline is a straight line from a validated request body to one
//! number:
//!
//! 1. **Schema** (`schema`): the wire request/response types and the
//!    field-level validation that runs before any business logic.
//!
//! 2. **Scaler** (`scaler`): standardization with the parameters captured
//!    when the model was fitted.
//!
//! 3. **Model** (`model`): the regression backends behind the [`Model`]
//!    trait, either a generic serialized model object or a dedicated
//!    XGBoost booster dump.
//!
//! 4. **Artifacts** (`artifacts`): startup resolution of the scaler and
//!    model files plus the composed predict call.
//!
//! Both artifacts are loaded once at process start and are immutable
//! afterwards; every per-request failure is an error value, never a panic.
//!
//! ## Example
//!
//! ```rust,no_run
//! use penjualan_core::{parse_sales_data, Artifacts};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let artifacts = Artifacts::load_from_dir(&std::env::current_dir()?)?;
//!
//!     let body = serde_json::json!({
//!         "Produksi_kWh": 1200.5,
//!         "Kesusutan_kWh": 80.2,
//!         "Persentase_": 6.7,
//!         "Efficiency_": 93.3,
//!         "Energy_Loss_kWh": 40.1,
//!         "Customer_Growth_Rate": 1.8,
//!         "Quarter_Q1": 1.0,
//!         "Quarter_Q2": 0.0,
//!         "Quarter_Q3": 0.0,
//!     });
//!     let data = parse_sales_data(&body).map_err(|errors| {
//!         format!("invalid body: {errors:?}")
//!     })?;
//!
//!     let prediction = artifacts.predict(&data)?;
//!     println!("{} -> {}", prediction.tahun_prediksi, prediction.prediksi_penjualan);
//!     Ok(())
//! }
//! ```

pub mod artifacts;
pub mod error;
pub mod model;
pub mod scaler;
pub mod schema;

// Re-export the artifact bundle and file names
pub use artifacts::{Artifacts, BOOSTER_FILE, SAVED_MODEL_FILE, SCALER_FILE};

// Re-export error types
pub use error::{ArtifactError, ArtifactResult, InferenceError, PredictError};

// Re-export model backends
pub use model::{Booster, Model, SavedModel};

// Re-export the scaler
pub use scaler::StandardScaler;

// Re-export wire schema types
pub use schema::{
    parse_sales_data, FieldError, Prediction, SalesData, FEATURE_COUNT, FEATURE_FIELDS,
    OPTIONAL_FIELD, PREDICTED_YEAR,
};
