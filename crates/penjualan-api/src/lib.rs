//! Penjualan API
//!
//! HTTP surface for the electricity sales prediction service. One process,
//! two endpoints:
//!
//! - `POST /predict` validates a quarter's observations and runs them
//!   through the scaler and the regression model loaded at startup.
//! - `GET /health` reports the loaded model backend.
//!
//! The binary (`penjualan-server`) loads both artifacts from its working
//! directory and refuses to start without them; request handling never
//! mutates state, so there is nothing to persist and nothing to retry.

pub mod error;
pub mod routes;

pub use error::ApiError;
pub use routes::{create_router, AppState, HealthResponse};
