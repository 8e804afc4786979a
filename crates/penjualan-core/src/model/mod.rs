//! Regression model backends.
//!
//! The pipeline treats the model as a narrow capability: a scaled feature
//! vector goes in, one scalar comes out. Two backends implement it.
//! [`SavedModel`] is a serde-deserialized model object, the shape our own
//! training pipeline exports. [`Booster`] reads XGBoost's native JSON dump
//! through a dedicated loader. Which backend serves a deployment is decided
//! once at startup by which artifact file is present, never per request.

mod booster;
mod saved;

pub use booster::Booster;
pub use saved::SavedModel;

use crate::error::InferenceError;

/// A trained regression model.
///
/// Implementations are immutable after load and safe to share across
/// request tasks.
pub trait Model: Send + Sync {
    /// Short backend identifier for logs and the health endpoint.
    fn name(&self) -> &'static str;

    /// Width of the feature vector the model was trained on.
    fn num_features(&self) -> usize;

    /// Predict one value from a scaled feature vector.
    fn predict(&self, features: &[f64]) -> Result<f64, InferenceError>;
}

pub(crate) fn check_width(expected: usize, actual: usize) -> Result<(), InferenceError> {
    if expected != actual {
        return Err(InferenceError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
