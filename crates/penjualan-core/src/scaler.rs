//! Feature standardization.
//!
//! [`StandardScaler`] applies the per-column mean and scale computed when
//! the model was trained: `z = (x - mean) / scale`. Fitting happens offline
//! in the training pipeline; this module only loads the resulting
//! parameters and applies them, so the transform is immutable for the life
//! of the process.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, ArtifactResult, InferenceError};

/// A fitted standardization transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Build a scaler from fitted parameters.
    ///
    /// Panics if the vectors differ in length; parameters always come from
    /// one fit, so a mismatch is a programming error. File-based loading
    /// goes through [`StandardScaler::load`], which reports bad content as
    /// an [`ArtifactError`] instead.
    pub fn from_params(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        assert_eq!(
            mean.len(),
            scale.len(),
            "mean and scale must be the same length"
        );
        StandardScaler { mean, scale }
    }

    /// Load fitted parameters from a JSON artifact.
    pub fn load(path: &Path) -> ArtifactResult<Self> {
        let file = File::open(path).map_err(|source| ArtifactError::open(path, source))?;
        let scaler: StandardScaler = serde_json::from_reader(BufReader::new(file))
            .map_err(|err| ArtifactError::malformed(path, err.to_string()))?;
        scaler
            .check_params()
            .map_err(|reason| ArtifactError::malformed(path, reason))?;
        Ok(scaler)
    }

    fn check_params(&self) -> Result<(), String> {
        if self.mean.is_empty() {
            return Err("mean and scale must not be empty".to_string());
        }
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if let Some(i) = self.mean.iter().position(|m| !m.is_finite()) {
            return Err(format!("mean[{i}] is not finite"));
        }
        if let Some(i) = self.scale.iter().position(|s| !s.is_finite() || *s == 0.0) {
            return Err(format!("scale[{i}] must be finite and non-zero"));
        }
        Ok(())
    }

    /// Number of features the scaler was fitted on.
    pub fn num_features(&self) -> usize {
        self.mean.len()
    }

    /// Standardize a raw feature vector.
    ///
    /// Fails when the vector width differs from the fitted width. Column
    /// order cannot be checked here and is the caller's contract.
    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if features.len() != self.mean.len() {
            return Err(InferenceError::DimensionMismatch {
                expected: self.mean.len(),
                actual: features.len(),
            });
        }
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }
}
