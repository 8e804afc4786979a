//! Error types for the prediction pipeline.
//!
//! Failures fall into two families. [`ArtifactError`] covers startup: the
//! process either loads both artifacts or refuses to come up, so every
//! variant is fatal. [`InferenceError`] and [`PredictError`] cover a single
//! request and must leave the process running.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving and loading the scaler and model artifacts.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// A required artifact file does not exist.
    #[error("required artifact missing: {}", .path.display())]
    Missing { path: PathBuf },

    /// Neither supported model artifact was found.
    #[error("no model artifact found: looked for {} and {}", .booster.display(), .saved.display())]
    NoModel { booster: PathBuf, saved: PathBuf },

    /// The artifact file exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact file was read but its content is not a usable artifact.
    #[error("malformed artifact {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },
}

impl ArtifactError {
    /// Create a malformed-artifact error for `path`.
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ArtifactError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Map a file-open failure to the right variant for `path`.
    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => ArtifactError::Missing { path },
            _ => ArtifactError::Read { path, source },
        }
    }
}

/// Errors raised by the scaler or a model backend while handling a request.
#[derive(Error, Debug)]
pub enum InferenceError {
    /// The input vector width does not match what the artifact was fitted on.
    #[error("expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// A per-request pipeline failure, tagged with the stage that rejected it.
///
/// The `Display` output is the exact `detail` string the HTTP layer puts in
/// its 500 response body.
#[derive(Error, Debug)]
pub enum PredictError {
    /// The scaler rejected the assembled feature vector.
    #[error("Error during scaling: {0}")]
    Scaling(#[source] InferenceError),

    /// The model rejected the scaled feature vector.
    #[error("Error during prediction: {0}")]
    Prediction(#[source] InferenceError),
}

/// Result type alias for artifact loading.
pub type ArtifactResult<T> = std::result::Result<T, ArtifactError>;
