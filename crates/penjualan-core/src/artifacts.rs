//! Artifact resolution and the prediction pipeline.
//!
//! Everything the service needs at runtime is loaded here, once, before the
//! first request: the fitted scaler and whichever model artifact the
//! deployment shipped. The loaded [`Artifacts`] bundle is immutable and is
//! what request handlers borrow for every prediction.

use std::fmt;
use std::path::Path;

use crate::error::{ArtifactError, ArtifactResult, PredictError};
use crate::model::{Booster, Model, SavedModel};
use crate::scaler::StandardScaler;
use crate::schema::{Prediction, SalesData};

/// File name of the scaler artifact.
pub const SCALER_FILE: &str = "scaler.json";
/// File name of the dedicated booster artifact.
pub const BOOSTER_FILE: &str = "xgboost_model_tuned.json";
/// File name of the generic serialized model artifact.
pub const SAVED_MODEL_FILE: &str = "model.json";

/// The scaler and model a deployment runs with.
pub struct Artifacts {
    scaler: StandardScaler,
    model: Box<dyn Model>,
}

impl Artifacts {
    /// Load both artifacts from `dir`, failing on anything missing or
    /// malformed.
    ///
    /// The model backend is picked by which artifact file is present:
    /// [`BOOSTER_FILE`] wins when both exist, since a dedicated booster
    /// dump is the more specific deployment.
    pub fn load_from_dir(dir: &Path) -> ArtifactResult<Self> {
        let scaler_path = dir.join(SCALER_FILE);
        if !scaler_path.is_file() {
            return Err(ArtifactError::Missing { path: scaler_path });
        }
        let scaler = StandardScaler::load(&scaler_path)?;
        tracing::debug!(path = %scaler_path.display(), features = scaler.num_features(), "scaler loaded");

        let booster_path = dir.join(BOOSTER_FILE);
        let saved_path = dir.join(SAVED_MODEL_FILE);
        let model: Box<dyn Model> = if booster_path.is_file() {
            Box::new(Booster::load(&booster_path)?)
        } else if saved_path.is_file() {
            Box::new(SavedModel::load(&saved_path)?)
        } else {
            return Err(ArtifactError::NoModel {
                booster: booster_path,
                saved: saved_path,
            });
        };
        tracing::debug!(model = model.name(), features = model.num_features(), "model loaded");

        Ok(Artifacts { scaler, model })
    }

    /// Assemble a bundle from already-loaded parts.
    pub fn from_parts(scaler: StandardScaler, model: Box<dyn Model>) -> Self {
        Artifacts { scaler, model }
    }

    /// Backend identifier of the loaded model.
    pub fn model_name(&self) -> &'static str {
        self.model.name()
    }

    /// Feature width of the loaded model.
    pub fn num_features(&self) -> usize {
        self.model.num_features()
    }

    /// Run the full pipeline for one request: select the nine features in
    /// fit order, scale them, and run the model.
    ///
    /// Failures name the stage that rejected the vector and leave the
    /// loaded artifacts untouched.
    pub fn predict(&self, data: &SalesData) -> Result<Prediction, PredictError> {
        let features = data.feature_vector();
        let scaled = self
            .scaler
            .transform(&features)
            .map_err(PredictError::Scaling)?;
        let value = self
            .model
            .predict(&scaled)
            .map_err(PredictError::Prediction)?;
        Ok(Prediction::new(value))
    }
}

impl fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifacts")
            .field("scaler_features", &self.scaler.num_features())
            .field("model", &self.model.name())
            .field("model_features", &self.model.num_features())
            .finish()
    }
}
