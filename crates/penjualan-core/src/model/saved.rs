//! Generic serialized model objects.
//!
//! A [`SavedModel`] is whatever the training pipeline exported through the
//! generic serializer: a tagged JSON object that deserializes straight into
//! this enum. Contrast with [`Booster`](super::Booster), which parses an
//! external tool's format through a dedicated loader.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Model;
use crate::error::{ArtifactError, ArtifactResult, InferenceError};

/// A regression model restored by the generic object deserializer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "model_type", rename_all = "snake_case")]
pub enum SavedModel {
    /// Linear regression over the scaled features.
    Linear {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    /// An additive ensemble of regression trees.
    TreeEnsemble {
        num_features: usize,
        base_score: f64,
        trees: Vec<TreeNode>,
    },
}

/// One node of a serialized regression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum TreeNode {
    /// Internal split: `feature < threshold` goes left, otherwise right.
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    /// Terminal node contributing `value` to the ensemble sum.
    Leaf { value: f64 },
}

impl TreeNode {
    fn score(&self, features: &[f64]) -> f64 {
        match self {
            TreeNode::Leaf { value } => *value,
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if features[*feature] < *threshold {
                    left.score(features)
                } else {
                    right.score(features)
                }
            }
        }
    }

    /// Largest feature index referenced by this subtree, if it splits at all.
    fn max_feature(&self) -> Option<usize> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Split {
                feature, left, right, ..
            } => {
                let mut max = *feature;
                if let Some(l) = left.max_feature() {
                    max = max.max(l);
                }
                if let Some(r) = right.max_feature() {
                    max = max.max(r);
                }
                Some(max)
            }
        }
    }
}

impl SavedModel {
    /// Load a model object from a JSON artifact.
    pub fn load(path: &Path) -> ArtifactResult<Self> {
        let file = File::open(path).map_err(|source| ArtifactError::open(path, source))?;
        let model: SavedModel = serde_json::from_reader(BufReader::new(file))
            .map_err(|err| ArtifactError::malformed(path, err.to_string()))?;
        model
            .check_params()
            .map_err(|reason| ArtifactError::malformed(path, reason))?;
        Ok(model)
    }

    /// Structural checks so that [`Model::predict`] never has to index out
    /// of bounds.
    fn check_params(&self) -> Result<(), String> {
        match self {
            SavedModel::Linear {
                coefficients,
                intercept,
            } => {
                if coefficients.is_empty() {
                    return Err("linear model has no coefficients".to_string());
                }
                if coefficients.iter().any(|c| !c.is_finite()) || !intercept.is_finite() {
                    return Err("linear model parameters must be finite".to_string());
                }
            }
            SavedModel::TreeEnsemble {
                num_features,
                base_score,
                trees,
            } => {
                if *num_features == 0 {
                    return Err("tree ensemble declares zero features".to_string());
                }
                if !base_score.is_finite() {
                    return Err("base_score must be finite".to_string());
                }
                for (i, tree) in trees.iter().enumerate() {
                    if let Some(max) = tree.max_feature() {
                        if max >= *num_features {
                            return Err(format!(
                                "tree {i} splits on feature {max}, but the ensemble declares {num_features} features"
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl Model for SavedModel {
    fn name(&self) -> &'static str {
        match self {
            SavedModel::Linear { .. } => "linear",
            SavedModel::TreeEnsemble { .. } => "tree-ensemble",
        }
    }

    fn num_features(&self) -> usize {
        match self {
            SavedModel::Linear { coefficients, .. } => coefficients.len(),
            SavedModel::TreeEnsemble { num_features, .. } => *num_features,
        }
    }

    fn predict(&self, features: &[f64]) -> Result<f64, InferenceError> {
        super::check_width(self.num_features(), features.len())?;
        let value = match self {
            SavedModel::Linear {
                coefficients,
                intercept,
            } => {
                intercept
                    + coefficients
                        .iter()
                        .zip(features)
                        .map(|(c, x)| c * x)
                        .sum::<f64>()
            }
            SavedModel::TreeEnsemble {
                base_score, trees, ..
            } => base_score + trees.iter().map(|t| t.score(features)).sum::<f64>(),
        };
        Ok(value)
    }
}
