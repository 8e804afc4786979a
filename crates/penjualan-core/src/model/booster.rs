//! Dedicated loader for XGBoost booster artifacts.
//!
//! XGBoost saves `gbtree` models as a JSON document with per-tree node
//! arrays. Two quirks of that format shape this module: numeric learner
//! parameters are serialized as strings (`"num_feature": "9"`), and
//! `split_conditions` holds the split threshold for internal nodes but the
//! leaf value for leaves, with `left_children[i] == -1` marking a leaf.
//! Request vectors are always dense here, so the format's default-direction
//! routing for missing values never applies.
//!
//! The loader validates tree structure up front so traversal never indexes
//! out of bounds and never loops.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use super::Model;
use crate::error::{ArtifactError, ArtifactResult, InferenceError};

#[derive(Debug, Deserialize)]
struct BoosterFile {
    learner: Learner,
}

#[derive(Debug, Deserialize)]
struct Learner {
    gradient_booster: GradientBooster,
    learner_model_param: LearnerModelParam,
    objective: Objective,
}

#[derive(Debug, Deserialize)]
struct GradientBooster {
    name: String,
    model: GbtreeModel,
}

#[derive(Debug, Deserialize)]
struct GbtreeModel {
    trees: Vec<Tree>,
}

#[derive(Debug, Deserialize)]
struct LearnerModelParam {
    base_score: String,
    num_feature: String,
}

#[derive(Debug, Deserialize)]
struct Objective {
    name: String,
}

/// One regression tree, kept in the node-array layout of the source format.
#[derive(Debug, Clone, Deserialize)]
struct Tree {
    left_children: Vec<i32>,
    right_children: Vec<i32>,
    split_indices: Vec<u32>,
    split_conditions: Vec<f64>,
}

impl Tree {
    fn score(&self, features: &[f64]) -> f64 {
        let mut node = 0usize;
        loop {
            let left = self.left_children[node];
            if left < 0 {
                // Leaf: split_conditions carries the leaf value here.
                return self.split_conditions[node];
            }
            let feature = self.split_indices[node] as usize;
            node = if features[feature] < self.split_conditions[node] {
                left as usize
            } else {
                self.right_children[node] as usize
            };
        }
    }

    fn check(&self, index: usize, num_features: usize) -> Result<(), String> {
        let nodes = self.left_children.len();
        if nodes == 0 {
            return Err(format!("tree {index} has no nodes"));
        }
        if self.right_children.len() != nodes
            || self.split_indices.len() != nodes
            || self.split_conditions.len() != nodes
        {
            return Err(format!("tree {index} has inconsistent node array lengths"));
        }
        for node in 0..nodes {
            let (left, right) = (self.left_children[node], self.right_children[node]);
            if (left < 0) != (right < 0) {
                return Err(format!("tree {index} node {node} has exactly one child"));
            }
            if left < 0 {
                continue;
            }
            let (left, right) = (left as usize, right as usize);
            if left >= nodes || right >= nodes {
                return Err(format!("tree {index} node {node} points past the node array"));
            }
            // Children always come after their parent in the arrays; this is
            // what makes traversal loop-free.
            if left <= node || right <= node {
                return Err(format!("tree {index} node {node} has a child before it"));
            }
            if self.split_indices[node] as usize >= num_features {
                return Err(format!(
                    "tree {index} node {node} splits on feature {} of {num_features}",
                    self.split_indices[node]
                ));
            }
        }
        Ok(())
    }
}

/// A gradient-boosted tree ensemble in XGBoost's own serialization.
#[derive(Debug, Clone)]
pub struct Booster {
    base_score: f64,
    num_features: usize,
    trees: Vec<Tree>,
}

impl Booster {
    /// Load a booster from its XGBoost JSON artifact.
    pub fn load(path: &Path) -> ArtifactResult<Self> {
        let file = File::open(path).map_err(|source| ArtifactError::open(path, source))?;
        let parsed: BoosterFile = serde_json::from_reader(BufReader::new(file))
            .map_err(|err| ArtifactError::malformed(path, err.to_string()))?;
        Booster::from_file(parsed).map_err(|reason| ArtifactError::malformed(path, reason))
    }

    fn from_file(file: BoosterFile) -> Result<Self, String> {
        let learner = file.learner;
        if learner.gradient_booster.name != "gbtree" {
            return Err(format!(
                "unsupported booster type `{}`, expected `gbtree`",
                learner.gradient_booster.name
            ));
        }
        if !learner.objective.name.starts_with("reg:") {
            return Err(format!(
                "unsupported objective `{}`, expected a regression objective",
                learner.objective.name
            ));
        }

        let params = &learner.learner_model_param;
        let base_score: f64 = params
            .base_score
            .parse()
            .map_err(|_| format!("base_score `{}` is not a number", params.base_score))?;
        if !base_score.is_finite() {
            return Err("base_score must be finite".to_string());
        }
        let num_features: usize = params
            .num_feature
            .parse()
            .map_err(|_| format!("num_feature `{}` is not an integer", params.num_feature))?;
        if num_features == 0 {
            return Err("num_feature must be positive".to_string());
        }

        let trees = learner.gradient_booster.model.trees;
        if trees.is_empty() {
            return Err("model contains no trees".to_string());
        }
        for (i, tree) in trees.iter().enumerate() {
            tree.check(i, num_features)?;
        }

        Ok(Booster {
            base_score,
            num_features,
            trees,
        })
    }
}

impl Model for Booster {
    fn name(&self) -> &'static str {
        "xgboost"
    }

    fn num_features(&self) -> usize {
        self.num_features
    }

    fn predict(&self, features: &[f64]) -> Result<f64, InferenceError> {
        super::check_width(self.num_features, features.len())?;
        Ok(self.base_score + self.trees.iter().map(|t| t.score(features)).sum::<f64>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    /// A two-tree dump in the shape `xgboost` actually writes, extra keys
    /// included.
    fn booster_doc() -> Value {
        json!({
            "learner": {
                "attributes": {},
                "feature_names": [],
                "feature_types": [],
                "gradient_booster": {
                    "model": {
                        "gbtree_model_param": { "num_parallel_tree": "1", "num_trees": "2" },
                        "tree_info": [0, 0],
                        "trees": [
                            {
                                "base_weights": [0.0, 1.5, -0.5],
                                "categories": [],
                                "default_left": [0, 0, 0],
                                "id": 0,
                                "left_children": [1, -1, -1],
                                "loss_changes": [10.0, 0.0, 0.0],
                                "parents": [2147483647, 0, 0],
                                "right_children": [2, -1, -1],
                                "split_conditions": [10.0, 1.5, -0.5],
                                "split_indices": [0, 0, 0],
                                "split_type": [0, 0, 0],
                                "sum_hessian": [3.0, 2.0, 1.0],
                                "tree_param": {
                                    "num_deleted": "0",
                                    "num_feature": "3",
                                    "num_nodes": "3",
                                    "size_leaf_vector": "1"
                                }
                            },
                            {
                                "base_weights": [0.25],
                                "categories": [],
                                "default_left": [0],
                                "id": 1,
                                "left_children": [-1],
                                "loss_changes": [0.0],
                                "parents": [2147483647],
                                "right_children": [-1],
                                "split_conditions": [0.25],
                                "split_indices": [0],
                                "split_type": [0],
                                "sum_hessian": [3.0],
                                "tree_param": {
                                    "num_deleted": "0",
                                    "num_feature": "3",
                                    "num_nodes": "1",
                                    "size_leaf_vector": "1"
                                }
                            }
                        ]
                    },
                    "name": "gbtree"
                },
                "learner_model_param": {
                    "base_score": "5E-1",
                    "boost_from_average": "1",
                    "num_class": "0",
                    "num_feature": "3",
                    "num_target": "1"
                },
                "objective": {
                    "name": "reg:squarederror",
                    "reg_loss_param": { "scale_pos_weight": "1" }
                }
            },
            "version": [2, 0, 3]
        })
    }

    fn load_doc(doc: &Value) -> ArtifactResult<Booster> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xgboost_model_tuned.json");
        std::fs::write(&path, doc.to_string()).unwrap();
        Booster::load(&path)
    }

    #[test]
    fn test_load_real_shaped_dump() {
        let booster = load_doc(&booster_doc()).unwrap();
        assert_eq!(booster.name(), "xgboost");
        assert_eq!(booster.num_features(), 3);
        assert_eq!(booster.base_score, 0.5);
    }

    #[test]
    fn test_prediction_sums_leaves_and_base_score() {
        let booster = load_doc(&booster_doc()).unwrap();
        // 0.5 + 1.5 + 0.25: first tree goes left (5 < 10).
        assert_eq!(booster.predict(&[5.0, 0.0, 0.0]).unwrap(), 2.25);
        // 0.5 - 0.5 + 0.25: first tree goes right.
        assert_eq!(booster.predict(&[15.0, 0.0, 0.0]).unwrap(), 0.25);
    }

    #[test]
    fn test_split_boundary_goes_right() {
        let booster = load_doc(&booster_doc()).unwrap();
        assert_eq!(booster.predict(&[10.0, 0.0, 0.0]).unwrap(), 0.25);
    }

    #[test]
    fn test_deep_tree_traversal() {
        let mut doc = booster_doc();
        doc["learner"]["gradient_booster"]["model"]["trees"] = json!([{
            "left_children": [1, 3, -1, -1, -1],
            "right_children": [2, 4, -1, -1, -1],
            "split_indices": [1, 2, 0, 0, 0],
            "split_conditions": [0.0, 1.0, 5.0, 1.0, 2.0],
        }]);
        let booster = load_doc(&doc).unwrap();
        assert_eq!(booster.predict(&[0.0, -1.0, 0.0]).unwrap(), 1.5);
        assert_eq!(booster.predict(&[0.0, -1.0, 3.0]).unwrap(), 2.5);
        assert_eq!(booster.predict(&[0.0, 1.0, 0.0]).unwrap(), 5.5);
    }

    #[test]
    fn test_width_mismatch_rejected() {
        let booster = load_doc(&booster_doc()).unwrap();
        let err = booster.predict(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_rejects_gblinear() {
        let mut doc = booster_doc();
        doc["learner"]["gradient_booster"]["name"] = json!("gblinear");
        let err = load_doc(&doc).unwrap_err();
        assert!(err.to_string().contains("unsupported booster type"));
    }

    #[test]
    fn test_rejects_non_regression_objective() {
        let mut doc = booster_doc();
        doc["learner"]["objective"]["name"] = json!("binary:logistic");
        let err = load_doc(&doc).unwrap_err();
        assert!(err.to_string().contains("unsupported objective"));
    }

    #[test]
    fn test_rejects_unparseable_learner_params() {
        let mut doc = booster_doc();
        doc["learner"]["learner_model_param"]["base_score"] = json!("many");
        let err = load_doc(&doc).unwrap_err();
        assert!(err.to_string().contains("base_score"));

        let mut doc = booster_doc();
        doc["learner"]["learner_model_param"]["num_feature"] = json!("3.5");
        let err = load_doc(&doc).unwrap_err();
        assert!(err.to_string().contains("num_feature"));
    }

    #[test]
    fn test_rejects_inconsistent_node_arrays() {
        let mut doc = booster_doc();
        doc["learner"]["gradient_booster"]["model"]["trees"][0]["split_indices"] = json!([0]);
        let err = load_doc(&doc).unwrap_err();
        assert!(err.to_string().contains("inconsistent node array lengths"));
    }

    #[test]
    fn test_rejects_child_index_out_of_bounds() {
        let mut doc = booster_doc();
        doc["learner"]["gradient_booster"]["model"]["trees"][0]["right_children"] =
            json!([9, -1, -1]);
        let err = load_doc(&doc).unwrap_err();
        assert!(err.to_string().contains("points past the node array"));
    }

    #[test]
    fn test_rejects_backward_child_edge() {
        let mut doc = booster_doc();
        doc["learner"]["gradient_booster"]["model"]["trees"] = json!([{
            "left_children": [1, 0, -1],
            "right_children": [2, 2, -1],
            "split_indices": [0, 1, 0],
            "split_conditions": [1.0, 2.0, 3.0],
        }]);
        let err = load_doc(&doc).unwrap_err();
        assert!(err.to_string().contains("has a child before it"));
    }

    #[test]
    fn test_rejects_split_on_unknown_feature() {
        let mut doc = booster_doc();
        doc["learner"]["gradient_booster"]["model"]["trees"][0]["split_indices"] =
            json!([7, 0, 0]);
        let err = load_doc(&doc).unwrap_err();
        assert!(err.to_string().contains("splits on feature 7 of 3"));
    }

    #[test]
    fn test_rejects_empty_ensemble() {
        let mut doc = booster_doc();
        doc["learner"]["gradient_booster"]["model"]["trees"] = json!([]);
        let err = load_doc(&doc).unwrap_err();
        assert!(err.to_string().contains("no trees"));
    }

    #[test]
    fn test_missing_file_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Booster::load(&dir.path().join("xgboost_model_tuned.json")).unwrap_err();
        assert!(matches!(err, ArtifactError::Missing { .. }));
        assert!(err.to_string().contains("xgboost_model_tuned.json"));
    }
}
