//! Machine Learning Module
//!
//! Regression models compared against the naive baseline:
//! - Ordinary least squares, ridge and lasso
//! - Decision tree and random forest (with permutation feature importances)
//!
//! # Architecture
//! - [`ModelSpec`] is the configured algorithm plus hyperparameters
//! - `FittedModel` is one variant per algorithm family, fitted by smartcore
//! - [`training::run_models`] fits, predicts and scores a registry in order

use serde::{Deserialize, Serialize};

pub mod importance;
pub mod smartcore;
pub mod training;

pub use importance::FeatureImportance;
pub use self::smartcore::FittedModel;
pub use training::{run_models, ModelRun};

/// One labelled entry of the model registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub label: String,
    pub model: ModelSpec,
}

impl ModelEntry {
    pub fn new(label: impl Into<String>, model: ModelSpec) -> Self {
        Self {
            label: label.into(),
            model,
        }
    }
}

/// Algorithm choice and hyperparameters, selected by `kind` in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, strum::Display)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ModelSpec {
    Linear(LinearParams),
    Ridge(RidgeParams),
    Lasso(LassoParams),
    DecisionTree(TreeParams),
    RandomForest(ForestParams),
}

impl ModelSpec {
    /// Check hyperparameters that smartcore would otherwise reject mid-run.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ModelSpec::Linear(_) => Ok(()),
            ModelSpec::Ridge(p) => non_negative("alpha", p.alpha),
            ModelSpec::Lasso(p) => {
                non_negative("alpha", p.alpha)?;
                if p.max_iter == 0 {
                    return Err("max_iter must be at least 1".to_string());
                }
                if p.tol <= 0.0 {
                    return Err("tol must be positive".to_string());
                }
                Ok(())
            }
            ModelSpec::DecisionTree(p) => {
                split_sizes(p.min_samples_leaf, p.min_samples_split)?;
                depth(p.max_depth)
            }
            ModelSpec::RandomForest(p) => {
                if p.n_trees == 0 {
                    return Err("n_trees must be at least 1".to_string());
                }
                if p.max_features == Some(0) {
                    return Err("max_features must be at least 1".to_string());
                }
                split_sizes(p.min_samples_leaf, p.min_samples_split)?;
                depth(p.max_depth)
            }
        }
    }
}

fn non_negative(name: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!("{name} must be a finite, non-negative number (got {value})"))
    }
}

fn split_sizes(min_samples_leaf: usize, min_samples_split: usize) -> Result<(), String> {
    if min_samples_leaf == 0 {
        return Err("min_samples_leaf must be at least 1".to_string());
    }
    if min_samples_split < 2 {
        return Err("min_samples_split must be at least 2".to_string());
    }
    Ok(())
}

fn depth(max_depth: Option<u16>) -> Result<(), String> {
    match max_depth {
        Some(0) => Err("max_depth must be at least 1".to_string()),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinearSolver {
    #[default]
    Qr,
    Svd,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearParams {
    pub solver: LinearSolver,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RidgeParams {
    /// Regularization strength
    pub alpha: f64,
    /// Standardize features before fitting
    pub normalize: bool,
}

impl Default for RidgeParams {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            normalize: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LassoParams {
    pub alpha: f64,
    pub normalize: bool,
    pub tol: f64,
    pub max_iter: usize,
}

impl Default for LassoParams {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            normalize: true,
            tol: 1e-4,
            max_iter: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeParams {
    pub max_depth: Option<u16>,
    pub min_samples_leaf: usize,
    pub min_samples_split: usize,
    /// Seed for the permutation importance shuffles
    pub seed: u64,
    /// Upper bound on training rows used for permutation importances
    pub importance_rows: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: Some(12),
            min_samples_leaf: 1,
            min_samples_split: 2,
            seed: 2025,
            importance_rows: 5_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: Option<u16>,
    pub min_samples_leaf: usize,
    pub min_samples_split: usize,
    /// Features considered per split; smartcore picks its own default when unset
    pub max_features: Option<usize>,
    pub seed: u64,
    /// Worker threads for importance computation, <= 0 uses every core
    pub n_jobs: i32,
    pub importance_rows: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: Some(16),
            min_samples_leaf: 1,
            min_samples_split: 2,
            max_features: None,
            seed: 2025,
            n_jobs: -1,
            importance_rows: 5_000,
        }
    }
}

/// Registry used when the configuration does not list any models.
pub fn default_registry() -> Vec<ModelEntry> {
    vec![
        ModelEntry::new("LinearRegression", ModelSpec::Linear(LinearParams::default())),
        ModelEntry::new("Ridge", ModelSpec::Ridge(RidgeParams::default())),
        ModelEntry::new("Lasso", ModelSpec::Lasso(LassoParams::default())),
        ModelEntry::new("RandomForest", ModelSpec::RandomForest(ForestParams::default())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_is_valid() {
        let registry = default_registry();
        assert_eq!(registry.len(), 4);
        assert!(registry.iter().all(|e| e.model.validate().is_ok()));
    }

    #[test]
    fn test_spec_kind_display() {
        assert_eq!(
            ModelSpec::RandomForest(ForestParams::default()).to_string(),
            "random_forest"
        );
        assert_eq!(ModelSpec::Linear(LinearParams::default()).to_string(), "linear");
    }

    #[test]
    fn test_invalid_params() {
        let ridge = ModelSpec::Ridge(RidgeParams {
            alpha: -1.0,
            normalize: false,
        });
        assert!(ridge.validate().is_err());

        let forest = ModelSpec::RandomForest(ForestParams {
            n_trees: 0,
            ..ForestParams::default()
        });
        assert!(forest.validate().is_err());

        let tree = ModelSpec::DecisionTree(TreeParams {
            min_samples_split: 1,
            ..TreeParams::default()
        });
        assert!(tree.validate().is_err());
    }
}
