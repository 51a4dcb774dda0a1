//! SmartCore Model Wrappers
//!
//! One [`FittedModel`] variant per algorithm family. Fitting and prediction
//! are delegated to smartcore; tree variants also carry the permutation
//! importances measured on their training data.

use super::importance::{self, PermutationOptions};
use super::{LinearSolver, ModelSpec};
use crate::data::Table;
use crate::error::ModelError;
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::error::Failed;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::lasso::{Lasso, LassoParameters};
use smartcore::linear::linear_regression::{
    LinearRegression, LinearRegressionParameters, LinearRegressionSolverName,
};
use smartcore::linear::ridge_regression::{RidgeRegression, RidgeRegressionParameters};
use smartcore::tree::decision_tree_regressor::{
    DecisionTreeRegressor, DecisionTreeRegressorParameters,
};

type Matrix = DenseMatrix<f64>;

/// A trained regressor.
pub enum FittedModel {
    Linear(LinearRegression<f64, f64, Matrix, Vec<f64>>),
    Ridge(RidgeRegression<f64, f64, Matrix, Vec<f64>>),
    Lasso(Lasso<f64, f64, Matrix, Vec<f64>>),
    DecisionTree {
        model: DecisionTreeRegressor<f64, f64, Matrix, Vec<f64>>,
        importances: Vec<f64>,
    },
    RandomForest {
        model: RandomForestRegressor<f64, f64, Matrix, Vec<f64>>,
        importances: Vec<f64>,
    },
}

impl FittedModel {
    /// Fit `spec` on the full training set.
    pub fn fit(spec: &ModelSpec, features: &Table, target: &[f64]) -> Result<Self, ModelError> {
        if features.is_empty() || target.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        if features.n_cols() == 0 {
            return Err(ModelError::Fit("no feature columns".to_string()));
        }
        if features.n_rows() != target.len() {
            return Err(ModelError::Fit(format!(
                "feature and target count mismatch: {} rows, {} targets",
                features.n_rows(),
                target.len()
            )));
        }

        let x = feature_matrix(features);
        let y = target.to_vec();

        let fitted = match spec {
            ModelSpec::Linear(p) => {
                let solver = match p.solver {
                    LinearSolver::Qr => LinearRegressionSolverName::QR,
                    LinearSolver::Svd => LinearRegressionSolverName::SVD,
                };
                let params = LinearRegressionParameters::default().with_solver(solver);
                FittedModel::Linear(LinearRegression::fit(&x, &y, params).map_err(fit_failed)?)
            }
            ModelSpec::Ridge(p) => {
                let params = RidgeRegressionParameters::default()
                    .with_alpha(p.alpha)
                    .with_normalize(p.normalize);
                FittedModel::Ridge(RidgeRegression::fit(&x, &y, params).map_err(fit_failed)?)
            }
            ModelSpec::Lasso(p) => {
                let params = LassoParameters::default()
                    .with_alpha(p.alpha)
                    .with_normalize(p.normalize)
                    .with_tol(p.tol)
                    .with_max_iter(p.max_iter);
                FittedModel::Lasso(Lasso::fit(&x, &y, params).map_err(fit_failed)?)
            }
            ModelSpec::DecisionTree(p) => {
                let mut params = DecisionTreeRegressorParameters::default()
                    .with_min_samples_leaf(p.min_samples_leaf)
                    .with_min_samples_split(p.min_samples_split);
                if let Some(depth) = p.max_depth {
                    params = params.with_max_depth(depth);
                }
                let model = DecisionTreeRegressor::fit(&x, &y, params).map_err(fit_failed)?;
                let importances = importance::permutation_importances(
                    |m| model.predict(m).map_err(predict_failed),
                    features,
                    target,
                    &PermutationOptions {
                        seed: p.seed,
                        max_rows: p.importance_rows,
                        n_jobs: 1,
                    },
                )?;
                FittedModel::DecisionTree { model, importances }
            }
            ModelSpec::RandomForest(p) => {
                let params = RandomForestRegressorParameters {
                    max_depth: p.max_depth,
                    min_samples_leaf: p.min_samples_leaf,
                    min_samples_split: p.min_samples_split,
                    n_trees: p.n_trees,
                    m: p.max_features,
                    keep_samples: false, // Don't store training samples (saves memory)
                    seed: p.seed,
                };
                let model = RandomForestRegressor::fit(&x, &y, params).map_err(fit_failed)?;
                let importances = importance::permutation_importances(
                    |m| model.predict(m).map_err(predict_failed),
                    features,
                    target,
                    &PermutationOptions {
                        seed: p.seed,
                        max_rows: p.importance_rows,
                        n_jobs: p.n_jobs,
                    },
                )?;
                FittedModel::RandomForest { model, importances }
            }
        };

        Ok(fitted)
    }

    /// Predict one value per row of `features`.
    pub fn predict(&self, features: &Table) -> Result<Vec<f64>, ModelError> {
        if features.is_empty() {
            return Ok(Vec::new());
        }
        self.predict_matrix(&feature_matrix(features))
    }

    fn predict_matrix(&self, x: &Matrix) -> Result<Vec<f64>, ModelError> {
        match self {
            FittedModel::Linear(model) => model.predict(x),
            FittedModel::Ridge(model) => model.predict(x),
            FittedModel::Lasso(model) => model.predict(x),
            FittedModel::DecisionTree { model, .. } => model.predict(x),
            FittedModel::RandomForest { model, .. } => model.predict(x),
        }
        .map_err(predict_failed)
    }

    /// Per-feature weights in training column order, for models that expose them.
    pub fn feature_importances(&self) -> Option<&[f64]> {
        match self {
            FittedModel::DecisionTree { importances, .. }
            | FittedModel::RandomForest { importances, .. } => Some(importances),
            _ => None,
        }
    }
}

fn fit_failed(err: Failed) -> ModelError {
    ModelError::Fit(err.to_string())
}

fn predict_failed(err: Failed) -> ModelError {
    ModelError::Predict(err.to_string())
}

/// Column-major matrix of every column of `table`.
pub(crate) fn feature_matrix(table: &Table) -> Matrix {
    matrix_from_columns(
        table.n_rows(),
        table.columns().iter().map(|c| c.values.as_slice()),
    )
}

pub(crate) fn matrix_from_columns<'a>(
    n_rows: usize,
    columns: impl IntoIterator<Item = &'a [f64]>,
) -> Matrix {
    let mut flat = Vec::new();
    let mut n_cols = 0;
    for column in columns {
        flat.extend_from_slice(column);
        n_cols += 1;
    }
    DenseMatrix::new(n_rows, n_cols, flat, true)
}
