//! Feature importances
//!
//! smartcore trees do not expose impurity-based importances, so tree models
//! are measured by permutation: shuffle one feature at a time and record how
//! much the training MSE rises. Raw increases are clipped at zero and
//! normalised to sum to 1.

use super::smartcore::matrix_from_columns;
use crate::data::Table;
use crate::error::ModelError;
use crate::evaluation::metrics::mean_squared_error;
use ordered_float::OrderedFloat;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use smartcore::linalg::basic::matrix::DenseMatrix;
use tracing::debug;

/// Weight of one feature in a fitted model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

#[derive(Debug, Clone)]
pub struct PermutationOptions {
    pub seed: u64,
    /// Rows sampled (evenly strided) from the training set, 0 for all
    pub max_rows: usize,
    /// rayon worker count, <= 0 for the default pool size
    pub n_jobs: i32,
}

/// Permutation importance of every column of `features`, in column order.
pub fn permutation_importances<F>(
    predict: F,
    features: &Table,
    target: &[f64],
    options: &PermutationOptions,
) -> Result<Vec<f64>, ModelError>
where
    F: Fn(&DenseMatrix<f64>) -> Result<Vec<f64>, ModelError> + Sync,
{
    let rows = sample_rows(features.n_rows(), options.max_rows);
    let columns: Vec<Vec<f64>> = features
        .columns()
        .iter()
        .map(|c| rows.iter().map(|&r| c.values[r]).collect())
        .collect();
    let y: Vec<f64> = rows.iter().map(|&r| target[r]).collect();

    let base = matrix_from_columns(rows.len(), columns.iter().map(Vec::as_slice));
    let base_error = mean_squared_error(&y, &predict(&base)?);
    debug!(rows = rows.len(), features = columns.len(), base_error, "permutation importances");

    let score_feature = |j: usize| -> Result<f64, ModelError> {
        let mut shuffled = columns[j].clone();
        let mut rng = StdRng::seed_from_u64(options.seed.wrapping_add(j as u64));
        shuffled.shuffle(&mut rng);

        let permuted = matrix_from_columns(
            rows.len(),
            columns
                .iter()
                .enumerate()
                .map(|(k, c)| if k == j { shuffled.as_slice() } else { c.as_slice() }),
        );
        let error = mean_squared_error(&y, &predict(&permuted)?);
        Ok((error - base_error).max(0.0))
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(worker_threads(options.n_jobs))
        .build()
        .map_err(|e| ModelError::Importance(e.to_string()))?;
    let raw = pool.install(|| {
        (0..columns.len())
            .into_par_iter()
            .map(score_feature)
            .collect::<Result<Vec<f64>, ModelError>>()
    })?;

    Ok(normalize(raw))
}

/// Rank `weights` (aligned with `names`) in descending order, keeping `top_k`.
/// Ties keep column order.
pub fn rank(names: &[&str], weights: &[f64], top_k: usize) -> Vec<FeatureImportance> {
    let mut ranked: Vec<FeatureImportance> = names
        .iter()
        .zip(weights)
        .map(|(name, &importance)| FeatureImportance {
            feature: name.to_string(),
            importance,
        })
        .collect();
    ranked.sort_by_key(|f| std::cmp::Reverse(OrderedFloat(f.importance)));
    ranked.truncate(top_k);
    ranked
}

fn sample_rows(n_rows: usize, max_rows: usize) -> Vec<usize> {
    if max_rows == 0 || n_rows <= max_rows {
        return (0..n_rows).collect();
    }
    (0..max_rows).map(|i| i * n_rows / max_rows).collect()
}

fn worker_threads(n_jobs: i32) -> usize {
    // rayon treats 0 as "pick from the environment / core count"
    usize::try_from(n_jobs).unwrap_or(0)
}

fn normalize(raw: Vec<f64>) -> Vec<f64> {
    let total: f64 = raw.iter().sum();
    if total > 0.0 && total.is_finite() {
        raw.into_iter().map(|v| v / total).collect()
    } else {
        vec![0.0; raw.len()]
    }
}
