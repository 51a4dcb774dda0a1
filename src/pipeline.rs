//! Evaluation pipeline
//!
//! Load → split → baseline → models, returning everything the reporter
//! prints. Column checks (target, lag, feature alignment) all run before the
//! first model is fitted.

use crate::config::{Config, TargetConfig};
use crate::data::{ensure_aligned, loader, split, Table};
use crate::error::Result;
use crate::evaluation::{naive_baseline, MetricRecord};
use crate::ml::{run_models, FeatureImportance, ModelEntry};
use ordered_float::OrderedFloat;
use tracing::info;

/// Ranked importances of the model they were taken from.
#[derive(Debug, Clone)]
pub struct ImportanceReport {
    pub label: String,
    pub features: Vec<FeatureImportance>,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    /// (rows, columns) of the training features
    pub train_shape: (usize, usize),
    /// (rows, columns) of the test features
    pub test_shape: (usize, usize),
    /// Baseline first, then models in registry order
    pub leaderboard: Vec<MetricRecord>,
    /// From the lowest-RMSE model that exposes importances
    pub importances: Option<ImportanceReport>,
}

impl RunSummary {
    /// Lowest test RMSE on the leaderboard.
    pub fn best(&self) -> Option<&MetricRecord> {
        self.leaderboard
            .iter()
            .min_by_key(|record| OrderedFloat(record.rmse))
    }
}

/// Load both datasets named by `config` and evaluate them.
pub fn run(config: &Config) -> Result<RunSummary> {
    let train = loader::load_table(
        &config.data.train_path(),
        config.data.format,
        &config.data.skip_columns,
    )?;
    let test = loader::load_table(
        &config.data.test_path(),
        config.data.format,
        &config.data.skip_columns,
    )?;

    evaluate(&train, &test, &config.target, &config.models)
}

/// Score the naive baseline and every model of `registry` on in-memory tables.
pub fn evaluate(
    train: &Table,
    test: &Table,
    target: &TargetConfig,
    registry: &[ModelEntry],
) -> Result<RunSummary> {
    let (train_x, train_y) = split(train, &target.column)?;
    let (test_x, test_y) = split(test, &target.column)?;
    ensure_aligned(&train_x, &test_x)?;
    info!(train = ?train_x.shape(), test = ?test_x.shape(), "datasets split");

    let baseline = naive_baseline(test, &target.column, &target.lag_column())?;
    info!(rmse = baseline.rmse, "naive baseline scored");

    let runs = run_models(registry, &train_x, &train_y, &test_x, &test_y)?;

    let importances = runs
        .iter()
        .filter_map(|run| run.importances.as_ref().map(|features| (run, features)))
        .min_by_key(|(run, _)| OrderedFloat(run.record.rmse))
        .map(|(run, features)| ImportanceReport {
            label: run.record.label.clone(),
            features: features.clone(),
        });

    let mut leaderboard = Vec::with_capacity(runs.len() + 1);
    leaderboard.push(baseline);
    leaderboard.extend(runs.into_iter().map(|run| run.record));

    Ok(RunSummary {
        train_shape: train_x.shape(),
        test_shape: test_x.shape(),
        leaderboard,
        importances,
    })
}
