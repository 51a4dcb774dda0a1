//! Model Runner
//!
//! Fits every registry entry on the full training set, predicts the test set
//! and scores it. The first failure aborts the run.

use super::importance::{self, FeatureImportance};
use super::{FittedModel, ModelEntry};
use crate::data::{ensure_aligned, Table};
use crate::error::Result;
use crate::evaluation::{evaluate, MetricRecord};
use std::time::Instant;
use tracing::info;

/// Outcome of one registry entry.
#[derive(Debug, Clone)]
pub struct ModelRun {
    pub record: MetricRecord,
    /// All features ranked by weight, for models that expose weights
    pub importances: Option<Vec<FeatureImportance>>,
}

pub fn run_models(
    registry: &[ModelEntry],
    train_features: &Table,
    train_target: &[f64],
    test_features: &Table,
    test_target: &[f64],
) -> Result<Vec<ModelRun>> {
    ensure_aligned(train_features, test_features)?;
    let feature_names = train_features.column_names();

    let mut runs = Vec::with_capacity(registry.len());
    for entry in registry {
        let started = Instant::now();
        info!(label = %entry.label, kind = %entry.model, "fitting model");

        let model = FittedModel::fit(&entry.model, train_features, train_target)
            .map_err(|e| e.with_label(&entry.label))?;
        let predictions = model
            .predict(test_features)
            .map_err(|e| e.with_label(&entry.label))?;
        let record = evaluate(test_target, &predictions, entry.label.as_str())?;

        info!(
            label = %entry.label,
            rmse = record.rmse,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "model evaluated"
        );

        let importances = model
            .feature_importances()
            .map(|weights| importance::rank(&feature_names, weights, usize::MAX));
        runs.push(ModelRun { record, importances });
    }

    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;
    use crate::error::{EvalError, ModelError};
    use crate::ml::{ForestParams, LinearParams, ModelSpec, RidgeParams};

    // price = 3 * load - 2 * wind, hour is noise
    fn dataset(offset: usize, n: usize) -> (Table, Vec<f64>) {
        let load: Vec<f64> = (offset..offset + n).map(|i| (i % 17) as f64 * 2.0).collect();
        let wind: Vec<f64> = (offset..offset + n).map(|i| ((i * 5) % 13) as f64).collect();
        let hour: Vec<f64> = (offset..offset + n).map(|i| (i % 24) as f64).collect();
        let price = load.iter().zip(&wind).map(|(l, w)| 3.0 * l - 2.0 * w).collect();
        let table = Table::new(vec![
            Column::new("load", load),
            Column::new("wind", wind),
            Column::new("hour", hour),
        ])
        .unwrap();
        (table, price)
    }

    #[test]
    fn test_runs_follow_registry_order() {
        let (train_x, train_y) = dataset(0, 120);
        let (test_x, test_y) = dataset(120, 40);
        let registry = vec![
            ModelEntry::new("Ridge", ModelSpec::Ridge(RidgeParams::default())),
            ModelEntry::new("OLS", ModelSpec::Linear(LinearParams::default())),
        ];

        let runs = run_models(&registry, &train_x, &train_y, &test_x, &test_y).unwrap();

        let labels: Vec<&str> = runs.iter().map(|r| r.record.label.as_str()).collect();
        assert_eq!(labels, vec!["Ridge", "OLS"]);
        assert!(runs[1].record.r2 > 0.999);
        assert!(runs.iter().all(|r| r.importances.is_none()));
    }

    #[test]
    fn test_forest_ranks_features() {
        let (train_x, train_y) = dataset(0, 200);
        let (test_x, test_y) = dataset(200, 50);
        let registry = vec![ModelEntry::new(
            "RandomForest",
            ModelSpec::RandomForest(ForestParams {
                n_trees: 20,
                max_features: Some(3),
                n_jobs: 1,
                ..ForestParams::default()
            }),
        )];

        let runs = run_models(&registry, &train_x, &train_y, &test_x, &test_y).unwrap();

        let ranked = runs[0].importances.as_ref().unwrap();
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].feature, "load");
        assert!(ranked.windows(2).all(|w| w[0].importance >= w[1].importance));
    }

    #[test]
    fn test_empty_registry() {
        let (train_x, train_y) = dataset(0, 10);
        let (test_x, test_y) = dataset(10, 5);

        let runs = run_models(&[], &train_x, &train_y, &test_x, &test_y).unwrap();
        assert!(runs.is_empty());
    }

    #[test]
    fn test_feature_mismatch_aborts() {
        let (train_x, train_y) = dataset(0, 10);
        let test_x = Table::new(vec![Column::new("load", vec![1.0])]).unwrap();
        let registry = vec![ModelEntry::new("OLS", ModelSpec::Linear(LinearParams::default()))];

        let err = run_models(&registry, &train_x, &train_y, &test_x, &[1.0]).unwrap_err();
        assert!(matches!(err, EvalError::FeatureMismatch { .. }));
    }

    #[test]
    fn test_fit_failure_carries_label() {
        let empty = Table::new(vec![
            Column::new("load", vec![]),
            Column::new("wind", vec![]),
            Column::new("hour", vec![]),
        ])
        .unwrap();
        let (test_x, test_y) = dataset(0, 5);
        let registry = vec![ModelEntry::new("OLS", ModelSpec::Linear(LinearParams::default()))];

        let err = run_models(&registry, &empty, &[], &test_x, &test_y).unwrap_err();
        assert!(matches!(
            err,
            EvalError::Model { label, source: ModelError::EmptyTrainingSet } if label == "OLS"
        ));
    }
}
