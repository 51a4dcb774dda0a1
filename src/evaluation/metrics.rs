//! Regression Metrics
//!
//! RMSE, MAE, R² and sMAPE between a true and a predicted series. Price
//! series may be zero or negative, so sMAPE uses the symmetric denominator
//! `|y_true| + |y_pred|` and treats an all-zero row as a perfect hit.

use crate::error::{EvalError, Result};
use serde::Serialize;
use std::fmt;

/// Scores of one evaluated model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRecord {
    pub label: String,
    /// Root Mean Square Error
    pub rmse: f64,
    /// Mean Absolute Error
    pub mae: f64,
    /// R² (coefficient of determination)
    pub r2: f64,
    /// Symmetric Mean Absolute Percentage Error, in [0, 200]
    pub smape: f64,
}

impl fmt::Display for MetricRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: RMSE={:.3}, MAE={:.3}, R²={:.3}, sMAPE={:.2}%",
            self.label, self.rmse, self.mae, self.r2, self.smape
        )
    }
}

/// Score `y_pred` against `y_true`.
pub fn evaluate(y_true: &[f64], y_pred: &[f64], label: impl Into<String>) -> Result<MetricRecord> {
    check_lengths(y_true, y_pred)?;

    Ok(MetricRecord {
        label: label.into(),
        rmse: mean_squared_error(y_true, y_pred).sqrt(),
        mae: mean_absolute_error(y_true, y_pred),
        r2: r2_score(y_true, y_pred),
        smape: smape(y_true, y_pred),
    })
}

fn check_lengths(y_true: &[f64], y_pred: &[f64]) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(EvalError::LengthMismatch {
            expected: y_true.len(),
            found: y_pred.len(),
        });
    }
    if y_true.is_empty() {
        return Err(EvalError::EmptySeries);
    }
    Ok(())
}

// The helpers below assume equal, non-zero lengths.

pub(crate) fn mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let n = y_true.len() as f64;
    y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).powi(2))
        .sum::<f64>()
        / n
}

fn mean_absolute_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let n = y_true.len() as f64;
    y_true.iter().zip(y_pred).map(|(t, p)| (t - p).abs()).sum::<f64>() / n
}

/// R² with a finite fallback for a constant `y_true`: 1.0 when the
/// prediction is exact, 0.0 otherwise.
fn r2_score(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let n = y_true.len() as f64;
    let mean = y_true.iter().sum::<f64>() / n;
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();
    let ss_res: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

fn smape(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let n = y_true.len() as f64;
    let total: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| {
            let denominator = t.abs() + p.abs();
            if denominator == 0.0 {
                0.0
            } else {
                (t - p).abs() / denominator
            }
        })
        .sum();

    200.0 * total / n
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_perfect_forecast() {
        let actual = vec![1.0, -2.0, 0.0, 4.0, 5.0];

        let m = evaluate(&actual, &actual, "perfect").unwrap();

        assert_eq!(m.label, "perfect");
        assert_eq!(m.rmse, 0.0);
        assert_eq!(m.mae, 0.0);
        assert_eq!(m.r2, 1.0);
        assert_eq!(m.smape, 0.0);
    }

    #[test]
    fn test_lag_example() {
        let m = evaluate(&[10.0, 20.0, -5.0], &[12.0, 18.0, -5.0], "lag").unwrap();

        assert!((m.rmse - (8.0f64 / 3.0).sqrt()).abs() < EPS);
        assert!((m.mae - 4.0 / 3.0).abs() < EPS);
        // (2/22 + 2/38 + 0) * 200 / 3
        let expected = 200.0 * (2.0 / 22.0 + 2.0 / 38.0) / 3.0;
        assert!((m.smape - expected).abs() < EPS);
    }

    #[test]
    fn test_smape_zero_row() {
        let m = evaluate(&[0.0], &[0.0], "zeros").unwrap();
        assert_eq!(m.smape, 0.0);

        let m = evaluate(&[0.0, 10.0], &[0.0, 0.0], "mixed").unwrap();
        assert!((m.smape - 100.0).abs() < EPS);
    }

    #[rstest]
    #[case(vec![3.0, 3.0, 3.0], vec![3.0, 3.0, 3.0], 1.0)]
    #[case(vec![3.0, 3.0, 3.0], vec![2.0, 3.0, 4.0], 0.0)]
    fn test_r2_constant_target(#[case] actual: Vec<f64>, #[case] predicted: Vec<f64>, #[case] r2: f64) {
        let m = evaluate(&actual, &predicted, "constant").unwrap();
        assert_eq!(m.r2, r2);
    }

    #[test]
    fn test_r2_mean_prediction_is_zero() {
        let m = evaluate(&[1.0, 2.0, 3.0], &[2.0, 2.0, 2.0], "mean").unwrap();
        assert!(m.r2.abs() < EPS);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = evaluate(&[1.0, 2.0, 3.0], &[1.0, 2.0], "short").unwrap_err();
        assert!(matches!(err, EvalError::LengthMismatch { expected: 3, found: 2 }));
    }

    #[test]
    fn test_empty_series() {
        assert!(matches!(evaluate(&[], &[], "empty"), Err(EvalError::EmptySeries)));
    }

    #[test]
    fn test_display() {
        let m = evaluate(&[1.0, 2.0], &[1.0, 2.0], "Ridge").unwrap();
        assert_eq!(m.to_string(), "Ridge: RMSE=0.000, MAE=0.000, R²=1.000, sMAPE=0.00%");
    }

    fn series() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
        (1usize..64).prop_flat_map(|n| {
            (
                prop::collection::vec(-500.0f64..500.0, n),
                prop::collection::vec(-500.0f64..500.0, n),
            )
        })
    }

    proptest! {
        #[test]
        fn prop_identical_series_score_perfectly(actual in prop::collection::vec(-500.0f64..500.0, 1..64)) {
            let m = evaluate(&actual, &actual, "same").unwrap();
            prop_assert_eq!(m.rmse, 0.0);
            prop_assert_eq!(m.mae, 0.0);
            prop_assert_eq!(m.r2, 1.0);
            prop_assert_eq!(m.smape, 0.0);
        }

        #[test]
        fn prop_constant_shift(
            actual in prop::collection::vec(-500.0f64..500.0, 1..64),
            shift in prop_oneof![-50.0f64..-0.5, 0.5f64..50.0],
        ) {
            let predicted: Vec<f64> = actual.iter().map(|v| v + shift).collect();
            let m = evaluate(&actual, &predicted, "shift").unwrap();
            prop_assert!((m.rmse - shift.abs()).abs() < 1e-6);
            prop_assert!((m.mae - shift.abs()).abs() < 1e-6);
        }

        #[test]
        fn prop_smape_bounded_and_symmetric((actual, predicted) in series()) {
            let forward = evaluate(&actual, &predicted, "a").unwrap();
            let backward = evaluate(&predicted, &actual, "b").unwrap();
            prop_assert!((0.0..=200.0).contains(&forward.smape));
            prop_assert!((forward.smape - backward.smape).abs() < 1e-9);
            prop_assert!(forward.r2 <= 1.0);
        }
    }
}
