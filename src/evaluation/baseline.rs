//! Naive lag baseline: tomorrow's price equals the same period's price one
//! day earlier, read straight from the engineered lag column.

use super::metrics::{evaluate, MetricRecord};
use crate::data::Table;
use crate::error::Result;
use tracing::debug;

pub const NAIVE_BASELINE_LABEL: &str = "Naive_24h_Lag";

/// Default suffix appended to the target name to find its previous-day lag.
pub const DEFAULT_LAG_SUFFIX: &str = " Previous Day";

pub fn lag_column_name(target: &str, suffix: &str) -> String {
    format!("{target}{suffix}")
}

/// Score the lag column of `test` as a forecast of its `target` column.
pub fn naive_baseline(test: &Table, target: &str, lag_column: &str) -> Result<MetricRecord> {
    let actual = test.column(target)?;
    let predicted = test.column(lag_column)?;
    debug!(lag_column, rows = actual.len(), "scoring naive baseline");

    evaluate(actual, predicted, NAIVE_BASELINE_LABEL)
}
