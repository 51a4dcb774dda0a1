//! Evaluation
//!
//! - Metric engine shared by every model
//! - Naive lag baseline

pub mod baseline;
pub mod metrics;

pub use baseline::{lag_column_name, naive_baseline, NAIVE_BASELINE_LABEL};
pub use metrics::{evaluate, MetricRecord};
