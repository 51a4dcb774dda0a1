//! Day-ahead electricity price models.
//!
//! Loads the processed train/test datasets, scores a naive previous-day lag
//! baseline, fits the configured smartcore regressors and reports a metrics
//! leaderboard with the top feature importances of the best tree model.

pub mod config;
pub mod data;
pub mod error;
pub mod evaluation;
pub mod ml;
pub mod pipeline;
pub mod report;
pub mod telemetry;

pub use error::{EvalError, ModelError, Result};
