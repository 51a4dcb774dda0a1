//! Error types shared by the loading, evaluation and model layers.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = EvalError> = std::result::Result<T, E>;

/// Errors raised while loading data, splitting tables, scoring or fitting models.
///
/// Every variant is fatal for a run: the pipeline stops at the first one.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("column `{column}` not found")]
    MissingColumn { column: String },

    #[error("length mismatch: y_true has {expected} values, y_pred has {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("cannot score an empty series")]
    EmptySeries,

    #[error("column `{column}` has {found} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column `{0}`")]
    DuplicateColumn(String),

    #[error("train and test feature columns differ (train: {train:?}, test: {test:?})")]
    FeatureMismatch {
        train: Vec<String>,
        test: Vec<String>,
    },

    #[error("column `{column}` has a missing value at row {row}")]
    NullValue { column: String, row: usize },

    #[error("failed to open {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read dataset {}", path.display())]
    DataLoad {
        path: PathBuf,
        #[source]
        source: polars::prelude::PolarsError,
    },

    #[error("column `{column}` cannot be converted to f64")]
    ColumnConversion {
        column: String,
        #[source]
        source: polars::prelude::PolarsError,
    },

    #[error("model `{label}` failed")]
    Model {
        label: String,
        #[source]
        source: ModelError,
    },
}

/// Failures reported by the learning library, before a label is attached.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("fit failed: {0}")]
    Fit(String),

    #[error("predict failed: {0}")]
    Predict(String),

    #[error("feature importance failed: {0}")]
    Importance(String),

    #[error("cannot fit on an empty training set")]
    EmptyTrainingSet,
}

impl ModelError {
    pub fn with_label(self, label: impl Into<String>) -> EvalError {
        EvalError::Model {
            label: label.into(),
            source: self,
        }
    }
}
