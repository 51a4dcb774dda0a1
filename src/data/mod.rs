//! Tabular data
//!
//! In-memory tables of named `f64` columns, plus the feature/target split
//! every model and the baseline work from.

use crate::error::{EvalError, Result};
use std::collections::HashSet;

pub mod loader;

/// A named column of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Ordered collection of equal-length columns with unique names.
///
/// Rows line up index-for-index across columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(EvalError::DuplicateColumn(column.name.clone()));
            }
        }

        if let Some(first) = columns.first() {
            let expected = first.values.len();
            if let Some(bad) = columns.iter().find(|c| c.values.len() != expected) {
                return Err(EvalError::RaggedColumn {
                    column: bad.name.clone(),
                    expected,
                    found: bad.values.len(),
                });
            }
        }

        Ok(Self { columns })
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols())
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Values of the named column.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| EvalError::MissingColumn {
                column: name.to_string(),
            })
    }
}

/// Split `table` into its feature table (every other column, order kept) and
/// the `target` column.
pub fn split(table: &Table, target: &str) -> Result<(Table, Vec<f64>)> {
    let target_values = table.column(target)?.to_vec();
    let features = table
        .columns
        .iter()
        .filter(|c| c.name != target)
        .cloned()
        .collect();

    Ok((Table { columns: features }, target_values))
}

/// Fails unless both feature tables carry the same columns in the same order.
pub fn ensure_aligned(train: &Table, test: &Table) -> Result<()> {
    let train_names = train.column_names();
    let test_names = test.column_names();
    if train_names != test_names {
        return Err(EvalError::FeatureMismatch {
            train: train_names.into_iter().map(String::from).collect(),
            test: test_names.into_iter().map(String::from).collect(),
        });
    }
    Ok(())
}
