//! Dataset loading
//!
//! Reads versioned parquet/CSV files through polars and converts them into
//! [`Table`]s. Temporal columns are converted through their physical integer
//! representation; any null aborts the load.

use super::{Column, Table};
use crate::error::{EvalError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// On-disk format of the processed datasets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DataFormat {
    Parquet,
    Csv,
}

/// `<dir>/<name>_<version>_<datestamp>.<format>`
pub fn dataset_path(
    dir: &Path,
    name: &str,
    version: &str,
    datestamp: &str,
    format: DataFormat,
) -> PathBuf {
    dir.join(format!("{name}_{version}_{datestamp}.{format}"))
}

/// Load a dataset, dropping `skip_columns` (index columns written by the
/// upstream processing step) when present.
pub fn load_table(path: &Path, format: DataFormat, skip_columns: &[String]) -> Result<Table> {
    let frame = read_frame(path, format)?;
    info!(path = %path.display(), rows = frame.height(), cols = frame.width(), "dataset loaded");
    frame_to_table(&frame, skip_columns)
}

fn read_frame(path: &Path, format: DataFormat) -> Result<DataFrame> {
    let read = match format {
        DataFormat::Parquet => {
            let file = File::open(path).map_err(|source| EvalError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            ParquetReader::new(file).finish()
        }
        DataFormat::Csv => {
            CsvReader::from_path(path).and_then(|reader| reader.has_header(true).finish())
        }
    };

    read.map_err(|source| EvalError::DataLoad {
        path: path.to_path_buf(),
        source,
    })
}

/// Convert every column of `frame` (except `skip_columns`) to `f64`.
pub fn frame_to_table(frame: &DataFrame, skip_columns: &[String]) -> Result<Table> {
    let mut columns = Vec::with_capacity(frame.width());

    for series in frame.get_columns() {
        if skip_columns.iter().any(|skip| skip == series.name()) {
            debug!(column = series.name(), "skipping index column");
            continue;
        }
        columns.push(Column::new(series.name(), series_values(series)?));
    }

    Table::new(columns)
}

fn series_values(series: &Series) -> Result<Vec<f64>> {
    let conversion = |source: PolarsError| EvalError::ColumnConversion {
        column: series.name().to_string(),
        source,
    };

    let physical = series.to_physical_repr();
    let floats = physical.cast(&DataType::Float64).map_err(conversion)?;
    let values = floats.f64().map_err(conversion)?;

    values
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| EvalError::NullValue {
                column: series.name().to_string(),
                row,
            })
        })
        .collect()
}
