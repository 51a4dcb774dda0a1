use crate::data::loader::{dataset_path, DataFormat};
use crate::evaluation::baseline::{lag_column_name, DEFAULT_LAG_SUFFIX};
use crate::ml::{default_registry, ModelEntry};
use crate::report::DEFAULT_TOP_K;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use validator::Validate;

pub const ENV_PREFIX: &str = "PRICE_MODELS__";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub data: DataConfig,
    #[validate(nested)]
    pub target: TargetConfig,
    #[validate(nested)]
    pub report: ReportConfig,
    pub logging: LoggingConfig,
    pub models: Vec<ModelEntry>,
}

/// Location and versioning of the processed train/test datasets.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DataConfig {
    pub dir: PathBuf,
    #[validate(length(min = 1))]
    pub train_name: String,
    #[validate(length(min = 1))]
    pub test_name: String,
    #[validate(length(min = 1))]
    pub version: String,
    /// `%Y%m%d`
    #[validate(length(equal = 8))]
    pub datestamp: String,
    pub format: DataFormat,
    /// Columns dropped on load (pandas index columns)
    pub skip_columns: Vec<String>,
}

impl DataConfig {
    pub fn train_path(&self) -> PathBuf {
        self.path_for(&self.train_name)
    }

    pub fn test_path(&self) -> PathBuf {
        self.path_for(&self.test_name)
    }

    fn path_for(&self, name: &str) -> PathBuf {
        dataset_path(&self.dir, name, &self.version, &self.datestamp, self.format)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TargetConfig {
    #[validate(length(min = 1))]
    pub column: String,
    /// Appended to `column` to name the previous-day lag feature
    pub lag_suffix: String,
    /// Explicit lag column, overrides `lag_suffix`
    pub lag_column: Option<String>,
}

impl TargetConfig {
    pub fn lag_column(&self) -> String {
        self.lag_column
            .clone()
            .unwrap_or_else(|| lag_column_name(&self.column, &self.lag_suffix))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReportConfig {
    #[validate(range(min = 1))]
    pub top_k: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                dir: PathBuf::from("data/processed"),
                train_name: "train".to_string(),
                test_name: "test".to_string(),
                version: "v1".to_string(),
                datestamp: "20251003".to_string(),
                format: DataFormat::Parquet,
                skip_columns: vec!["__index_level_0__".to_string()],
            },
            target: TargetConfig {
                column: "Germany/Luxembourg [€/MWh]".to_string(),
                lag_suffix: DEFAULT_LAG_SUFFIX.to_string(),
                lag_column: None,
            },
            report: ReportConfig {
                top_k: DEFAULT_TOP_K,
            },
            logging: LoggingConfig {
                format: LogFormat::Pretty,
            },
            models: default_registry(),
        }
    }
}

impl Config {
    /// Defaults, then the TOML file at `path` (if present), then `PRICE_MODELS__*` env vars.
    pub fn load(path: &Path) -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        let cfg: Config = figment
            .extract()
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        cfg.check()?;
        Ok(cfg)
    }

    /// Field rules plus the checks `validator` cannot express.
    pub fn check(&self) -> Result<()> {
        self.validate().context("configuration validation failed")?;

        chrono::NaiveDate::parse_from_str(&self.data.datestamp, "%Y%m%d").with_context(|| {
            format!("data.datestamp `{}` is not a %Y%m%d date", self.data.datestamp)
        })?;

        if self.target.lag_column() == self.target.column {
            anyhow::bail!("lag column must differ from the target column");
        }

        let mut labels = HashSet::with_capacity(self.models.len());
        for entry in &self.models {
            if entry.label.trim().is_empty() {
                anyhow::bail!("model labels must not be empty");
            }
            if !labels.insert(entry.label.as_str()) {
                anyhow::bail!("duplicate model label `{}`", entry.label);
            }
            if let Err(reason) = entry.model.validate() {
                anyhow::bail!("model `{}`: {reason}", entry.label);
            }
        }
        Ok(())
    }
}
