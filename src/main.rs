use anyhow::{Context, Result};
use clap::Parser;
use dayahead_price_models::{config, pipeline, report, telemetry};
use config::{Config, LogFormat};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

/// Train and score day-ahead price models against a naive lag baseline.
#[derive(Debug, Parser)]
#[command(name = "price-models", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    config: PathBuf,

    /// Override `data.dir`
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override `report.top_k`
    #[arg(long)]
    top_k: Option<usize>,

    /// Emit JSON logs regardless of `logging.format`
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut cfg = Config::load(&cli.config)?;
    if let Some(dir) = cli.data_dir {
        cfg.data.dir = dir;
    }
    if let Some(top_k) = cli.top_k {
        cfg.report.top_k = top_k;
    }
    cfg.check()?;

    let log_format = if cli.json_logs { LogFormat::Json } else { cfg.logging.format };
    telemetry::init_tracing(log_format);

    info!(
        train = %cfg.data.train_path().display(),
        test = %cfg.data.test_path().display(),
        target = %cfg.target.column,
        models = cfg.models.len(),
        "starting evaluation"
    );

    let summary = pipeline::run(&cfg)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report::print_summary(&mut out, &summary, cfg.report.top_k).context("failed to write report")?;
    out.flush()?;

    info!("evaluation complete");
    Ok(())
}
