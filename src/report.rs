//! Console report: shapes line, metrics leaderboard, top feature importances.

use crate::evaluation::MetricRecord;
use crate::ml::FeatureImportance;
use crate::pipeline::RunSummary;
use ordered_float::OrderedFloat;
use std::io::{self, Write};

pub const DEFAULT_TOP_K: usize = 15;

const MODEL_HEADER: &str = "Model";
const FEATURE_HEADER: &str = "Feature";

pub fn print_shapes<W: Write>(
    out: &mut W,
    train: (usize, usize),
    test: (usize, usize),
) -> io::Result<()> {
    writeln!(
        out,
        "Train features: {} rows x {} cols | Test features: {} rows x {} cols",
        train.0, train.1, test.0, test.1
    )
}

/// One fixed-width line per record, in leaderboard order.
pub fn print_metrics<W: Write>(out: &mut W, leaderboard: &[MetricRecord]) -> io::Result<()> {
    let width = leaderboard
        .iter()
        .map(|r| r.label.chars().count())
        .max()
        .unwrap_or(0)
        .max(MODEL_HEADER.len());

    writeln!(
        out,
        "{:<width$}  {:>10}  {:>10}  {:>8}  {:>8}",
        MODEL_HEADER, "RMSE", "MAE", "R2", "sMAPE"
    )?;
    writeln!(out, "{}", "-".repeat(width + 44))?;
    for r in leaderboard {
        writeln!(
            out,
            "{:<width$}  {:>10.4}  {:>10.4}  {:>8.4}  {:>7.2}%",
            r.label, r.rmse, r.mae, r.r2, r.smape
        )?;
    }
    Ok(())
}

/// The `top_k` largest importances, descending.
pub fn print_feature_importances<W: Write>(
    out: &mut W,
    records: &[FeatureImportance],
    top_k: usize,
) -> io::Result<()> {
    let mut ranked: Vec<&FeatureImportance> = records.iter().collect();
    ranked.sort_by_key(|f| std::cmp::Reverse(OrderedFloat(f.importance)));
    ranked.truncate(top_k);

    let width = ranked
        .iter()
        .map(|f| f.feature.chars().count())
        .max()
        .unwrap_or(0)
        .max(FEATURE_HEADER.len());

    writeln!(out, "{:>3}  {:<width$}  {:>10}", "#", FEATURE_HEADER, "Importance")?;
    for (rank, f) in ranked.iter().enumerate() {
        writeln!(out, "{:>3}  {:<width$}  {:>10.4}", rank + 1, f.feature, f.importance)?;
    }
    Ok(())
}

/// Everything the binary prints after a successful run.
pub fn print_summary<W: Write>(out: &mut W, summary: &RunSummary, top_k: usize) -> io::Result<()> {
    print_shapes(out, summary.train_shape, summary.test_shape)?;
    writeln!(out)?;
    print_metrics(out, &summary.leaderboard)?;
    if let Some(best) = summary.best() {
        writeln!(out, "\nBest model: {} (RMSE {:.4})", best.label, best.rmse)?;
    }

    match &summary.importances {
        Some(report) => {
            writeln!(out, "\nTop {} feature importances ({})", top_k, report.label)?;
            print_feature_importances(out, &report.features, top_k)?;
        }
        None => writeln!(out, "\nNo model with feature importances was evaluated")?,
    }
    Ok(())
}
