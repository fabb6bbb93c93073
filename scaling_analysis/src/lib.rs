#![deny(unsafe_op_in_unsafe_fn)]

pub mod convergence;
pub mod efficiency;
pub mod error_series;
pub mod plots;
pub mod report;

use benchmark_results::{BenchmarkTable, RunType};
use convergence::compute_convergence_rate;
use efficiency::{EfficiencyFormula, ScalingSummary, compute_scaling_curve};
use error_series::compute_error_series;
use itertools::Itertools;
use log::{info, warn};
use plots::ChartRenderer;
#[cfg(feature = "use_std")]
use rayon::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

/// Failures local to one group of runs. The analysis skips the group and goes on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("no runs for \"{run_type}\" with {total_darts} darts")]
    EmptySelection { run_type: RunType, total_darts: u64 },
    #[error("a log-log fit needs at least 2 distinct dart counts, got {points}")]
    InsufficientData { points: usize },
    #[error("{quantity} must be positive to take its logarithm, got {value}")]
    NonPositiveValue { quantity: &'static str, value: f64 },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisOptions {
    pub formula: EfficiencyFormula,
}

#[derive(Debug, Default)]
pub struct AnalysisReport {
    pub charts: Vec<PathBuf>,
    pub convergence_rates: Vec<(RunType, u32, f64)>,
    pub summaries: Vec<ScalingSummary>,
    /// Groups left out because of missing or unusable data, or a failed chart.
    pub skipped: usize,
}

/// Runs every chart and summary of the benchmark table.
///
/// Only a failure to write to `out` aborts the analysis.
pub fn run_analysis(
    table: &BenchmarkTable,
    renderer: &impl ChartRenderer,
    mut out: impl Write,
    options: &AnalysisOptions,
) -> std::io::Result<AnalysisReport> {
    let mut analysis = AnalysisReport::default();

    let error_series: Vec<_> = RunType::ALL
        .iter()
        .map(|&run_type| (run_type, compute_error_series(table, run_type)))
        .collect();

    /***************
     * Error plots *
     ***************/
    for (run_type, series) in &error_series {
        if series.is_empty() {
            warn!("[{}] no runs, skipping the error plot", run_type);
            analysis.skipped += 1;
            continue;
        }
        match renderer.render_error_series(*run_type, series) {
            Ok(path) => analysis.charts.push(path),
            Err(e) => {
                warn!("[{}] {}", run_type, e);
                analysis.skipped += 1;
            }
        }
    }

    /*********************
     * Convergence rates *
     *********************/
    for (run_type, series) in &error_series {
        if series.is_empty() {
            continue;
        }
        let mut rates = Vec::new();
        for (ranks, s) in series {
            match compute_convergence_rate(s) {
                Ok(rate) => {
                    rates.push((*ranks, rate));
                    analysis.convergence_rates.push((*run_type, *ranks, rate));
                }
                Err(e) => {
                    warn!(
                        "[{}] skipping convergence rate for {} ranks: {}",
                        run_type, ranks, e
                    );
                    analysis.skipped += 1;
                }
            }
        }
        report::write_convergence_rates(&mut out, *run_type, &rates)?;
    }

    /***********
     * Scaling *
     ***********/
    let combinations: Vec<(RunType, u64)> = table
        .run_types()
        .into_iter()
        .cartesian_product(table.dart_counts())
        .collect();

    #[cfg(feature = "use_std")]
    let curves: Vec<_> = combinations
        .par_iter()
        .map(|&(run_type, total_darts)| compute_scaling_curve(table, run_type, total_darts))
        .collect();
    #[cfg(not(feature = "use_std"))]
    let curves: Vec<_> = combinations
        .iter()
        .map(|&(run_type, total_darts)| compute_scaling_curve(table, run_type, total_darts))
        .collect();

    for curve in curves {
        let curve = match curve {
            Ok(curve) => curve,
            Err(e) => {
                warn!("{}, skipping", e);
                analysis.skipped += 1;
                continue;
            }
        };
        match renderer.render_runtime(&curve) {
            Ok(path) => analysis.charts.push(path),
            Err(e) => {
                warn!("[{} / {} darts] {}", curve.run_type, curve.total_darts, e);
                analysis.skipped += 1;
            }
        }
        let summary = curve.summary(options.formula);
        report::write_scaling_summary(&mut out, &summary)?;
        analysis.summaries.push(summary);
    }

    info!(
        "{} charts, {} summaries, {} skipped groups",
        analysis.charts.len(),
        analysis.summaries.len(),
        analysis.skipped
    );
    Ok(analysis)
}
