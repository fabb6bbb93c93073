use crate::efficiency::ScalingSummary;
use benchmark_results::RunType;
use std::io::Write;

pub fn write_convergence_rates(
    mut out: impl Write,
    run_type: RunType,
    rates: &[(u32, f64)],
) -> std::io::Result<()> {
    writeln!(
        out,
        "Convergence Rate for each Processor Count [{}]:",
        run_type
    )?;
    for (ranks, rate) in rates {
        writeln!(
            out,
            "Processor Count (Ranks): {}, Convergence Rate: {}",
            ranks, rate
        )?;
    }
    Ok(())
}

pub fn write_scaling_summary(mut out: impl Write, summary: &ScalingSummary) -> std::io::Result<()> {
    write!(
        out,
        "Run Type: {}, Total Darts: {}, Overall Efficiency: {:.3}%",
        summary.run_type, summary.total_darts, summary.efficiency_percent
    )?;
    if summary.baseline_ranks != 1 {
        write!(out, " (baseline: {} ranks)", summary.baseline_ranks)?;
    }
    writeln!(out)
}
