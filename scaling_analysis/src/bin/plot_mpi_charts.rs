use benchmark_results::BenchmarkTable;
use clap::Parser;
use log::{error, info};
use scaling_analysis::efficiency::EfficiencyFormula;
use scaling_analysis::plots::PgfPlotsRenderer;
use scaling_analysis::{AnalysisOptions, run_analysis};
use std::path::PathBuf;
use std::process::ExitCode;

/**
Reads the results of the MPI pi benchmarks, plots the estimation error and the
runtime scaling, and prints the convergence rates and parallel efficiencies.
*/
#[derive(Parser, Debug)]
#[command(name = "plot_mpi_charts", version)]
struct Cli {
    /// Benchmark CSV, `<input>.zst` is used when only the compressed copy exists
    #[arg(default_value = "data/data_readme_part4_q4.csv")]
    input: PathBuf,

    /// Folder receiving the plots, written as pgfplots `.tex` sources (PDF with `--pdf`)
    #[arg(short, long, default_value = "plots")]
    output: PathBuf,

    /// Compile the plots to PDF (needs pdflatex)
    #[arg(long)]
    pdf: bool,

    /// How per-rank efficiencies are combined
    #[arg(long, value_enum, default_value_t = EfficiencyFormula::MeanOfRatios)]
    formula: EfficiencyFormula,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let table = match BenchmarkTable::load(&cli.input) {
        Ok(table) => table,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = std::fs::create_dir_all(&cli.output) {
        error!("Failed to create {}: {}", cli.output.display(), e);
        return ExitCode::FAILURE;
    }
    let renderer = PgfPlotsRenderer::new(&cli.output, cli.pdf);
    let options = AnalysisOptions {
        formula: cli.formula,
    };

    match run_analysis(&table, &renderer, std::io::stdout().lock(), &options) {
        Ok(analysis) => {
            info!(
                "Plots written to {} ({} skipped groups)",
                renderer.folder().display(),
                analysis.skipped
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to write the report: {}", e);
            ExitCode::FAILURE
        }
    }
}
