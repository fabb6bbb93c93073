use crate::AnalysisError;
use benchmark_results::{BenchmarkRecord, BenchmarkTable, RunType};
use log::warn;

/// How the per-rank ratios are folded into one efficiency figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum EfficiencyFormula {
    /// Arithmetic mean of `ideal_time / time_taken` over the selected runs.
    #[default]
    MeanOfRatios,
    /// `Σ ideal_time / Σ time_taken` over the selected runs.
    RatioOfSums,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingPoint {
    pub ranks: u32,
    pub time_taken: f64,
    pub ideal_time: f64,
    pub speedup: f64,
    /// `ideal_time / time_taken`, as a fraction.
    pub efficiency: f64,
}

/// Runtime against processor count for one `(run_type, total_darts)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingCurve {
    pub run_type: RunType,
    pub total_darts: u64,
    pub baseline_ranks: u32,
    pub baseline_time: f64,
    /// Never empty, ordered by ranks.
    pub points: Vec<ScalingPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingSummary {
    pub run_type: RunType,
    pub total_darts: u64,
    pub baseline_ranks: u32,
    pub efficiency_percent: f64,
}

impl ScalingCurve {
    /// Overall efficiency, in percent.
    pub fn efficiency(&self, formula: EfficiencyFormula) -> f64 {
        let ratio = match formula {
            EfficiencyFormula::MeanOfRatios => {
                self.points.iter().map(|p| p.efficiency).sum::<f64>() / self.points.len() as f64
            }
            EfficiencyFormula::RatioOfSums => {
                let ideal: f64 = self.points.iter().map(|p| p.ideal_time).sum();
                let actual: f64 = self.points.iter().map(|p| p.time_taken).sum();
                ideal / actual
            }
        };
        ratio * 100.
    }

    pub fn summary(&self, formula: EfficiencyFormula) -> ScalingSummary {
        ScalingSummary {
            run_type: self.run_type,
            total_darts: self.total_darts,
            baseline_ranks: self.baseline_ranks,
            efficiency_percent: self.efficiency(formula),
        }
    }
}

fn scaling_point(baseline_time: f64, record: &BenchmarkRecord) -> ScalingPoint {
    let ranks = record.ranks as f64;
    let factor = record.rounds_factor();
    let ideal_time = baseline_time / ranks / factor;
    let speedup = baseline_time / record.time_taken / factor;
    ScalingPoint {
        ranks: record.ranks,
        time_taken: record.time_taken,
        ideal_time,
        speedup,
        efficiency: speedup / ranks,
    }
}

/// Builds the scaling curve of `(run_type, total_darts)`.
///
/// The baseline is the run with the fewest ranks (the first one in file order
/// on ties), which is not necessarily a single rank run. Divided runs have
/// their ideal time and speedup divided by their rounds factor.
pub fn compute_scaling_curve(
    table: &BenchmarkTable,
    run_type: RunType,
    total_darts: u64,
) -> Result<ScalingCurve, AnalysisError> {
    let mut selection: Vec<&BenchmarkRecord> = table
        .select(run_type)
        .filter(|record| record.total_darts == total_darts)
        .collect();
    selection.sort_by_key(|record| record.ranks);

    let baseline = selection.first().ok_or(AnalysisError::EmptySelection {
        run_type,
        total_darts,
    })?;
    if baseline.ranks != 1 {
        warn!(
            "[{} / {} darts] no single rank run, using {} ranks as the baseline",
            run_type, total_darts, baseline.ranks
        );
    }
    let baseline_time = baseline.time_taken;

    Ok(ScalingCurve {
        run_type,
        total_darts,
        baseline_ranks: baseline.ranks,
        baseline_time,
        points: selection
            .iter()
            .map(|record| scaling_point(baseline_time, record))
            .collect(),
    })
}

/// Mean of the per-rank efficiencies of `(run_type, total_darts)`, in percent.
pub fn compute_scaling_efficiency(
    table: &BenchmarkTable,
    run_type: RunType,
    total_darts: u64,
) -> Result<f64, AnalysisError> {
    compute_scaling_curve(table, run_type, total_darts)
        .map(|curve| curve.efficiency(EfficiencyFormula::MeanOfRatios))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(
        run_type: RunType,
        ranks: u32,
        total_darts: u64,
        rounds_per_task: u32,
        time_taken: f64,
    ) -> BenchmarkRecord {
        BenchmarkRecord {
            run_type,
            ranks,
            total_darts,
            rounds_per_task: Some(rounds_per_task),
            pi_est: 3.1416,
            time_taken,
        }
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn two_rank_example() {
        let table = BenchmarkTable::new(vec![
            BenchmarkRecord {
                run_type: RunType::SameRound,
                ranks: 1,
                total_darts: 1000,
                rounds_per_task: None,
                pi_est: 3.14,
                time_taken: 2.0,
            },
            BenchmarkRecord {
                run_type: RunType::SameRound,
                ranks: 2,
                total_darts: 1000,
                rounds_per_task: None,
                pi_est: 3.1416,
                time_taken: 1.0,
            },
        ])
        .unwrap();
        let efficiency = compute_scaling_efficiency(&table, RunType::SameRound, 1000).unwrap();
        assert_close(efficiency, 100.0);
    }

    #[test]
    fn linear_scaling_is_fully_efficient() {
        let mut records = Vec::new();
        for (darts, baseline) in [(1000u64, 3.0), (1_000_000, 48.0)] {
            for ranks in [8u32, 1, 4, 2, 16] {
                records.push(run(
                    RunType::SameRound,
                    ranks,
                    darts,
                    100,
                    baseline / ranks as f64,
                ));
            }
        }
        let table = BenchmarkTable::new(records).unwrap();
        for darts in table.dart_counts() {
            let curve = compute_scaling_curve(&table, RunType::SameRound, darts).unwrap();
            assert_eq!(curve.baseline_ranks, 1);
            let ranks: Vec<u32> = curve.points.iter().map(|p| p.ranks).collect();
            assert_eq!(ranks, vec![1, 2, 4, 8, 16]);
            assert_close(curve.efficiency(EfficiencyFormula::MeanOfRatios), 100.0);
            assert_close(curve.efficiency(EfficiencyFormula::RatioOfSums), 100.0);
            for point in &curve.points {
                assert_close(point.speedup, point.ranks as f64);
            }
        }
    }

    #[test]
    fn empty_selection() {
        let table = BenchmarkTable::new(vec![run(RunType::SameRound, 1, 1000, 100, 1.0)]).unwrap();
        assert_eq!(
            compute_scaling_efficiency(&table, RunType::SameRound, 10),
            Err(AnalysisError::EmptySelection {
                run_type: RunType::SameRound,
                total_darts: 10
            })
        );
        assert!(compute_scaling_efficiency(&table, RunType::DivideRound, 1000).is_err());
    }

    #[test]
    fn baseline_is_smallest_rank_present() {
        let table = BenchmarkTable::new(vec![
            run(RunType::SameRound, 4, 1000, 100, 1.0),
            run(RunType::SameRound, 2, 1000, 100, 2.0),
        ])
        .unwrap();
        let curve = compute_scaling_curve(&table, RunType::SameRound, 1000).unwrap();
        assert_eq!(curve.baseline_ranks, 2);
        assert_eq!(curve.baseline_time, 2.0);
        // ideal(2) = 2.0 / 2, ideal(4) = 2.0 / 4
        assert_close(curve.points[0].ideal_time, 1.0);
        assert_close(curve.points[1].ideal_time, 0.5);
        assert_close(curve.efficiency(EfficiencyFormula::MeanOfRatios), 50.0);
    }

    #[test]
    fn formulas_differ() {
        let table = BenchmarkTable::new(vec![
            run(RunType::SameRound, 1, 1000, 100, 4.0),
            run(RunType::SameRound, 4, 1000, 100, 2.0),
        ])
        .unwrap();
        let curve = compute_scaling_curve(&table, RunType::SameRound, 1000).unwrap();
        assert_close(curve.efficiency(EfficiencyFormula::MeanOfRatios), 75.0);
        assert_close(
            curve.efficiency(EfficiencyFormula::RatioOfSums),
            500.0 / 6.0,
        );
        let summary = curve.summary(EfficiencyFormula::MeanOfRatios);
        assert_eq!(summary.total_darts, 1000);
        assert_eq!(summary.run_type, RunType::SameRound);
        assert_close(summary.efficiency_percent, 75.0);
    }

    #[test]
    fn divided_rounds_are_corrected() {
        let table = BenchmarkTable::new(vec![
            run(RunType::DivideRound, 1, 1000, 100, 2.0),
            run(RunType::DivideRound, 2, 1000, 50, 0.5),
        ])
        .unwrap();
        let curve = compute_scaling_curve(&table, RunType::DivideRound, 1000).unwrap();
        // rounds factor of the 2 rank run is 100 / 50
        assert_close(curve.points[1].ideal_time, 0.5);
        assert_close(curve.points[1].speedup, 2.0);
        assert_close(curve.points[1].efficiency, 1.0);
        assert_close(curve.efficiency(EfficiencyFormula::MeanOfRatios), 100.0);
    }

    #[test]
    fn same_round_runs_ignore_rounds_per_task() {
        let table = BenchmarkTable::new(vec![
            run(RunType::SameRound, 1, 1000, 100, 2.0),
            run(RunType::SameRound, 2, 1000, 50, 1.0),
        ])
        .unwrap();
        assert_close(
            compute_scaling_efficiency(&table, RunType::SameRound, 1000).unwrap(),
            100.0,
        );
    }
}
