use benchmark_results::{BenchmarkTable, RunType};
use itertools::Itertools;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorPoint {
    pub total_darts: u64,
    pub error: f64,
}

/// Estimation error of every run sharing a processor count, sorted by dart count.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorSeries {
    pub ranks: u32,
    pub points: Vec<ErrorPoint>,
}

impl ErrorSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn smallest_darts(&self) -> Option<u64> {
        self.points.first().map(|p| p.total_darts)
    }
}

/// Groups the records of `run_type` by processor count.
///
/// Points are ordered by `total_darts`, runs with the same dart count keep
/// their order in the table. A run type absent from the table gives an empty map.
pub fn compute_error_series(
    table: &BenchmarkTable,
    run_type: RunType,
) -> BTreeMap<u32, ErrorSeries> {
    table
        .select(run_type)
        .map(|record| {
            (
                record.ranks,
                ErrorPoint {
                    total_darts: record.total_darts,
                    error: record.pi_error(),
                },
            )
        })
        .into_group_map()
        .into_iter()
        .map(|(ranks, mut points)| {
            // stable, ties stay in file order
            points.sort_by_key(|p| p.total_darts);
            (ranks, ErrorSeries { ranks, points })
        })
        .collect()
}
