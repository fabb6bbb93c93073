use crate::{DEFAULT_ROUNDS, DIVIDE_ROUND, SAME_ROUND, TRUE_PI};
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// How the rounds of the dartboard algorithm were distributed over the ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub enum RunType {
    /// Every rank performs all the rounds.
    #[serde(rename = "SAME ROUND FOR EACH PROCESS")]
    SameRound,
    /// The rounds are split among the ranks, see `rounds_per_task`.
    #[serde(rename = "DIVIDE ROUND AMONG PROCESSES")]
    DivideRound,
}

impl RunType {
    pub const ALL: [RunType; 2] = [RunType::SameRound, RunType::DivideRound];

    pub fn label(&self) -> &'static str {
        match self {
            RunType::SameRound => SAME_ROUND,
            RunType::DivideRound => DIVIDE_ROUND,
        }
    }

    /// Suffix used in output file names.
    pub fn suffix(&self) -> &'static str {
        match self {
            RunType::SameRound => "same_round",
            RunType::DivideRound => "divided_round",
        }
    }
}

impl Display for RunType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the benchmark CSV.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BenchmarkRecord {
    pub run_type: RunType,
    pub ranks: u32,
    pub total_darts: u64,
    #[serde(default)]
    pub rounds_per_task: Option<u32>,
    pub pi_est: f64,
    pub time_taken: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("ranks must be at least 1")]
    ZeroRanks,
    #[error("total_darts must be at least 1")]
    ZeroDarts,
    #[error("pi_est is not a finite number: {0}")]
    NonFiniteEstimate(f64),
    #[error("time_taken must be a positive number of seconds, got {0}")]
    InvalidTime(f64),
    #[error("rounds_per_task is required when rounds are divided among processes")]
    MissingRoundsPerTask,
    #[error("rounds_per_task must be at least 1")]
    ZeroRoundsPerTask,
}

impl BenchmarkRecord {
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.ranks == 0 {
            return Err(RecordError::ZeroRanks);
        }
        if self.total_darts == 0 {
            return Err(RecordError::ZeroDarts);
        }
        if !self.pi_est.is_finite() {
            return Err(RecordError::NonFiniteEstimate(self.pi_est));
        }
        if !(self.time_taken.is_finite() && self.time_taken > 0.0) {
            return Err(RecordError::InvalidTime(self.time_taken));
        }
        if self.run_type == RunType::DivideRound {
            match self.rounds_per_task {
                None => return Err(RecordError::MissingRoundsPerTask),
                Some(0) => return Err(RecordError::ZeroRoundsPerTask),
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Absolute error of the estimate.
    pub fn pi_error(&self) -> f64 {
        (self.pi_est - TRUE_PI).abs()
    }

    /// Workload correction applied to the ideal scaling of divided runs.
    ///
    /// A rank of a divided run only performs `rounds_per_task` of the
    /// `DEFAULT_ROUNDS` rounds, the factor is `DEFAULT_ROUNDS / rounds_per_task`.
    /// Same round runs are never corrected.
    pub fn rounds_factor(&self) -> f64 {
        match (self.run_type, self.rounds_per_task) {
            (RunType::DivideRound, Some(rounds)) if rounds > 0 => {
                DEFAULT_ROUNDS as f64 / rounds as f64
            }
            _ => 1.0,
        }
    }
}
