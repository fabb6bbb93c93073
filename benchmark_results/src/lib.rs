#![deny(unsafe_op_in_unsafe_fn)]

/*! This crate holds the benchmark table produced by the MPI pi estimation runs,
and the loader used to read it back for off-line analysis.
*/
pub mod record;
pub mod table;

pub use record::{BenchmarkRecord, RecordError, RunType};
pub use table::{BenchmarkTable, LoadError};

/// Reference value the estimates are compared against.
pub const TRUE_PI: f64 = std::f64::consts::PI;

/// Number of rounds a single task performs when rounds are not divided.
pub const DEFAULT_ROUNDS: u32 = 100;

pub const SAME_ROUND: &str = "SAME ROUND FOR EACH PROCESS";
pub const DIVIDE_ROUND: &str = "DIVIDE ROUND AMONG PROCESSES";
