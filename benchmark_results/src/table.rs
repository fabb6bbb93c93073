use crate::record::{BenchmarkRecord, RecordError, RunType};
use itertools::Itertools;
use log::{debug, info};
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("benchmark file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read benchmark data: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed benchmark data: {0}")]
    Parse(#[from] csv::Error),
    #[error("invalid benchmark record at row {row}: {source}")]
    InvalidRecord { row: usize, source: RecordError },
    #[error("{} is compressed but zstd support is disabled", .0.display())]
    UnsupportedCompression(PathBuf),
}

/// The whole benchmark CSV, validated once and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkTable {
    records: Vec<BenchmarkRecord>,
}

impl BenchmarkTable {
    pub const EXTENSION_ZSTD: &'static str = "zst";

    /// Builds a table, rejecting the first invalid record. Rows are numbered from 1.
    pub fn new(records: Vec<BenchmarkRecord>) -> Result<Self, LoadError> {
        for (index, record) in records.iter().enumerate() {
            record
                .validate()
                .map_err(|source| LoadError::InvalidRecord {
                    row: index + 1,
                    source,
                })?;
        }
        Ok(Self { records })
    }

    /// Parses a CSV stream with a header line. Unknown columns are ignored.
    pub fn from_reader(reader: impl Read) -> Result<Self, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let records = reader
            .deserialize::<BenchmarkRecord>()
            .collect::<Result<Vec<_>, csv::Error>>()?;
        Self::new(records)
    }

    /// Loads `path`, or `path.zst` when only the compressed file exists.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let candidate_zstd = {
            let mut name = OsString::from(path.as_os_str());
            name.push(".");
            name.push(Self::EXTENSION_ZSTD);
            PathBuf::from(name)
        };

        let source = if path.exists() {
            path.to_path_buf()
        } else if candidate_zstd.exists() {
            debug!(
                "{} not found, using {}",
                path.display(),
                candidate_zstd.display()
            );
            candidate_zstd
        } else {
            return Err(LoadError::NotFound(path.to_path_buf()));
        };

        let table = Self::load_file(&source)?;
        info!(
            "Read {} benchmark records from {}",
            table.len(),
            source.display()
        );
        Ok(table)
    }

    fn load_file(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path)?;
        let compressed = path
            .extension()
            .is_some_and(|extension| extension == Self::EXTENSION_ZSTD);
        if compressed {
            #[cfg(feature = "zstd_support")]
            {
                let decoder = zstd::Decoder::new(file)?;
                return Self::from_reader(decoder);
            }
            #[cfg(not(feature = "zstd_support"))]
            {
                return Err(LoadError::UnsupportedCompression(path.to_path_buf()));
            }
        }
        Self::from_reader(BufReader::new(file))
    }

    pub fn records(&self) -> &[BenchmarkRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &BenchmarkRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records of one run type, in file order.
    pub fn select(&self, run_type: RunType) -> impl Iterator<Item = &BenchmarkRecord> {
        self.records
            .iter()
            .filter(move |record| record.run_type == run_type)
    }

    /// Distinct run types, in order of first appearance.
    pub fn run_types(&self) -> Vec<RunType> {
        self.records.iter().map(|r| r.run_type).unique().collect()
    }

    /// Distinct dart counts, in order of first appearance.
    pub fn dart_counts(&self) -> Vec<u64> {
        self.records
            .iter()
            .map(|r| r.total_darts)
            .unique()
            .collect()
    }
}

impl<'a> IntoIterator for &'a BenchmarkTable {
    type Item = &'a BenchmarkRecord;
    type IntoIter = std::slice::Iter<'a, BenchmarkRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
