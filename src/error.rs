//! Error types, one enum per subsystem.

use std::path::PathBuf;

use thiserror::Error;

use crate::dataset::ItemId;

/// Errors raised by the mining engine itself.
#[derive(Error, Debug)]
pub enum MiningError {
    /// A run parameter is outside its valid range.
    #[error("invalid parameter `{name}`: {message}")]
    InvalidParameter { name: &'static str, message: String },

    /// A subset of a frequent itemset had no recorded support. Candidate
    /// pruning guarantees this cannot happen for lists produced by the miner.
    #[error("no support recorded for subset {items:?} of a frequent itemset")]
    MissingSubsetSupport { items: Vec<ItemId> },

    /// The itemset is too long to enumerate antecedents with a 64-bit mask.
    #[error("itemset of length {length} is too large for rule generation")]
    ItemsetTooLarge { length: usize },
}

impl MiningError {
    pub fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}

/// Errors raised while reading transactions from CSV.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors raised while writing result files.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush output: {0}")]
    Flush(#[from] std::io::Error),
}

/// Errors raised while resolving the run configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(#[from] MiningError),
}

/// Errors raised by the benchmark sweep and its summary.
#[derive(Error, Debug)]
pub enum BenchmarkError {
    #[error(transparent)]
    Mining(#[from] MiningError),

    #[error("failed to read benchmark results: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {field} at line {line}")]
    MalformedRecord { line: u64, field: &'static str },

    #[error("no data found in benchmark results")]
    Empty,
}
