//! Crate-wide error type.

use std::path::PathBuf;

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by the ranking engine.
///
/// Most variants are configuration errors: malformed shapes or parameters
/// that make a request impossible to evaluate. Resolution misses and data
/// anomalies never surface here; they are recovered locally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("transition matrix must be square, got {rows}x{cols}")]
    NonSquareMatrix { rows: usize, cols: usize },

    #[error("{what} length ({got}) does not match number of states ({expected})")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("gamma must be in [0, 1), got {0}")]
    InvalidGamma(f64),

    #[error("theta must be positive, got {0}")]
    InvalidTheta(f64),

    #[error("max_iterations must be at least 1")]
    InvalidMaxIterations,

    #[error("{leaves} leaf rows exceed the {states} states of the transition matrix")]
    NegativeInnerNodeCount { states: usize, leaves: usize },

    #[error("invalid range for column {column}: low ({low}) is greater than high ({high})")]
    InvalidRange { column: String, low: f64, high: f64 },

    #[error("{labels} labels do not match a {states}-state matrix")]
    LabelMismatch { labels: usize, states: usize },

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("row {row} has {got} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("malformed transition matrix: {message}")]
    MalformedMatrix { message: String },

    #[error("failed to read {path:?}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path:?}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse constraints configuration")]
    ParseConfig(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` for malformed shapes and parameters.
    ///
    /// I/O failures are reported separately so callers can tell a bad
    /// request from an unavailable file.
    pub fn is_configuration(&self) -> bool {
        !matches!(
            self,
            Error::ReadFile { .. } | Error::WriteFile { .. } | Error::Csv(_)
        )
    }
}
