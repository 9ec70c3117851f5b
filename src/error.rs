//! Error types for trace building and its input boundaries.

use thiserror::Error;

/// Result type alias for sortrace operations.
pub type Result<T> = std::result::Result<T, TraceError>;

/// Error type for sortrace operations.
///
/// Empty inputs, out-of-range key columns and degenerate merge ranges are not
/// errors; the engines handle them in the trace itself.
#[derive(Error, Debug)]
pub enum TraceError {
    /// An algorithm selector did not name a known algorithm.
    #[error("Unknown {family} algorithm '{name}'")]
    UnknownAlgorithm {
        /// Engine family the selector was meant for (e.g. "sort", "merge").
        family: &'static str,
        /// The unrecognized selector.
        name: String,
    },

    /// A token of manual input could not be read as an integer.
    #[error("Cannot read '{token}' as an integer")]
    InvalidValue {
        /// The offending token.
        token: String,
    },

    /// The benchmark word pool is smaller than the largest requested sample.
    #[error("Found only {found} words, at least {required} are needed")]
    InsufficientWords {
        /// Number of words available.
        found: usize,
        /// Largest requested sample size.
        required: usize,
    },

    /// Invalid parameter value provided.
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name.
        parameter: String,
        /// Explanation of why it's invalid.
        reason: String,
    },

    /// Delimited text could not be read as rows.
    #[error("Malformed delimited text: {0}")]
    Csv(#[from] csv::Error),

    /// Reading an input file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
