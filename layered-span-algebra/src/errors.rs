//! Error types for the interval-algebra operations.

use layered_spans::SpanError;
use thiserror::Error;

/// Errors that can occur while matching, joining or combining spans.
#[derive(Debug, Error)]
pub enum AlgebraError {
    /// Error from the underlying span columns.
    #[error(transparent)]
    Span(#[from] SpanError),

    /// Pattern that does not compile.
    #[error("invalid regular expression: {0}")]
    Regex(#[from] regex::Error),

    /// Error reading a dictionary file.
    #[error("failed to load dictionary: {path}: {message}")]
    Load { path: String, message: String },

    /// Error parsing options.
    #[error("invalid options: {message}")]
    Config { message: String },

    /// Argument outside the range an operation accepts.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Dictionary entry without any tokens.
    #[error("dictionary entry {row} has no tokens")]
    EmptyEntry { row: usize },

    /// Token feature column that does not exist.
    #[error("token feature column '{0}' not found")]
    MissingFeature(String),

    /// Token feature column with the wrong number of rows.
    #[error("token feature column '{name}' has {actual} rows, expected {expected}")]
    FeatureLength {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Pair of spans that cannot be combined because the first does not
    /// come before the second.
    #[error("span {index} of the first column does not come before span {index} of the second")]
    SpanOrder { index: usize },
}

/// Result type for interval-algebra operations.
pub type AlgebraResult<T> = Result<T, AlgebraError>;
