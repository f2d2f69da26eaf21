//! Error types for span values and span columns.

use thiserror::Error;

/// Errors raised by span construction, span columns and their operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpanError {
    /// Offsets that do not describe a span over the target.
    #[error("invalid span offsets [{begin}, {end}): {message}")]
    InvalidOffsets {
        begin: i64,
        end: i64,
        message: String,
    },

    /// Begin and end sequences of different lengths.
    #[error("begin and end sequences differ in length ({begins} != {ends})")]
    LengthMismatch { begins: usize, ends: usize },

    /// Two operands of one operation have different lengths.
    #[error("operands differ in length ({left} != {right})")]
    OperandLengthMismatch { left: usize, right: usize },

    /// Operands that must share one target text do not.
    #[error("spans must all be over the same target text")]
    TargetTextMismatch,

    /// Operands that must share one token table do not.
    #[error("token spans must all be over the same token table")]
    TokenTableMismatch,

    /// A token table row without offsets, where a token span needs one.
    #[error("token table row {index} is null; token spans need a complete token table")]
    NullTokenRow { index: usize },

    /// Index past the end of a column.
    #[error("index {index} out of bounds for column of length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    /// A negative `take` index other than -1 while filling.
    #[error("invalid take index {index}: only -1 marks a missing value")]
    InvalidTakeIndex { index: i64 },

    /// An operation the span columns deliberately do not provide.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// A reduction reached a null span.
    #[error("cannot reduce a column containing null spans (first null at index {index})")]
    NullInReduction { index: usize },

    /// An operation that needs at least one input received none.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// Name that does not identify a span dtype.
    #[error("cannot construct a span dtype from '{0}'")]
    UnknownDtype(String),
}

/// Result type for span operations.
pub type SpanResult<T> = Result<T, SpanError>;
