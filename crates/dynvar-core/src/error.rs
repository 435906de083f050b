//! Error types for value operations.

use thiserror::Error;

use crate::dispatch::BinaryOp;
use crate::tag::Tag;

/// Errors raised by dispatch, arithmetic, conversion and guarded iteration.
///
/// Every fallible entry point of the crate returns one of these; none are
/// handled internally. Use [`VarError::kind`] to match on the broad category.
#[derive(Error, Debug)]
pub enum VarError {
    /// The operator has no implementation for this pair of operand tags.
    #[error("unsupported operand types for {op}: '{left}' and '{right}'")]
    UnsupportedOperands { op: BinaryOp, left: Tag, right: Tag },

    /// A checked accessor or conversion was used against the wrong tag.
    #[error("type mismatch: expected {expected}, found '{found}'")]
    TypeMismatch { expected: &'static str, found: Tag },

    /// A Throw-policy result did not fit the computed width.
    #[error("overflow: {0}")]
    Overflow(String),

    /// Division or modulo by zero.
    #[error("{0} by zero")]
    DivisionByZero(&'static str),

    /// A text or numeric conversion failed.
    #[error("conversion error: {0}")]
    Conversion(String),

    /// The input string was not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A guarded cursor observed a structural mutation of its container.
    #[error("container modified during iteration (expected version {expected}, found {found})")]
    ConcurrentModification { expected: u64, found: u64 },

    /// A guarded cursor was stepped against a container other than the one
    /// it was created from.
    #[error("cursor stepped against a different container than it was created from")]
    ForeignContainer,

    /// Positional access outside the container.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    /// Keyed access for a key the container does not hold.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// An argument had the right type but an unusable value.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Broad error category, independent of the message payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TypeMismatch,
    Overflow,
    DivisionByZero,
    Conversion,
    ConcurrentModification,
    Index,
    Key,
    Value,
}

impl VarError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VarError::UnsupportedOperands { .. } | VarError::TypeMismatch { .. } => {
                ErrorKind::TypeMismatch
            }
            VarError::Overflow(_) => ErrorKind::Overflow,
            VarError::DivisionByZero(_) => ErrorKind::DivisionByZero,
            VarError::Conversion(_) | VarError::Json(_) => ErrorKind::Conversion,
            VarError::ConcurrentModification { .. } | VarError::ForeignContainer => {
                ErrorKind::ConcurrentModification
            }
            VarError::IndexOutOfRange { .. } => ErrorKind::Index,
            VarError::KeyNotFound(_) => ErrorKind::Key,
            VarError::InvalidValue(_) => ErrorKind::Value,
        }
    }

    pub(crate) fn mismatch(expected: &'static str, found: Tag) -> Self {
        VarError::TypeMismatch { expected, found }
    }

    pub(crate) fn overflow(msg: impl Into<String>) -> Self {
        VarError::Overflow(msg.into())
    }
}

/// Convenience alias used throughout dynvar-core.
pub type Result<T> = std::result::Result<T, VarError>;
