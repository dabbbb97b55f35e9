//! Error types for calendar and time-scale conversions.
//!
//! The whole workspace reports failures through [`CalError`]; most public
//! functions return [`CalResult<T>`]. There is no process-wide error
//! indicator: an operation either yields a value or an error, and outputs
//! are never partially written.
//!
//! | Variant | Use case |
//! |---------|----------|
//! | [`InvalidInput`](CalError::InvalidInput) | Malformed zone strings, impossible date tuples |
//! | [`OutOfRange`](CalError::OutOfRange) | Results past the representable year or day range |
//! | [`Ambiguous`](CalError::Ambiguous) | Local time in a DST gap or overlap without a hint |

use thiserror::Error;

/// Result alias used throughout the workspace.
pub type CalResult<T> = Result<T, CalError>;

/// Unified error type for calendar conversions.
///
/// Context strings are static: no allocation happens on the error path,
/// which keeps the crate usable on small targets.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalError {
    /// An argument violates its documented domain.
    #[error("invalid argument: {0}")]
    InvalidInput(&'static str),

    /// The result does not fit the output type.
    #[error("out of range: {0}")]
    OutOfRange(&'static str),

    /// A local time stamp falls into a DST discontinuity and no
    /// disambiguation hint was supplied.
    #[error("ambiguous local time, disambiguation hint required")]
    Ambiguous,
}
