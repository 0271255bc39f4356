//! Error types for `scrypt-params-core`.

use thiserror::Error;

/// Coarse classification of a [`ParamsError`], stable across messages.
///
/// The numeric [`code`](ErrorKind::code) is what boundary layers hand to
/// callers that cannot match on Rust enums.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A supplied numeric parameter is outside its valid domain.
    InvalidArgument,
    /// The resource budget cannot hold even the smallest parameter set.
    InvalidConfiguration,
    /// Memory for the calibration run or the entropy source is unavailable.
    ResourceExhausted,
}

impl ErrorKind {
    /// Numeric error code for this kind.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::InvalidArgument => 1,
            Self::InvalidConfiguration => 2,
            Self::ResourceExhausted => 3,
        }
    }
}

/// Errors produced by parameter selection and salt generation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParamsError {
    /// `maxtime` non-positive or not finite, or a malformed throughput.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Memory ceiling too small for `N = 2, r = 1`, or time budget unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The scrypt calibration run failed, or no entropy source could be read.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),
}

impl ParamsError {
    /// The kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
            Self::ResourceExhausted(_) => ErrorKind::ResourceExhausted,
        }
    }

    /// Shorthand for `self.kind().code()`.
    #[must_use]
    pub const fn code(&self) -> u32 {
        self.kind().code()
    }
}
