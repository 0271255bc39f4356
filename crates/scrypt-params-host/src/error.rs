//! Host-visible error type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use scrypt_params_core::{ErrorKind, ParamsError};

/// Code used when a worker could not deliver its result.
pub const DISPATCH_ERROR_CODE: u32 = 4;

/// Error as a host runtime sees it: a numeric code and a message.
///
/// Codes `1`–`3` are the core [`ErrorKind`] codes; argument validation
/// failures use the `InvalidArgument` code.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct HostError {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable description.
    pub message: String,
}

impl HostError {
    /// A rejected call argument.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self {
            code: ErrorKind::InvalidArgument.code(),
            message: message.into(),
        }
    }

    /// A worker that panicked or was cancelled before reporting.
    #[must_use]
    pub fn dispatch(message: impl Into<String>) -> Self {
        Self {
            code: DISPATCH_ERROR_CODE,
            message: message.into(),
        }
    }
}

impl From<ParamsError> for HostError {
    fn from(err: ParamsError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}
