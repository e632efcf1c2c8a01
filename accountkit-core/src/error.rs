//! Error types for the hashing core.

use thiserror::Error;

/// Result type for hashing operations.
pub type HasherResult<T> = Result<T, HasherError>;

/// Errors raised by salt generation, key derivation, and credential decoding.
///
/// Nothing here is retried or recovered internally; retry policy belongs to
/// the caller. An [`EntropyUnavailable`](Self::EntropyUnavailable) failure may
/// succeed on a later attempt once the operating system source recovers, the
/// other variants will not.
#[derive(Debug, Error)]
pub enum HasherError {
    /// The operating system's secure random source could not produce bytes.
    #[error("entropy source unavailable: {source}")]
    EntropyUnavailable {
        /// Failure reported by the system random source.
        source: getrandom::Error,
    },

    /// The key derivation primitive rejected its inputs or failed internally.
    #[error("key derivation failed: {context}")]
    DerivationFailure {
        /// What the primitive rejected.
        context: String,
    },

    /// A supplied salt is not valid base64 or decodes to the wrong number of
    /// bytes.
    #[error("invalid salt encoding: {reason}")]
    InvalidSaltEncoding {
        /// How the salt text was malformed.
        reason: String,
    },

    /// A stored derived key is not valid base64 or decodes to the wrong
    /// number of bytes.
    #[error("invalid derived key encoding: {reason}")]
    InvalidKeyEncoding {
        /// How the key text was malformed.
        reason: String,
    },

    /// The background derivation task was cancelled or panicked before
    /// producing a result.
    #[error("derivation task failed: {message}")]
    TaskFailure {
        /// Failure reported by the task system.
        message: String,
    },
}

impl HasherError {
    /// Creates a [`HasherError::DerivationFailure`] with context.
    #[must_use]
    pub fn derivation<S: Into<String>>(context: S) -> Self {
        Self::DerivationFailure {
            context: context.into(),
        }
    }

    /// Creates a [`HasherError::InvalidSaltEncoding`] with the defect.
    #[must_use]
    pub fn invalid_salt<S: Into<String>>(reason: S) -> Self {
        Self::InvalidSaltEncoding {
            reason: reason.into(),
        }
    }

    /// Creates a [`HasherError::InvalidKeyEncoding`] with the defect.
    #[must_use]
    pub fn invalid_key<S: Into<String>>(reason: S) -> Self {
        Self::InvalidKeyEncoding {
            reason: reason.into(),
        }
    }

    /// Creates a [`HasherError::TaskFailure`] with the task system's report.
    #[must_use]
    pub fn task<S: Into<String>>(message: S) -> Self {
        Self::TaskFailure {
            message: message.into(),
        }
    }
}
