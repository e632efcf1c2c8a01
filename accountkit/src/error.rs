//! Error types for the account capability.

use thiserror::Error;

use accountkit_core::HasherError;

use crate::account::AccountId;

/// Result type for account operations.
pub type AccountResult<T> = Result<T, AccountError>;

/// Errors surfaced by [`AccountService`](crate::AccountService) operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// An account with this email already exists.
    #[error("email already in use: {email}")]
    EmailAlreadyInUse {
        /// The contested address.
        email: String,
    },

    /// No account exists under this id.
    #[error("account not found: {id}")]
    AccountNotFound {
        /// The id that was looked up.
        id: AccountId,
    },

    /// Password hashing failed. Nothing was persisted.
    #[error(transparent)]
    Hasher(#[from] HasherError),

    /// The account store reported a failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by an [`AccountStore`](crate::AccountStore) backend.
///
/// Backends differ widely, so the seam flattens their failures into a
/// message and the service layer stays backend-agnostic.
#[derive(Debug, Error)]
#[error("account store error: {message}")]
pub struct StoreError {
    /// Backend-reported description.
    message: String,
}

impl StoreError {
    /// Creates a store error from a backend description.
    #[must_use]
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}
