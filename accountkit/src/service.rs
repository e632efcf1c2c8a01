//! Account operations: creation with email uniqueness, lookups with
//! not-found translation.

use secrecy::ExposeSecret;
use tracing::debug;

use accountkit_core::PasswordHasher;

use crate::account::{Account, AccountId, NewAccount};
use crate::error::{AccountError, AccountResult};
use crate::store::AccountStore;

/// Account operations over a pluggable [`AccountStore`].
///
/// The service owns the account semantics: email uniqueness on creation,
/// password derivation before anything touches storage, and translation of
/// missing records into [`AccountError::AccountNotFound`]. The store stays
/// a plain record collaborator.
///
/// The uniqueness check here is check-then-insert; under concurrent
/// creation of the same address, the hard guarantee belongs to a unique
/// index in the backing store.
#[derive(Debug)]
pub struct AccountService<S> {
    store: S,
    hasher: PasswordHasher,
}

impl<S: AccountStore> AccountService<S> {
    /// Creates a service over `store`, deriving credentials with `hasher`.
    #[must_use]
    pub fn new(store: S, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// The hasher used for new credentials.
    #[must_use]
    pub const fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Creates an account, rejecting duplicate emails.
    ///
    /// The credential is derived before the insert: a derivation failure
    /// aborts creation with nothing persisted.
    ///
    /// # Errors
    ///
    /// * [`AccountError::EmailAlreadyInUse`] when an account with this
    ///   email exists.
    /// * [`AccountError::Hasher`] when derivation fails. Nothing was
    ///   stored.
    /// * [`AccountError::Store`] when the store rejects the lookup or the
    ///   insert.
    pub async fn create_account(&self, new: NewAccount) -> AccountResult<Account> {
        let (email, password) = new.into_parts();
        if self.store.count_by_email(&email)? > 0 {
            return Err(AccountError::EmailAlreadyInUse { email });
        }

        let credential = self.hasher.derive(password.expose_secret()).await?;
        let account = Account::new(AccountId::generate(), email, credential);
        let stored = self.store.insert(account)?;
        debug!(account_id = %stored.id(), "account created");
        Ok(stored)
    }

    /// Looks up an account by id, translating absence into a typed error.
    ///
    /// # Errors
    ///
    /// * [`AccountError::AccountNotFound`] when no account has this id.
    /// * [`AccountError::Store`] on backend failure.
    pub fn account_by_id(&self, id: &AccountId) -> AccountResult<Account> {
        self.store
            .find_by_id(id)?
            .ok_or(AccountError::AccountNotFound { id: *id })
    }

    /// Looks up many accounts at once. Ids without a record are skipped;
    /// an all-unknown input yields an empty list, not an error.
    ///
    /// # Errors
    ///
    /// [`AccountError::Store`] on backend failure.
    pub fn accounts_by_ids(&self, ids: &[AccountId]) -> AccountResult<Vec<Account>> {
        Ok(self.store.find_by_ids(ids)?)
    }
}
