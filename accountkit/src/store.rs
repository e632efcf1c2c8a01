//! The account-store collaborator seam.

use crate::account::{Account, AccountId};
use crate::error::StoreResult;

/// Storage collaborator for account records.
///
/// The service layer is written against this seam; schema, transactions,
/// and indexing live entirely behind it. Implementations hold plain record
/// semantics: absence is `None` or an empty result, never an error. The
/// service layer decides what absence means.
///
/// Implementations must be safe to share across threads.
pub trait AccountStore: Send + Sync {
    /// Number of stored accounts with exactly this email.
    ///
    /// # Errors
    ///
    /// [`StoreError`](crate::StoreError) on backend failure.
    fn count_by_email(&self, email: &str) -> StoreResult<usize>;

    /// Persists a new account record and returns the stored form.
    ///
    /// # Errors
    ///
    /// [`StoreError`](crate::StoreError) on backend failure.
    fn insert(&self, account: Account) -> StoreResult<Account>;

    /// Looks up one account by id.
    ///
    /// # Errors
    ///
    /// [`StoreError`](crate::StoreError) on backend failure; a missing
    /// record is `Ok(None)`.
    fn find_by_id(&self, id: &AccountId) -> StoreResult<Option<Account>>;

    /// Looks up many accounts at once. Ids without a record are skipped, so
    /// the result may be shorter than `ids`.
    ///
    /// # Errors
    ///
    /// [`StoreError`](crate::StoreError) on backend failure.
    fn find_by_ids(&self, ids: &[AccountId]) -> StoreResult<Vec<Account>>;
}
