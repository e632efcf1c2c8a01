//! In-memory account store.
//!
//! Not a production backend: no durability, linear email scans, one
//! process-local map behind a mutex. It exists so code written against
//! [`AccountStore`] can be exercised in unit and integration tests without
//! standing up real storage.

// The whole module works through short-lived mutex guards.
#![allow(clippy::significant_drop_tightening)]

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::account::{Account, AccountId};
use crate::error::{StoreError, StoreResult};
use crate::store::AccountStore;

/// [`AccountStore`] backed by a process-local map.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    records: Mutex<HashMap<AccountId, Account>>,
}

impl MemoryAccountStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    ///
    /// # Errors
    ///
    /// [`StoreError`] if the interior mutex was poisoned by a crashed
    /// writer.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.lock()?.len())
    }

    /// Whether the store holds no accounts.
    ///
    /// # Errors
    ///
    /// As for [`MemoryAccountStore::len`].
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, HashMap<AccountId, Account>>> {
        self.records
            .lock()
            .map_err(|_| StoreError::new("store mutex poisoned"))
    }
}

impl AccountStore for MemoryAccountStore {
    fn count_by_email(&self, email: &str) -> StoreResult<usize> {
        let records = self.lock()?;
        Ok(records
            .values()
            .filter(|account| account.email() == email)
            .count())
    }

    fn insert(&self, account: Account) -> StoreResult<Account> {
        let mut records = self.lock()?;
        records.insert(account.id(), account.clone());
        Ok(account)
    }

    fn find_by_id(&self, id: &AccountId) -> StoreResult<Option<Account>> {
        let records = self.lock()?;
        Ok(records.get(id).cloned())
    }

    fn find_by_ids(&self, ids: &[AccountId]) -> StoreResult<Vec<Account>> {
        let records = self.lock()?;
        Ok(ids
            .iter()
            .filter_map(|id| records.get(id).cloned())
            .collect())
    }
}
