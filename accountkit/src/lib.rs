//! User-account capability on top of [`accountkit_core`].
//!
//! [`AccountService`] implements the account rules: creation rejects an
//! email that is already taken, the password is derived into a
//! [`Credential`] before anything is persisted, and id lookups translate
//! absence into [`AccountError::AccountNotFound`]. Persistence sits behind
//! the [`AccountStore`] seam; [`MemoryAccountStore`] is the in-process
//! implementation used in tests.
//!
//! Plaintext passwords enter as [`secrecy::SecretString`] and exist only
//! until derivation; they are never stored or logged.
//!
//! ```
//! use accountkit::{
//!     AccountService, Digest, HashParams, MemoryAccountStore, NewAccount, PasswordHasher,
//! };
//! use secrecy::SecretString;
//!
//! # tokio_test::block_on(async {
//! let hasher = PasswordHasher::new(HashParams::new(32, 5_000, Digest::Sha256)?);
//! let service = AccountService::new(MemoryAccountStore::new(), hasher);
//!
//! let account = service
//!     .create_account(NewAccount::new(
//!         "user@example.com",
//!         SecretString::from("correct-horse-battery-staple"),
//!     ))
//!     .await?;
//!
//! let fetched = service.account_by_id(&account.id())?;
//! assert_eq!(fetched.email(), "user@example.com");
//! # Ok::<(), accountkit::AccountError>(())
//! # }).unwrap();
//! ```

mod account;
mod error;
mod memory;
mod service;
mod store;

pub use account::{Account, AccountId, NewAccount};
pub use error::{AccountError, AccountResult, StoreError, StoreResult};
pub use memory::MemoryAccountStore;
pub use service::AccountService;
pub use store::AccountStore;

pub use accountkit_core::{
    Credential, Digest, EncodedCredential, HashParams, HasherError, PasswordHasher,
};
