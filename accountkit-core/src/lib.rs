//! Password hashing core for AccountKit.
//!
//! This crate owns everything between a plaintext password and the material
//! that may be stored for it:
//!
//! * **Salt generation** from the operating system CSPRNG, one full-length
//!   salt per credential ([`Salt`]).
//! * **Key derivation** with PBKDF2-HMAC over the raw password and salt
//!   bytes, parameterized by [`HashParams`] ([`PasswordHasher::derive`]).
//! * **Verification** that re-derives and compares in constant time
//!   ([`PasswordHasher::verify`]).
//!
//! Each [`Credential`] records the parameters that produced it, so a
//! deployment can raise its work factor for new credentials while old ones
//! keep verifying. The defaults ([`HashParams::default`]) reproduce the
//! reference deployment byte for byte: 128-byte keys, 30,547 iterations,
//! SHA-1, standard padded base64 at the storage boundary.
//!
//! Derivation is CPU work proportional to the iteration count. The async
//! operations push it onto the blocking thread pool and can be capped with
//! [`PasswordHasher::with_max_concurrent`]; the calling executor is never
//! blocked.
//!
//! ```
//! use accountkit_core::{Digest, HashParams, PasswordHasher};
//!
//! # tokio_test::block_on(async {
//! let hasher = PasswordHasher::new(HashParams::new(32, 5_000, Digest::Sha256)?);
//!
//! let credential = hasher.derive("correct-horse-battery-staple").await?;
//! assert!(hasher.verify("correct-horse-battery-staple", &credential).await?);
//!
//! // The storage form round-trips through plain serde types.
//! let stored = credential.to_encoded();
//! let restored = accountkit_core::Credential::from_encoded(&stored)?;
//! assert!(hasher.verify("correct-horse-battery-staple", &restored).await?);
//! # Ok::<(), accountkit_core::HasherError>(())
//! # }).unwrap();
//! ```

mod credential;
mod error;
mod hasher;
mod params;

pub use credential::{Credential, DerivedKey, EncodedCredential, Salt};
pub use error::{HasherError, HasherResult};
pub use hasher::PasswordHasher;
pub use params::{
    Digest, HashParams, DEFAULT_ITERATIONS, DEFAULT_KEY_LENGTH, MAX_ITERATIONS, MAX_KEY_LENGTH,
    MIN_KEY_LENGTH,
};
