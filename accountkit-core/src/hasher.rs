//! Password hashing: salt generation, PBKDF2 key derivation, verification.

use std::sync::Arc;

use hmac::Hmac;
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use zeroize::Zeroizing;

use crate::credential::{Credential, DerivedKey, Salt};
use crate::error::{HasherError, HasherResult};
use crate::params::{Digest, HashParams};

/// Turns plaintext passwords into [`Credential`]s and checks attempts
/// against stored credentials.
///
/// The hasher's own parameters apply to new derivations only. Verification
/// re-derives with the parameters recorded in the credential, so a hasher
/// configured with raised parameters still verifies credentials produced
/// under older ones.
///
/// A derivation costs on the order of the iteration count in HMAC rounds,
/// so both operations run on the blocking thread pool and the async
/// executor is never stalled. Clones share the concurrency limit, if one
/// was set.
///
/// ```
/// use accountkit_core::{Digest, HashParams, PasswordHasher};
///
/// # tokio_test::block_on(async {
/// let params = HashParams::new(32, 5_000, Digest::Sha256)?;
/// let hasher = PasswordHasher::new(params);
///
/// let credential = hasher.derive("correct-horse-battery-staple").await?;
/// assert!(hasher.verify("correct-horse-battery-staple", &credential).await?);
/// assert!(!hasher.verify("tr0ub4dor&3", &credential).await?);
/// # Ok::<(), accountkit_core::HasherError>(())
/// # }).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: HashParams,
    limiter: Option<Arc<Semaphore>>,
}

impl Default for PasswordHasher {
    /// A hasher with the reference deployment's parameters
    /// ([`HashParams::default`]).
    fn default() -> Self {
        Self::new(HashParams::default())
    }
}

impl PasswordHasher {
    /// Creates a hasher deriving new credentials with `params`.
    #[must_use]
    pub const fn new(params: HashParams) -> Self {
        Self {
            params,
            limiter: None,
        }
    }

    /// Bounds how many derivations may run at once.
    ///
    /// Each derivation burns a blocking-pool thread for the full iteration
    /// count, which makes an unbounded flood of them a denial-of-service
    /// vector. With a limit in place, excess calls wait their turn instead
    /// of piling onto the pool. Clones of the hasher share the limit.
    #[must_use]
    pub fn with_max_concurrent(mut self, limit: usize) -> Self {
        self.limiter = Some(Arc::new(Semaphore::new(limit)));
        self
    }

    /// Parameters used for new derivations.
    #[must_use]
    pub const fn params(&self) -> HashParams {
        self.params
    }

    /// Derives a credential from `password` under a freshly generated salt.
    ///
    /// The salt is `params().length()` bytes from the operating system
    /// CSPRNG; the derived key is PBKDF2-HMAC over the password bytes and
    /// the raw salt bytes. No password policy is imposed here (the empty
    /// string derives like any other); policy belongs to the caller.
    ///
    /// # Errors
    ///
    /// * [`HasherError::EntropyUnavailable`] when the system random source
    ///   fails. Retryable at the caller's discretion.
    /// * [`HasherError::DerivationFailure`] for out-of-bounds parameters or
    ///   a primitive-level failure.
    /// * [`HasherError::TaskFailure`] when the worker task dies before
    ///   producing a result.
    pub async fn derive(&self, password: &str) -> HasherResult<Credential> {
        let _permit = self.acquire_slot().await?;
        let params = self.params;
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || -> HasherResult<Credential> {
            let salt = Salt::generate(params.length())?;
            derive_credential(params, &password, salt)
        })
        .await
        .map_err(|err| HasherError::task(err.to_string()))?
    }

    /// Derives a credential from `password` and a known base64 salt, the
    /// re-hash path for checking an attempt against stored material.
    ///
    /// The salt must decode to exactly `params().length()` bytes and is
    /// used verbatim; it is decoded before any worker is spawned, so a
    /// malformed salt costs nothing.
    ///
    /// # Errors
    ///
    /// * [`HasherError::InvalidSaltEncoding`] when `salt` is not valid
    ///   base64 or decodes to the wrong number of bytes.
    /// * Otherwise as for [`PasswordHasher::derive`], minus the entropy
    ///   failure.
    pub async fn derive_with_salt(&self, password: &str, salt: &str) -> HasherResult<Credential> {
        let _permit = self.acquire_slot().await?;
        let params = self.params;
        let salt = Salt::from_base64(salt, params.length())?;
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || -> HasherResult<Credential> {
            derive_credential(params, &password, salt)
        })
        .await
        .map_err(|err| HasherError::task(err.to_string()))?
    }

    /// Checks `password` against a stored credential.
    ///
    /// Re-derives with the salt and parameters recorded in `credential` and
    /// compares the result in constant time: the comparison cost depends
    /// only on the key lengths, never on where the keys first differ.
    ///
    /// A wrong password is `Ok(false)`. A failure during re-derivation is
    /// an `Err`, never a silent `false`.
    ///
    /// # Errors
    ///
    /// [`HasherError::DerivationFailure`] or [`HasherError::TaskFailure`],
    /// as for [`PasswordHasher::derive`].
    pub async fn verify(&self, password: &str, credential: &Credential) -> HasherResult<bool> {
        let _permit = self.acquire_slot().await?;
        let params = credential.params();
        let salt = credential.salt().clone();
        let expected = credential.hash().clone();
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || -> HasherResult<bool> {
            let candidate = derive_key_material(params, password.as_bytes(), salt.as_bytes())?;
            Ok(candidate.ct_eq(&expected))
        })
        .await
        .map_err(|err| HasherError::task(err.to_string()))?
    }

    async fn acquire_slot(&self) -> HasherResult<Option<OwnedSemaphorePermit>> {
        match &self.limiter {
            Some(limiter) => {
                let permit = Arc::clone(limiter)
                    .acquire_owned()
                    .await
                    .map_err(|_| HasherError::task("derivation limiter closed"))?;
                Ok(Some(permit))
            }
            None => Ok(None),
        }
    }
}

/// Derives the key material and assembles the credential around it.
fn derive_credential(params: HashParams, password: &str, salt: Salt) -> HasherResult<Credential> {
    let hash = derive_key_material(params, password.as_bytes(), salt.as_bytes())?;
    Credential::new(salt, hash, params)
}

/// One PBKDF2-HMAC run over raw password and salt bytes.
///
/// Deterministic: identical password, salt, and parameters always produce
/// identical output. Parameters are revalidated here because they may have
/// arrived from a stored credential rather than [`HashParams::new`].
fn derive_key_material(
    params: HashParams,
    password: &[u8],
    salt: &[u8],
) -> HasherResult<DerivedKey> {
    params.validate()?;
    let mut output = vec![0u8; params.length()];
    let outcome = match params.digest() {
        Digest::Sha1 => {
            pbkdf2::pbkdf2::<Hmac<Sha1>>(password, salt, params.iterations(), &mut output)
        }
        Digest::Sha256 => {
            pbkdf2::pbkdf2::<Hmac<Sha256>>(password, salt, params.iterations(), &mut output)
        }
        Digest::Sha512 => {
            pbkdf2::pbkdf2::<Hmac<Sha512>>(password, salt, params.iterations(), &mut output)
        }
    };
    outcome.map_err(|err| {
        HasherError::derivation(format!(
            "pbkdf2-{} rejected its inputs: {err}",
            params.digest()
        ))
    })?;
    Ok(DerivedKey::from_bytes(output))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_params() -> HashParams {
        HashParams::new(16, 2, Digest::Sha1).expect("bounds hold")
    }

    // RFC 6070: PBKDF2-HMAC-SHA1("password", "salt", 4096 iterations, 20 bytes).
    #[test]
    fn sha1_derivation_matches_rfc_6070() {
        let params = HashParams::new(20, 4_096, Digest::Sha1).expect("bounds hold");
        let key = derive_key_material(params, b"password", b"salt").expect("derivation succeeds");
        assert_eq!(
            hex::encode(key.as_bytes()),
            "4b007901b765489abead49d926f721d065a429c1"
        );
    }

    #[test]
    fn sha256_derivation_matches_published_vector() {
        let params = HashParams::new(32, 4_096, Digest::Sha256).expect("bounds hold");
        let key = derive_key_material(params, b"password", b"salt").expect("derivation succeeds");
        assert_eq!(
            hex::encode(key.as_bytes()),
            "c5e478d59288c841aa530db6845c4c8d962893a001ce4e11a4963873aa98134a"
        );
    }

    #[test]
    fn sha512_derivation_matches_published_vector() {
        let params = HashParams::new(64, 4_096, Digest::Sha512).expect("bounds hold");
        let key = derive_key_material(params, b"password", b"salt").expect("derivation succeeds");
        assert_eq!(
            hex::encode(key.as_bytes()),
            "d197b1b33db0143e018b12f3d1d1479e6cdebdcc97c5c0f87f6902e072f457b5\
             143f30602641b3d55cd335988cb36b84376060ecd532e039b742a239434af2d5"
        );
    }

    #[test]
    fn derivation_is_deterministic() {
        let params = quick_params();
        let first = derive_key_material(params, b"swordfish", b"0123456789abcdef").expect("ok");
        let second = derive_key_material(params, b"swordfish", b"0123456789abcdef").expect("ok");
        assert!(first.ct_eq(&second));
    }

    #[test]
    fn unvalidated_stored_params_are_rejected_at_derivation() {
        let params: HashParams =
            serde_json::from_str(r#"{"length":16,"iterations":0,"digest":"sha1"}"#).unwrap();
        let err = derive_key_material(params, b"pw", b"0123456789abcdef").unwrap_err();
        assert!(matches!(err, HasherError::DerivationFailure { .. }));
    }

    #[tokio::test]
    async fn derive_produces_a_fresh_full_length_salt_each_time() {
        let hasher = PasswordHasher::new(quick_params());
        let first = hasher.derive("swordfish").await.expect("derive succeeds");
        let second = hasher.derive("swordfish").await.expect("derive succeeds");

        assert_eq!(first.salt().len(), 16);
        assert_eq!(second.salt().len(), 16);
        assert_ne!(first.salt(), second.salt());
        assert!(!first.hash().ct_eq(second.hash()));
    }

    #[tokio::test]
    async fn derive_with_salt_reuses_the_given_salt_verbatim() {
        let hasher = PasswordHasher::new(quick_params());
        let salt_text = "MDEyMzQ1Njc4OWFiY2RlZg==";
        let credential = hasher
            .derive_with_salt("swordfish", salt_text)
            .await
            .expect("derive succeeds");
        assert_eq!(credential.salt().to_base64(), salt_text);
    }

    #[tokio::test]
    async fn derive_with_salt_rejects_malformed_text() {
        let hasher = PasswordHasher::new(quick_params());
        let err = hasher
            .derive_with_salt("swordfish", "!!not-base64!!")
            .await
            .unwrap_err();
        assert!(matches!(err, HasherError::InvalidSaltEncoding { .. }));
    }

    #[tokio::test]
    async fn derive_with_salt_rejects_wrong_length_salt() {
        let hasher = PasswordHasher::new(quick_params());
        // Eight bytes where params say sixteen.
        let err = hasher
            .derive_with_salt("swordfish", "QUJDREVGR0g=")
            .await
            .unwrap_err();
        assert!(matches!(err, HasherError::InvalidSaltEncoding { .. }));
    }

    #[tokio::test]
    async fn verify_accepts_the_original_password_and_rejects_others() {
        let hasher = PasswordHasher::new(quick_params());
        let credential = hasher.derive("swordfish").await.expect("derive succeeds");

        assert!(hasher.verify("swordfish", &credential).await.expect("ok"));
        assert!(!hasher.verify("sword-fish", &credential).await.expect("ok"));
        assert!(!hasher.verify("", &credential).await.expect("ok"));
    }

    #[tokio::test]
    async fn empty_password_derives_and_verifies_like_any_other() {
        let hasher = PasswordHasher::new(quick_params());
        let credential = hasher.derive("").await.expect("derive succeeds");
        assert!(hasher.verify("", &credential).await.expect("ok"));
        assert!(!hasher.verify("x", &credential).await.expect("ok"));
    }

    #[tokio::test]
    async fn verify_honors_the_params_stored_in_the_credential() {
        let legacy = PasswordHasher::new(quick_params());
        let credential = legacy.derive("swordfish").await.expect("derive succeeds");

        // A hasher configured for far heavier derivations still verifies the
        // old credential, using the credential's own cheap parameters.
        let raised = PasswordHasher::new(HashParams::recommended());
        assert!(raised.verify("swordfish", &credential).await.expect("ok"));
        assert!(!raised.verify("wrong", &credential).await.expect("ok"));
    }

    #[tokio::test]
    async fn limiter_bounded_hasher_completes_all_derivations() {
        let hasher = PasswordHasher::new(quick_params()).with_max_concurrent(2);
        let (a, b, c, d) = tokio::join!(
            hasher.derive("one"),
            hasher.derive("two"),
            hasher.derive("three"),
            hasher.derive("four"),
        );
        assert!(a.is_ok() && b.is_ok() && c.is_ok() && d.is_ok());
    }
}
