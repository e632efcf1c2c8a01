//! Key derivation parameters and digest selection.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{HasherError, HasherResult};

/// Derived key and salt length, in bytes, of the reference deployment.
pub const DEFAULT_KEY_LENGTH: usize = 128;

/// PBKDF2 iteration count of the reference deployment.
pub const DEFAULT_ITERATIONS: u32 = 30_547;

/// Smallest derived key length accepted by [`HashParams::new`].
pub const MIN_KEY_LENGTH: usize = 16;

/// Largest derived key length accepted by [`HashParams::new`].
pub const MAX_KEY_LENGTH: usize = 512;

/// Largest iteration count accepted by [`HashParams::new`].
///
/// Guards against a misconfiguration turning every login into a multi-minute
/// CPU burn.
pub const MAX_ITERATIONS: u32 = 5_000_000;

/// Hash primitive driving the PBKDF2-HMAC derivation.
///
/// Names round-trip through lowercase strings (`"sha1"`, `"sha256"`,
/// `"sha512"`) in both `serde` and [`FromStr`](std::str::FromStr) form, so a
/// digest stored next to a credential parses back to the same variant.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Digest {
    /// SHA-1, the digest of the reference deployment. Kept as the default so
    /// existing credentials keep verifying; PBKDF2-HMAC-SHA1 is not weakened
    /// by SHA-1 collision attacks, but new deployments should prefer
    /// [`Digest::Sha256`].
    #[default]
    Sha1,
    /// SHA-256.
    Sha256,
    /// SHA-512.
    Sha512,
}

/// Parameters of one key derivation: output length, work factor, and digest.
///
/// Every [`Credential`](crate::Credential) records the parameters that
/// produced it, so a deployment can raise these for new credentials without
/// invalidating stored ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashParams {
    /// Derived key and salt length in bytes.
    length: usize,
    /// PBKDF2 iteration count.
    iterations: u32,
    /// Hash primitive for the HMAC.
    digest: Digest,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            length: DEFAULT_KEY_LENGTH,
            iterations: DEFAULT_ITERATIONS,
            digest: Digest::Sha1,
        }
    }
}

impl HashParams {
    /// Creates a validated parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`HasherError::DerivationFailure`] when `length` or
    /// `iterations` falls outside the accepted bounds.
    pub fn new(length: usize, iterations: u32, digest: Digest) -> HasherResult<Self> {
        let params = Self {
            length,
            iterations,
            digest,
        };
        params.validate()?;
        Ok(params)
    }

    /// Parameters recommended for new deployments: 32-byte keys from 600,000
    /// rounds of PBKDF2-HMAC-SHA256, per current OWASP password storage
    /// guidance.
    #[must_use]
    pub const fn recommended() -> Self {
        Self {
            length: 32,
            iterations: 600_000,
            digest: Digest::Sha256,
        }
    }

    /// Derived key and salt length in bytes.
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }

    /// PBKDF2 iteration count.
    #[must_use]
    pub const fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Hash primitive for the HMAC.
    #[must_use]
    pub const fn digest(&self) -> Digest {
        self.digest
    }

    /// Checks the parameter bounds.
    ///
    /// Deserialized parameter sets bypass [`HashParams::new`], so everything
    /// that accepts stored or remote parameters revalidates through this
    /// before deriving.
    ///
    /// # Errors
    ///
    /// Returns [`HasherError::DerivationFailure`] naming the violated bound.
    pub fn validate(&self) -> HasherResult<()> {
        if !(MIN_KEY_LENGTH..=MAX_KEY_LENGTH).contains(&self.length) {
            return Err(HasherError::derivation(format!(
                "key length {} outside {MIN_KEY_LENGTH}..={MAX_KEY_LENGTH}",
                self.length
            )));
        }
        if !(1..=MAX_ITERATIONS).contains(&self.iterations) {
            return Err(HasherError::derivation(format!(
                "iteration count {} outside 1..={MAX_ITERATIONS}",
                self.iterations
            )));
        }
        Ok(())
    }
}
