//! Credential material: salts, derived keys, and their storage encoding.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{HasherError, HasherResult};
use crate::params::HashParams;

/// Random bytes mixed into a derivation to defeat precomputed-table attacks.
///
/// A salt must be unique per credential but is not secret; it is stored in
/// the clear next to the derived key, and `Debug` prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct Salt(Vec<u8>);

impl Salt {
    /// Draws `length` fresh bytes from the operating system CSPRNG.
    ///
    /// The source is safe for concurrent use from many tasks. A failure here
    /// is surfaced as-is, never papered over with a weaker generator.
    ///
    /// # Errors
    ///
    /// Returns [`HasherError::EntropyUnavailable`] when the system source
    /// cannot produce bytes.
    pub fn generate(length: usize) -> HasherResult<Self> {
        let mut bytes = vec![0u8; length];
        getrandom::fill(&mut bytes).map_err(|source| HasherError::EntropyUnavailable { source })?;
        Ok(Self(bytes))
    }

    /// Wraps raw salt bytes.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec cannot be const
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Decodes a base64 salt, requiring exactly `expected_len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`HasherError::InvalidSaltEncoding`] when the text is not
    /// valid standard base64 or decodes to a different number of bytes.
    pub fn from_base64(text: &str, expected_len: usize) -> HasherResult<Self> {
        let bytes = STANDARD
            .decode(text)
            .map_err(|err| HasherError::invalid_salt(format!("not valid base64: {err}")))?;
        if bytes.len() != expected_len {
            return Err(HasherError::invalid_salt(format!(
                "decoded to {} bytes, expected {expected_len}",
                bytes.len()
            )));
        }
        Ok(Self(bytes))
    }

    /// Salt bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of salt bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the salt holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Standard base64 text form, padded, as persisted by stores.
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Salt({})", self.to_base64())
    }
}

/// Key material derived from a password and salt.
///
/// Holds exactly the configured number of bytes. Equality runs in constant
/// time, `Debug` never prints the bytes, and the buffer is zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey(Vec<u8>);

impl DerivedKey {
    /// Wraps derived key bytes.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec cannot be const
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Decodes a base64 derived key, requiring exactly `expected_len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`HasherError::InvalidKeyEncoding`] when the text is not
    /// valid standard base64 or decodes to a different number of bytes.
    pub fn from_base64(text: &str, expected_len: usize) -> HasherResult<Self> {
        let bytes = STANDARD
            .decode(text)
            .map_err(|err| HasherError::invalid_key(format!("not valid base64: {err}")))?;
        if bytes.len() != expected_len {
            return Err(HasherError::invalid_key(format!(
                "decoded to {} bytes, expected {expected_len}",
                bytes.len()
            )));
        }
        Ok(Self(bytes))
    }

    /// Derived key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Standard base64 text form, padded, as persisted by stores.
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    /// Constant-time equality against another derived key.
    ///
    /// The comparison cost depends only on the lengths of the two keys,
    /// never on where they first differ. Keys of unequal length compare
    /// unequal after the single length check.
    #[must_use]
    pub fn ct_eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl PartialEq for DerivedKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other)
    }
}

impl Eq for DerivedKey {}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DerivedKey([REDACTED])")
    }
}

/// A password credential: salt, derived key, and the parameters that
/// produced them.
///
/// The length invariant `salt.len() == hash.len() == params.length()` holds
/// for every constructed value, so a credential read back from a store either
/// satisfies it or fails to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    salt: Salt,
    hash: DerivedKey,
    params: HashParams,
}

impl Credential {
    /// Assembles a credential, enforcing the length invariant.
    ///
    /// # Errors
    ///
    /// Returns [`HasherError::DerivationFailure`] for out-of-bounds
    /// parameters, [`HasherError::InvalidSaltEncoding`] or
    /// [`HasherError::InvalidKeyEncoding`] when a length disagrees with
    /// `params`.
    pub fn new(salt: Salt, hash: DerivedKey, params: HashParams) -> HasherResult<Self> {
        params.validate()?;
        if salt.len() != params.length() {
            return Err(HasherError::invalid_salt(format!(
                "salt is {} bytes, parameters say {}",
                salt.len(),
                params.length()
            )));
        }
        if hash.as_bytes().len() != params.length() {
            return Err(HasherError::invalid_key(format!(
                "derived key is {} bytes, parameters say {}",
                hash.as_bytes().len(),
                params.length()
            )));
        }
        Ok(Self { salt, hash, params })
    }

    /// Salt the key was derived with.
    #[must_use]
    pub const fn salt(&self) -> &Salt {
        &self.salt
    }

    /// The derived key.
    #[must_use]
    pub const fn hash(&self) -> &DerivedKey {
        &self.hash
    }

    /// Parameters this credential was derived under.
    #[must_use]
    pub const fn params(&self) -> HashParams {
        self.params
    }

    /// Converts to the base64 storage form.
    #[must_use]
    pub fn to_encoded(&self) -> EncodedCredential {
        EncodedCredential {
            salt: self.salt.to_base64(),
            hash: self.hash.to_base64(),
            params: self.params,
        }
    }

    /// Parses the base64 storage form back into credential material.
    ///
    /// Parameters travel inside the encoded form and are revalidated here,
    /// so a tampered or truncated record is rejected rather than verified
    /// against.
    ///
    /// # Errors
    ///
    /// As for [`Credential::new`], plus the base64 decoding failures of
    /// [`Salt::from_base64`] and [`DerivedKey::from_base64`].
    pub fn from_encoded(encoded: &EncodedCredential) -> HasherResult<Self> {
        encoded.params.validate()?;
        let salt = Salt::from_base64(&encoded.salt, encoded.params.length())?;
        let hash = DerivedKey::from_base64(&encoded.hash, encoded.params.length())?;
        Ok(Self {
            salt,
            hash,
            params: encoded.params,
        })
    }
}

/// Storage form of a [`Credential`]: two base64 text fields plus the
/// parameter record, which is what an account store persists next to a user
/// row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedCredential {
    /// Base64 of the salt bytes.
    pub salt: String,
    /// Base64 of the derived key bytes.
    pub hash: String,
    /// Parameters that produced `hash`.
    pub params: HashParams,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Digest;

    // Valid base64 of 16 bytes, used where more bytes are required.
    const STANDARD_SHORT: &str = "AAAAAAAAAAAAAAAAAAAAAA==";

    fn params_32() -> HashParams {
        HashParams::new(32, 1_000, Digest::Sha256).expect("bounds hold")
    }

    fn sample_credential() -> Credential {
        let salt = Salt::from_bytes((0u8..32).collect());
        let hash = DerivedKey::from_bytes((100u8..132).collect());
        Credential::new(salt, hash, params_32()).expect("lengths match")
    }

    #[test]
    fn generated_salts_have_the_requested_length() {
        let salt = Salt::generate(128).expect("system entropy available");
        assert_eq!(salt.len(), 128);
        assert!(!salt.is_empty());
    }

    #[test]
    fn generated_salts_differ() {
        let first = Salt::generate(32).expect("system entropy available");
        let second = Salt::generate(32).expect("system entropy available");
        assert_ne!(first, second);
    }

    #[test]
    fn salt_base64_round_trips_exactly() {
        let salt = Salt::from_bytes(vec![0u8; 128]);
        let text = salt.to_base64();
        assert_eq!(text.len(), 172);
        let decoded = Salt::from_base64(&text, 128).expect("round trip");
        assert_eq!(decoded.as_bytes(), salt.as_bytes());
    }

    #[test]
    fn malformed_salt_text_is_rejected() {
        let err = Salt::from_base64("not/valid/base64!!!", 128).unwrap_err();
        assert!(matches!(err, HasherError::InvalidSaltEncoding { .. }));
    }

    #[test]
    fn wrong_length_salt_is_rejected() {
        let err = Salt::from_base64(STANDARD_SHORT, 128).unwrap_err();
        assert!(matches!(err, HasherError::InvalidSaltEncoding { .. }));
    }

    #[test]
    fn derived_key_equality_is_by_content() {
        let a = DerivedKey::from_bytes(vec![7u8; 32]);
        let b = DerivedKey::from_bytes(vec![7u8; 32]);
        assert_eq!(a, b);
        assert!(a.ct_eq(&b));
    }

    #[test]
    fn derived_keys_differing_anywhere_compare_unequal() {
        let base = DerivedKey::from_bytes(vec![7u8; 32]);

        let mut first = vec![7u8; 32];
        first[0] ^= 1;
        assert!(!base.ct_eq(&DerivedKey::from_bytes(first)));

        let mut last = vec![7u8; 32];
        last[31] ^= 1;
        assert!(!base.ct_eq(&DerivedKey::from_bytes(last)));

        let shorter = DerivedKey::from_bytes(vec![7u8; 31]);
        assert!(!base.ct_eq(&shorter));
    }

    #[test]
    fn derived_key_debug_is_redacted() {
        let key = DerivedKey::from_bytes(vec![0xAB; 16]);
        let rendered = format!("{key:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains(&key.to_base64()));
    }

    #[test]
    fn credential_round_trips_through_the_encoded_form() {
        let credential = sample_credential();
        let encoded = credential.to_encoded();
        let decoded = Credential::from_encoded(&encoded).expect("storage form is valid");
        assert_eq!(decoded, credential);
        assert_eq!(decoded.params(), params_32());
    }

    #[test]
    fn encoded_form_serializes_with_named_fields() {
        let encoded = sample_credential().to_encoded();
        let json = serde_json::to_value(&encoded).unwrap();
        assert!(json["salt"].is_string());
        assert!(json["hash"].is_string());
        assert_eq!(json["params"]["digest"], "sha256");
    }

    #[test]
    fn length_invariant_is_enforced_at_assembly() {
        let err = Credential::new(
            Salt::from_bytes(vec![0u8; 16]),
            DerivedKey::from_bytes(vec![0u8; 32]),
            params_32(),
        )
        .unwrap_err();
        assert!(matches!(err, HasherError::InvalidSaltEncoding { .. }));

        let err = Credential::new(
            Salt::from_bytes(vec![0u8; 32]),
            DerivedKey::from_bytes(vec![0u8; 16]),
            params_32(),
        )
        .unwrap_err();
        assert!(matches!(err, HasherError::InvalidKeyEncoding { .. }));
    }

    #[test]
    fn tampered_encoded_params_are_rejected() {
        let mut encoded = sample_credential().to_encoded();
        encoded.params =
            serde_json::from_str(r#"{"length":32,"iterations":0,"digest":"sha256"}"#).unwrap();
        let err = Credential::from_encoded(&encoded).unwrap_err();
        assert!(matches!(err, HasherError::DerivationFailure { .. }));
    }

    #[test]
    fn truncated_encoded_hash_is_rejected() {
        let mut encoded = sample_credential().to_encoded();
        encoded.hash = STANDARD_SHORT.to_owned();
        let err = Credential::from_encoded(&encoded).unwrap_err();
        assert!(matches!(err, HasherError::InvalidKeyEncoding { .. }));
    }
}
