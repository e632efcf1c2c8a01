//! Account records and creation attributes.

use std::fmt;

use secrecy::SecretString;
use uuid::Uuid;

use accountkit_core::Credential;

/// Unique account identifier, a random UUID under the hood.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Wraps an existing UUID, for ids read back from a store.
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generates a fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored user account: identity, email, and the password credential
/// derived at creation time.
#[derive(Debug, Clone)]
pub struct Account {
    id: AccountId,
    email: String,
    credential: Credential,
}

impl Account {
    /// Assembles an account record.
    #[must_use]
    pub fn new(id: AccountId, email: impl Into<String>, credential: Credential) -> Self {
        Self {
            id,
            email: email.into(),
            credential,
        }
    }

    /// Account id.
    #[must_use]
    pub const fn id(&self) -> AccountId {
        self.id
    }

    /// Email address, stored as given at creation.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The stored password credential.
    #[must_use]
    pub const fn credential(&self) -> &Credential {
        &self.credential
    }
}

/// Attributes for creating an account: the address plus the plaintext
/// password, which lives only long enough to be derived into a credential.
///
/// The password rides in a [`SecretString`], so it is redacted from `Debug`
/// output and wiped from memory on drop.
pub struct NewAccount {
    email: String,
    password: SecretString,
}

impl NewAccount {
    /// Bundles creation attributes.
    #[must_use]
    pub fn new(email: impl Into<String>, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }

    /// Email address for the new account.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Splits into the email and the still-wrapped password.
    #[must_use]
    pub fn into_parts(self) -> (String, SecretString) {
        (self.email, self.password)
    }
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
