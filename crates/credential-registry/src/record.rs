//! Validated credential records.

use std::fmt;

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

/// Password material attached to a credential record.
///
/// Production records carry an Argon2 PHC string. Demo records may carry a
/// plaintext password which the consumer hashes before use.
#[derive(Clone, PartialEq, Eq)]
pub enum PasswordSecret {
    /// PHC-formatted password hash.
    Hashed(String),
    /// Plaintext password permitted only on demo records.
    DemoPlaintext(Zeroizing<String>),
}

impl PasswordSecret {
    /// Returns `true` when the secret still needs hashing.
    #[must_use]
    pub const fn is_plaintext(&self) -> bool {
        matches!(self, Self::DemoPlaintext(_))
    }
}

impl fmt::Debug for PasswordSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hashed(_) => f.write_str("Hashed(..)"),
            Self::DemoPlaintext(_) => f.write_str("DemoPlaintext(..)"),
        }
    }
}

/// One credential entry loaded from the registry.
///
/// Fields are validated by [`crate::CredentialRegistry`]; the type itself
/// performs no further checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) secret: PasswordSecret,
    pub(crate) role: String,
    pub(crate) permissions: Vec<String>,
    pub(crate) territory: Option<String>,
    pub(crate) active: bool,
    pub(crate) created: DateTime<Utc>,
    pub(crate) is_demo_user: bool,
}

impl CredentialRecord {
    /// Stable record identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Login username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Login email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Password material.
    #[must_use]
    pub const fn secret(&self) -> &PasswordSecret {
        &self.secret
    }

    /// Role name, one of [`crate::KNOWN_ROLES`].
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Permission tokens in file order.
    #[must_use]
    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }

    /// Territory the user operates in, if any.
    #[must_use]
    pub fn territory(&self) -> Option<&str> {
        self.territory.as_deref()
    }

    /// Whether the record may log in.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Whether the record belongs to the demo account set.
    #[must_use]
    pub const fn is_demo_user(&self) -> bool {
        self.is_demo_user
    }
}
