//! Credential records and their identity newtypes.
//!
//! A [`Credential`] is the domain view of a registry entry: identity,
//! authorisation data and a salted password hash. It never carries a
//! plaintext password.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{PasswordHash, PermissionSet, Role};

/// Validation errors for credential identity fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialValidationError {
    /// Identifier was blank.
    #[error("credential id must not be empty")]
    EmptyId,
    /// Identifier had leading or trailing whitespace.
    #[error("credential id must not contain surrounding whitespace")]
    PaddedId,
    /// Email did not look like `local@domain.tld`.
    #[error("email '{value}' is not a valid address")]
    InvalidEmail {
        /// Offending value.
        value: String,
    },
    /// Username was blank.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Username contained whitespace or `@`.
    #[error("username '{value}' must not contain whitespace or '@'")]
    InvalidUsername {
        /// Offending value.
        value: String,
    },
    /// Display name was blank.
    #[error("name must not be empty")]
    EmptyName,
}

impl CredentialValidationError {
    /// Registry field the error refers to.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyId | Self::PaddedId => "id",
            Self::InvalidEmail { .. } => "email",
            Self::EmptyUsername | Self::InvalidUsername { .. } => "username",
            Self::EmptyName => "name",
        }
    }
}

/// Stable credential identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CredentialId(String);

impl CredentialId {
    /// Validate and construct an identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, CredentialValidationError> {
        Self::from_owned(value.into())
    }

    fn from_owned(value: String) -> Result<Self, CredentialValidationError> {
        if value.trim().is_empty() {
            return Err(CredentialValidationError::EmptyId);
        }
        if value.trim() != value {
            return Err(CredentialValidationError::PaddedId);
        }
        Ok(Self(value))
    }
}

/// Email address used as a login identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

impl Email {
    /// Validate and construct an email address.
    pub fn new(value: impl Into<String>) -> Result<Self, CredentialValidationError> {
        Self::from_owned(value.into())
    }

    fn from_owned(value: String) -> Result<Self, CredentialValidationError> {
        if !email_regex().is_match(&value) {
            return Err(CredentialValidationError::InvalidEmail { value });
        }
        Ok(Self(value))
    }
}

/// Username used as a login identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a username.
    pub fn new(value: impl Into<String>) -> Result<Self, CredentialValidationError> {
        Self::from_owned(value.into())
    }

    fn from_owned(value: String) -> Result<Self, CredentialValidationError> {
        if value.is_empty() {
            return Err(CredentialValidationError::EmptyUsername);
        }
        if value.chars().any(|ch| ch.is_whitespace() || ch == '@') {
            return Err(CredentialValidationError::InvalidUsername { value });
        }
        Ok(Self(value))
    }
}

macro_rules! string_newtype_impls {
    ($($name:ident),* $(,)?) => {
        $(
            impl AsRef<str> for $name {
                fn as_ref(&self) -> &str {
                    self.0.as_str()
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_ref())
                }
            }

            impl From<$name> for String {
                fn from(value: $name) -> Self {
                    value.0
                }
            }

            impl TryFrom<String> for $name {
                type Error = CredentialValidationError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    Self::from_owned(value)
                }
            }
        )*
    };
}

string_newtype_impls!(CredentialId, Email, Username);

/// Components of a [`Credential`], already validated.
#[derive(Debug, Clone)]
pub struct CredentialParts {
    /// Stable identifier.
    pub id: CredentialId,
    /// Display name.
    pub name: String,
    /// Login username.
    pub username: Username,
    /// Login email.
    pub email: Email,
    /// Salted password hash.
    pub password_hash: PasswordHash,
    /// Assigned role.
    pub role: Role,
    /// Granted permissions.
    pub permissions: PermissionSet,
    /// Optional territory scope label.
    pub territory: Option<String>,
    /// Inactive credentials never authenticate.
    pub active: bool,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
    /// Demo account flag.
    pub is_demo_user: bool,
}

/// Authenticatable credential record.
///
/// ## Invariants
/// - `name` is non-empty once trimmed.
/// - `territory`, when present, is non-empty once trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    id: CredentialId,
    name: String,
    username: Username,
    email: Email,
    password_hash: PasswordHash,
    role: Role,
    permissions: PermissionSet,
    territory: Option<String>,
    active: bool,
    created: DateTime<Utc>,
    is_demo_user: bool,
}

impl Credential {
    /// Assemble a credential from validated parts.
    pub fn new(parts: CredentialParts) -> Result<Self, CredentialValidationError> {
        let CredentialParts {
            id,
            name,
            username,
            email,
            password_hash,
            role,
            permissions,
            territory,
            active,
            created,
            is_demo_user,
        } = parts;
        if name.trim().is_empty() {
            return Err(CredentialValidationError::EmptyName);
        }
        Ok(Self {
            id,
            name,
            username,
            email,
            password_hash,
            role,
            permissions,
            territory: territory.filter(|value| !value.trim().is_empty()),
            active,
            created,
            is_demo_user,
        })
    }

    /// Whether `identifier` names this credential by username or email.
    ///
    /// The comparison is exact: no trimming and no case folding.
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        self.username.as_ref() == identifier || self.email.as_ref() == identifier
    }

    /// Stable record identifier.
    pub fn id(&self) -> &CredentialId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Login username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Login email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Salted password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Assigned role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Granted permissions.
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Territory scope label, if any.
    pub fn territory(&self) -> Option<&str> {
        self.territory.as_deref()
    }

    /// Whether the record may log in.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Creation timestamp.
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Whether the record belongs to the demo account set.
    pub fn is_demo_user(&self) -> bool {
        self.is_demo_user
    }
}
