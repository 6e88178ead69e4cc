//! Permission tokens and permission sets.
//!
//! A user either holds the `all` wildcard or an explicit set of tokens.
//! Checks are literal, case-sensitive membership tests; there is no
//! hierarchy, prefix matching or scoping.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Token granting every permission.
pub const ALL_PERMISSIONS_TOKEN: &str = "all";

/// Validation errors for permission tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionValidationError {
    /// Token was empty.
    #[error("permission must not be empty")]
    Empty,
    /// Token contained characters outside the allowed alphabet.
    #[error("permission '{value}' may only contain ASCII letters, digits, '_', '-', '.' or ':'")]
    InvalidCharacters {
        /// Offending token.
        value: String,
    },
}

/// Validated permission token.
///
/// # Examples
/// ```
/// use campaign_auth::domain::Permission;
///
/// let permission = Permission::new("automations").expect("valid token");
/// assert_eq!(permission.as_ref(), "automations");
/// assert!(Permission::new("api keys").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permission(String);

impl Permission {
    /// Validate and construct a permission token.
    pub fn new(value: impl Into<String>) -> Result<Self, PermissionValidationError> {
        Self::from_owned(value.into())
    }

    fn from_owned(value: String) -> Result<Self, PermissionValidationError> {
        if value.is_empty() {
            return Err(PermissionValidationError::Empty);
        }
        let allowed = |ch: char| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.' | ':');
        if !value.chars().all(allowed) {
            return Err(PermissionValidationError::InvalidCharacters { value });
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for Permission {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        value.0
    }
}

impl TryFrom<String> for Permission {
    type Error = PermissionValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Permissions held by a user.
///
/// Serialises as a list of tokens; a list containing `all` collapses to
/// [`PermissionSet::All`] and serialises back as `["all"]`.
///
/// # Examples
/// ```
/// use campaign_auth::domain::{Permission, PermissionSet};
///
/// let set = PermissionSet::from_tokens(["dashboard", "messaging"]).expect("valid tokens");
/// assert!(set.allows_token("messaging"));
/// assert!(!set.allows_token("database"));
///
/// let all = PermissionSet::from_tokens(["all"]).expect("wildcard");
/// assert!(all.allows(&Permission::new("database").expect("valid token")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub enum PermissionSet {
    /// Wildcard: every permission is granted.
    All,
    /// Explicit grants.
    Granted(BTreeSet<Permission>),
}

impl PermissionSet {
    /// Build a set from raw tokens, collapsing to [`PermissionSet::All`] when
    /// the wildcard is present.
    pub fn from_tokens<I, T>(tokens: I) -> Result<Self, PermissionValidationError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut granted = BTreeSet::new();
        let mut wildcard = false;
        for token in tokens {
            let permission = Permission::new(token)?;
            if permission.as_ref() == ALL_PERMISSIONS_TOKEN {
                wildcard = true;
            } else {
                granted.insert(permission);
            }
        }
        if wildcard {
            Ok(Self::All)
        } else {
            Ok(Self::Granted(granted))
        }
    }

    /// Empty explicit set.
    #[must_use]
    pub fn none() -> Self {
        Self::Granted(BTreeSet::new())
    }

    /// Whether the set is the wildcard.
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Membership test for a validated permission.
    #[must_use]
    pub fn allows(&self, permission: &Permission) -> bool {
        match self {
            Self::All => true,
            Self::Granted(granted) => granted.contains(permission),
        }
    }

    /// Membership test for a raw token.
    ///
    /// Tokens that fail validation are never granted, except under `All`.
    #[must_use]
    pub fn allows_token(&self, token: &str) -> bool {
        match self {
            Self::All => true,
            Self::Granted(granted) => granted.iter().any(|permission| permission.as_ref() == token),
        }
    }

    /// Tokens in wire form.
    #[must_use]
    pub fn to_tokens(&self) -> Vec<String> {
        match self {
            Self::All => vec![ALL_PERMISSIONS_TOKEN.to_owned()],
            Self::Granted(granted) => granted.iter().map(|p| p.as_ref().to_owned()).collect(),
        }
    }
}

impl From<PermissionSet> for Vec<String> {
    fn from(value: PermissionSet) -> Self {
        value.to_tokens()
    }
}

impl TryFrom<Vec<String>> for PermissionSet {
    type Error = PermissionValidationError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_tokens(value)
    }
}
