//! Login credentials submitted by a user.
//!
//! Inbound adapters build [`LoginCredentials`] before talking to the session
//! manager so payload validation stays out of the lookup itself.

use std::fmt;

use zeroize::Zeroizing;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Identifier was missing or blank.
    EmptyIdentifier,
    /// Password was empty.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyIdentifier => write!(f, "identifier must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `identifier` is a username or email and is kept verbatim; a blank
///   identifier is rejected but surrounding whitespace is not stripped.
/// - `password` is non-empty and kept verbatim, so `"12345678 "` and
///   `"12345678"` are different passwords.
///
/// # Examples
/// ```
/// use campaign_auth::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("lider@campana.com", "12345678").unwrap();
/// assert_eq!(creds.identifier(), "lider@campana.com");
/// assert_eq!(creds.password(), "12345678");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    identifier: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw identifier/password inputs.
    pub fn try_from_parts(identifier: &str, password: &str) -> Result<Self, LoginValidationError> {
        if identifier.trim().is_empty() {
            return Err(LoginValidationError::EmptyIdentifier);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            identifier: identifier.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username or email as submitted.
    pub fn identifier(&self) -> &str {
        self.identifier.as_str()
    }

    /// Password as submitted.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("identifier", &self.identifier)
            .field("password", &"<redacted>")
            .finish()
    }
}
