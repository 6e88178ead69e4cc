//! Credential registry types and JSON parsing.
//!
//! The registry is the static credential list the backend authenticates
//! against. It is loaded once, validated as a whole, and never mutated.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use zeroize::Zeroizing;

use crate::error::RegistryError;
use crate::record::{CredentialRecord, PasswordSecret};
use crate::validation::{
    is_known_role, is_valid_email, is_valid_permission, is_valid_username, parse_created,
};

/// Current supported registry version.
const SUPPORTED_VERSION: u32 = 1;

/// A validated credential registry.
///
/// # Invariants
///
/// - Record ids are unique.
/// - Emails and usernames are unique among active records.
/// - Plaintext passwords appear only on demo records.
///
/// # Example
///
/// ```
/// use credential_registry::CredentialRegistry;
///
/// let json = r#"{
///     "version": 1,
///     "credentials": [{
///         "id": "lider-1",
///         "name": "Líder Norte",
///         "username": "lider",
///         "email": "lider@campana.com",
///         "password": "12345678",
///         "role": "lider",
///         "permissions": ["dashboard", "messaging"],
///         "territory": "Norte",
///         "active": true,
///         "created": "2024-01-15",
///         "isDemoUser": true
///     }]
/// }"#;
///
/// let registry = CredentialRegistry::from_json(json).expect("valid registry");
/// assert_eq!(registry.credentials().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRegistry {
    version: u32,
    credentials: Vec<CredentialRecord>,
}

impl CredentialRegistry {
    /// Parses a credential registry from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the JSON is malformed, the version is
    /// unsupported, or any record fails validation.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let raw: RawCredentialRegistry =
            serde_json::from_str(json).map_err(|e| RegistryError::ParseError {
                message: e.to_string(),
            })?;

        Self::from_raw(raw)
    }

    /// Loads a credential registry from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let contents = fs::read_to_string(path).map_err(|e| RegistryError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_json(&contents)
    }

    fn from_raw(raw: RawCredentialRegistry) -> Result<Self, RegistryError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(RegistryError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        if raw.credentials.is_empty() {
            return Err(RegistryError::EmptyCredentials);
        }

        let credentials = raw
            .credentials
            .into_iter()
            .enumerate()
            .map(|(index, record)| validate_record(index, record))
            .collect::<Result<Vec<_>, _>>()?;

        check_uniqueness(&credentials)?;

        Ok(Self {
            version: raw.version,
            credentials,
        })
    }

    /// Returns the registry version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns every record in file order.
    #[must_use]
    pub fn credentials(&self) -> &[CredentialRecord] {
        &self.credentials
    }

    /// Consumes the registry, yielding its records in file order.
    #[must_use]
    pub fn into_credentials(self) -> Vec<CredentialRecord> {
        self.credentials
    }

    /// Iterates over active records in file order.
    pub fn active(&self) -> impl Iterator<Item = &CredentialRecord> {
        self.credentials.iter().filter(|record| record.is_active())
    }

    /// Finds a record by id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CredentialNotFound`] if no record has the id.
    pub fn find_by_id(&self, id: &str) -> Result<&CredentialRecord, RegistryError> {
        self.credentials
            .iter()
            .find(|record| record.id() == id)
            .ok_or_else(|| RegistryError::CredentialNotFound { id: id.to_owned() })
    }
}

fn validate_record(
    index: usize,
    raw: RawCredentialRecord,
) -> Result<CredentialRecord, RegistryError> {
    if raw.id.trim().is_empty() {
        return Err(RegistryError::invalid_field(index, "id", "must not be empty"));
    }
    if raw.name.trim().is_empty() {
        return Err(RegistryError::invalid_field(index, "name", "must not be empty"));
    }
    if !is_valid_username(&raw.username) {
        return Err(RegistryError::invalid_field(
            index,
            "username",
            "must be non-empty without whitespace or '@'",
        ));
    }
    if !is_valid_email(&raw.email) {
        return Err(RegistryError::invalid_field(
            index,
            "email",
            "must look like local@domain.tld",
        ));
    }
    if !is_known_role(&raw.role) {
        return Err(RegistryError::UnknownRole {
            index,
            value: raw.role,
        });
    }
    if let Some(bad) = raw
        .permissions
        .iter()
        .find(|token| !is_valid_permission(token))
    {
        return Err(RegistryError::InvalidField {
            index,
            field: "permissions",
            message: format!("invalid token '{bad}'"),
        });
    }
    let Some(created) = parse_created(&raw.created) else {
        return Err(RegistryError::invalid_field(
            index,
            "created",
            "must be RFC 3339 or YYYY-MM-DD",
        ));
    };
    let secret = resolve_secret(index, raw.password, raw.password_hash, raw.is_demo_user)?;

    Ok(CredentialRecord {
        id: raw.id,
        name: raw.name,
        username: raw.username,
        email: raw.email,
        secret,
        role: raw.role,
        permissions: raw.permissions,
        territory: raw.territory.filter(|territory| !territory.trim().is_empty()),
        active: raw.active,
        created,
        is_demo_user: raw.is_demo_user,
    })
}

fn resolve_secret(
    index: usize,
    password: Option<String>,
    password_hash: Option<String>,
    is_demo_user: bool,
) -> Result<PasswordSecret, RegistryError> {
    match (password, password_hash) {
        (Some(_), Some(_)) => Err(RegistryError::AmbiguousSecret { index }),
        (None, None) => Err(RegistryError::MissingSecret { index }),
        (Some(_), None) if !is_demo_user => Err(RegistryError::PlaintextPassword { index }),
        (Some(password), None) => Ok(PasswordSecret::DemoPlaintext(Zeroizing::new(password))),
        (None, Some(hash)) if !hash.starts_with('$') => Err(RegistryError::invalid_field(
            index,
            "passwordHash",
            "must be a PHC string",
        )),
        (None, Some(hash)) => Ok(PasswordSecret::Hashed(hash)),
    }
}

fn check_uniqueness(credentials: &[CredentialRecord]) -> Result<(), RegistryError> {
    let mut ids = HashSet::new();
    let mut emails = HashSet::new();
    let mut usernames = HashSet::new();

    for record in credentials {
        if !ids.insert(record.id()) {
            return Err(RegistryError::DuplicateId {
                id: record.id().to_owned(),
            });
        }
        if !record.is_active() {
            continue;
        }
        if !emails.insert(record.email()) {
            return Err(RegistryError::DuplicateActiveEmail {
                email: record.email().to_owned(),
            });
        }
        if !usernames.insert(record.username()) {
            return Err(RegistryError::DuplicateActiveUsername {
                username: record.username().to_owned(),
            });
        }
    }

    Ok(())
}

/// Raw JSON representation for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCredentialRegistry {
    version: u32,
    credentials: Vec<RawCredentialRecord>,
}

/// Raw JSON representation of a credential record.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCredentialRecord {
    id: String,
    name: String,
    username: String,
    email: String,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    password_hash: Option<String>,
    role: String,
    #[serde(default)]
    permissions: Vec<String>,
    #[serde(default)]
    territory: Option<String>,
    #[serde(default = "default_active")]
    active: bool,
    created: String,
    #[serde(default)]
    is_demo_user: bool,
}

impl std::fmt::Debug for RawCredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawCredentialRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

const fn default_active() -> bool {
    true
}
