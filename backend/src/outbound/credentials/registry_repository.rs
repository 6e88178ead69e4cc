//! Credential repository backed by the JSON credential registry.
//!
//! Records are converted to domain credentials once, at construction. Demo
//! records that ship a plaintext password are hashed here so the domain only
//! ever sees salted hashes.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use credential_registry::{CredentialRecord, CredentialRegistry, PasswordSecret};
use tracing::{debug, info};

use crate::domain::ports::{CredentialRepository, CredentialRepositoryError};
use crate::domain::{
    Credential, CredentialId, CredentialParts, CredentialValidationError, Email, PasswordHash,
    PasswordHasher, PermissionSet, Role, Username,
};

/// In-memory repository built from a [`CredentialRegistry`].
#[derive(Debug, Clone)]
pub struct RegistryCredentialRepository {
    credentials: Arc<[Credential]>,
}

impl RegistryCredentialRepository {
    /// Load and convert the registry file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialRepositoryError::Unavailable`] when the file cannot
    /// be read or fails registry validation, and
    /// [`CredentialRepositoryError::Corrupt`] when a record cannot be turned
    /// into a domain credential.
    pub fn load(path: &Path, hasher: &PasswordHasher) -> Result<Self, CredentialRepositoryError> {
        let registry = CredentialRegistry::from_file(path)
            .map_err(|error| CredentialRepositoryError::unavailable(error.to_string()))?;
        let repository = Self::from_registry(&registry, hasher)?;
        info!(
            path = %path.display(),
            credentials = repository.len(),
            "credential registry loaded"
        );
        Ok(repository)
    }

    /// Convert every record of an already-validated registry.
    pub fn from_registry(
        registry: &CredentialRegistry,
        hasher: &PasswordHasher,
    ) -> Result<Self, CredentialRepositoryError> {
        let credentials = registry
            .credentials()
            .iter()
            .map(|record| to_domain(record, hasher))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            credentials: credentials.into(),
        })
    }

    /// Number of records, active or not.
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Whether the registry held no records.
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

#[async_trait]
impl CredentialRepository for RegistryCredentialRepository {
    async fn list(&self) -> Result<Vec<Credential>, CredentialRepositoryError> {
        Ok(self.credentials.to_vec())
    }
}

fn to_domain(
    record: &CredentialRecord,
    hasher: &PasswordHasher,
) -> Result<Credential, CredentialRepositoryError> {
    let corrupt = |field: &str, message: String| {
        CredentialRepositoryError::corrupt(format!("record {}: {field}: {message}", record.id()))
    };
    let invalid = |error: &CredentialValidationError| corrupt(error.field(), error.to_string());
    let password_hash = match record.secret() {
        PasswordSecret::Hashed(phc) => {
            PasswordHash::new(phc.as_str()).map_err(|error| corrupt("passwordHash", error.to_string()))?
        }
        PasswordSecret::DemoPlaintext(plaintext) => {
            debug!(credential_id = record.id(), "hashing demo password");
            hasher
                .hash(plaintext.as_str())
                .map_err(|error| corrupt("password", error.to_string()))?
        }
    };
    let parts = CredentialParts {
        id: CredentialId::new(record.id()).map_err(|error| invalid(&error))?,
        name: record.name().to_owned(),
        username: Username::new(record.username()).map_err(|error| invalid(&error))?,
        email: Email::new(record.email()).map_err(|error| invalid(&error))?,
        password_hash,
        role: record
            .role()
            .parse::<Role>()
            .map_err(|error| corrupt("role", error.to_string()))?,
        permissions: PermissionSet::from_tokens(record.permissions().iter().cloned())
            .map_err(|error| corrupt("permissions", error.to_string()))?,
        territory: record.territory().map(str::to_owned),
        active: record.is_active(),
        created: record.created(),
        is_demo_user: record.is_demo_user(),
    };
    Credential::new(parts).map_err(|error| invalid(&error))
}
