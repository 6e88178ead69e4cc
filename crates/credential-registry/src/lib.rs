//! Versioned JSON credential registry parsing and validation.
//!
//! The registry is the static list of accounts a campaign deployment can log
//! in with. This crate only parses and validates it; hashing plaintext demo
//! passwords and verifying logins are the backend's job. It is independent of
//! backend domain types so both the service and its tooling can depend on it.
//!
//! # Example
//!
//! ```
//! use credential_registry::{CredentialRegistry, PasswordSecret};
//!
//! let json = r#"{
//!     "version": 1,
//!     "credentials": [{
//!         "id": "dev-1",
//!         "name": "Equipo Técnico",
//!         "username": "dev",
//!         "email": "dev@campana.com",
//!         "passwordHash": "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA",
//!         "role": "desarrollador",
//!         "permissions": ["all"],
//!         "created": "2024-01-01"
//!     }]
//! }"#;
//!
//! let registry = CredentialRegistry::from_json(json).expect("valid registry");
//! let record = registry.find_by_id("dev-1").expect("record exists");
//!
//! assert_eq!(record.role(), "desarrollador");
//! assert!(matches!(record.secret(), PasswordSecret::Hashed(_)));
//! ```

mod error;
mod record;
mod registry;
mod validation;

pub use error::RegistryError;
pub use record::{CredentialRecord, PasswordSecret};
pub use registry::CredentialRegistry;
pub use validation::{
    KNOWN_ROLES, is_known_role, is_valid_email, is_valid_permission, is_valid_username,
};
