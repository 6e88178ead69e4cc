//! Error types for the credential-registry crate.
//!
//! Every validation failure names the offending record by its position in the
//! `credentials` array so operators can fix the file without guessing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading or querying a credential registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registry file could not be read.
    #[error("failed to read registry file at '{path}': {message}")]
    IoError {
        /// Path to the registry file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The registry JSON is malformed or missing required fields.
    #[error("invalid registry JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The registry version is not supported.
    #[error("unsupported registry version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Actual version found in the registry.
        actual: u32,
    },

    /// The registry contains no credential records.
    #[error("registry contains no credentials")]
    EmptyCredentials,

    /// A record field failed validation.
    #[error("credential at index {index} has an invalid {field}: {message}")]
    InvalidField {
        /// Index of the record in the `credentials` array.
        index: usize,
        /// Name of the offending field.
        field: &'static str,
        /// Description of the problem.
        message: String,
    },

    /// A record names a role outside the closed role set.
    #[error("credential at index {index} has unknown role '{value}'")]
    UnknownRole {
        /// Index of the record in the `credentials` array.
        index: usize,
        /// The unrecognised role string.
        value: String,
    },

    /// A record carries neither `password` nor `passwordHash`.
    #[error("credential at index {index} has no password or passwordHash")]
    MissingSecret {
        /// Index of the record in the `credentials` array.
        index: usize,
    },

    /// A record carries both `password` and `passwordHash`.
    #[error("credential at index {index} sets both password and passwordHash")]
    AmbiguousSecret {
        /// Index of the record in the `credentials` array.
        index: usize,
    },

    /// A non-demo record stores a plaintext password.
    #[error("credential at index {index} stores a plaintext password but is not a demo user")]
    PlaintextPassword {
        /// Index of the record in the `credentials` array.
        index: usize,
    },

    /// Two records share the same identifier.
    #[error("duplicate credential id '{id}'")]
    DuplicateId {
        /// The repeated identifier.
        id: String,
    },

    /// Two active records share the same email address.
    #[error("email '{email}' is used by more than one active credential")]
    DuplicateActiveEmail {
        /// The repeated email.
        email: String,
    },

    /// Two active records share the same username.
    #[error("username '{username}' is used by more than one active credential")]
    DuplicateActiveUsername {
        /// The repeated username.
        username: String,
    },

    /// The requested credential id was not found in the registry.
    #[error("credential '{id}' not found in registry")]
    CredentialNotFound {
        /// The id that was not found.
        id: String,
    },
}

impl RegistryError {
    pub(crate) fn invalid_field(index: usize, field: &'static str, message: &str) -> Self {
        Self::InvalidField {
            index,
            field,
            message: message.to_owned(),
        }
    }
}
