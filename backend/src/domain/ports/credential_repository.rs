//! Driven port for reading authenticatable credentials.
//!
//! The lookup itself is a domain function over the returned records; adapters
//! only decide where the records come from.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::Credential;

define_port_error! {
    /// Errors raised while loading credentials.
    pub enum CredentialRepositoryError {
        /// Backing source could not be read.
        Unavailable { message: String } => "credential source unavailable: {message}",
        /// A stored record could not be converted into a domain credential.
        Corrupt { message: String } => "credential source corrupt: {message}",
    }
}

/// Port exposing the credential records used for login.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Every credential record, active or not, in registry order.
    async fn list(&self) -> Result<Vec<Credential>, CredentialRepositoryError>;
}

/// Fixture repository with no credentials; every login fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureCredentialRepository;

#[async_trait]
impl CredentialRepository for FixtureCredentialRepository {
    async fn list(&self) -> Result<Vec<Credential>, CredentialRepositoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_is_empty() {
        let records = FixtureCredentialRepository.list().await.expect("fixture list");
        assert!(records.is_empty());
    }

    #[test]
    fn errors_render_context() {
        let err = CredentialRepositoryError::unavailable("registry missing");
        assert_eq!(
            err.to_string(),
            "credential source unavailable: registry missing"
        );
    }
}
