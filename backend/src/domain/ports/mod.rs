//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod credential_repository;
mod session_store;
mod webhook_dispatcher;

#[cfg(test)]
pub use credential_repository::MockCredentialRepository;
pub use credential_repository::{
    CredentialRepository, CredentialRepositoryError, FixtureCredentialRepository,
};
#[cfg(test)]
pub use session_store::MockSessionStore;
pub use session_store::{SessionStore, SessionStoreError};
#[cfg(test)]
pub use webhook_dispatcher::MockWebhookDispatcher;
pub use webhook_dispatcher::{
    FixtureWebhookDispatcher, WebhookDispatchError, WebhookDispatcher, WebhookResponse,
};
