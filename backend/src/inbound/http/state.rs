//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and services and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::CredentialRepository;
use crate::domain::{AutomationService, PasswordHasher, SessionManager};

use super::session::SessionContext;

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use campaign_auth::domain::ports::{FixtureCredentialRepository, FixtureWebhookDispatcher};
/// use campaign_auth::domain::{AutomationService, PasswordHasher, RetryPolicy};
/// use campaign_auth::inbound::http::state::HttpState;
///
/// let state = HttpState::new(
///     Arc::new(FixtureCredentialRepository),
///     PasswordHasher::default(),
///     AutomationService::new(Arc::new(FixtureWebhookDispatcher), RetryPolicy::default()),
/// );
/// let _credentials = state.credentials.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub credentials: Arc<dyn CredentialRepository>,
    pub hasher: PasswordHasher,
    pub automations: AutomationService,
}

impl HttpState {
    /// Bundle the adapters shared by every handler.
    pub fn new(
        credentials: Arc<dyn CredentialRepository>,
        hasher: PasswordHasher,
        automations: AutomationService,
    ) -> Self {
        Self {
            credentials,
            hasher,
            automations,
        }
    }

    /// Session manager reading and writing the request's cookie session.
    pub fn session_manager<'s>(
        &self,
        session: &'s SessionContext,
    ) -> SessionManager<&'s SessionContext> {
        SessionManager::new(Arc::clone(&self.credentials), self.hasher.clone(), session)
    }
}
