//! Test utilities for the campaign-auth crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use credential_registry::CredentialRegistry;

use crate::domain::ports::{WebhookDispatchError, WebhookDispatcher, WebhookResponse};
use crate::domain::{AutomationService, HashCost, PasswordHasher, RetryPolicy, WebhookEvent};
use crate::inbound::http::state::HttpState;
use crate::outbound::credentials::RegistryCredentialRepository;
use crate::settings::default_registry_path;

/// The bundled demo registry.
pub const DEMO_REGISTRY_JSON: &str =
    include_str!("../../crates/credential-registry/fixtures/demo-credentials.json");

/// Path of the bundled demo registry on disk.
pub fn demo_registry_path() -> PathBuf {
    default_registry_path()
}

/// Password hasher with the cheapest Argon2 parameters.
///
/// # Panics
///
/// Panics if the minimal parameters are rejected, which indicates a broken
/// build.
pub fn fast_hasher() -> PasswordHasher {
    PasswordHasher::new(HashCost::MINIMAL).expect("minimal hash cost is valid")
}

/// Repository over the demo registry, hashed with `hasher`.
///
/// # Panics
///
/// Panics if the bundled registry fails to load.
pub fn demo_repository(hasher: &PasswordHasher) -> RegistryCredentialRepository {
    repository_from_json(DEMO_REGISTRY_JSON, hasher)
}

/// Repository over an inline registry document, hashed with `hasher`.
///
/// # Panics
///
/// Panics if `json` is not a valid registry.
pub fn repository_from_json(json: &str, hasher: &PasswordHasher) -> RegistryCredentialRepository {
    let registry = CredentialRegistry::from_json(json).expect("registry parses");
    RegistryCredentialRepository::from_registry(&registry, hasher).expect("registry converts")
}

/// HTTP state over the demo registry using the given automation service.
pub fn demo_http_state(automations: AutomationService) -> HttpState {
    let hasher = fast_hasher();
    let repository = demo_repository(&hasher);
    HttpState::new(Arc::new(repository), hasher, automations)
}

/// Dispatcher replaying a script of outcomes and recording every event.
///
/// Once the script is exhausted every attempt succeeds with `200`.
///
/// # Examples
/// ```
/// use campaign_auth::domain::ports::WebhookDispatchError;
/// use campaign_auth::test_support::ScriptedDispatcher;
///
/// let dispatcher = ScriptedDispatcher::new([Err(WebhookDispatchError::timeout("slow"))]);
/// assert!(dispatcher.events().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct ScriptedDispatcher {
    script: Mutex<VecDeque<Result<WebhookResponse, WebhookDispatchError>>>,
    events: Mutex<Vec<WebhookEvent>>,
}

impl ScriptedDispatcher {
    /// Dispatcher replaying `script` in order.
    pub fn new(
        script: impl IntoIterator<Item = Result<WebhookResponse, WebhookDispatchError>>,
    ) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Events received so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if a previous dispatch panicked while holding the lock.
    pub fn events(&self) -> Vec<WebhookEvent> {
        self.events.lock().expect("events lock").clone()
    }

    /// Wrap `self` in an automation service that never sleeps between attempts.
    pub fn into_service(self: Arc<Self>, max_attempts: u32) -> AutomationService {
        AutomationService::new(
            self,
            RetryPolicy::new(
                max_attempts,
                std::time::Duration::from_secs(1),
                std::time::Duration::ZERO,
            ),
        )
    }
}

#[async_trait]
impl WebhookDispatcher for ScriptedDispatcher {
    async fn dispatch(&self, event: &WebhookEvent) -> Result<WebhookResponse, WebhookDispatchError> {
        self.events.lock().expect("events lock").push(event.clone());
        self.script
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or(Ok(WebhookResponse { status: 200 }))
    }
}
