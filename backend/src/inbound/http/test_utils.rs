//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

use crate::domain::ports::FixtureWebhookDispatcher;
use crate::domain::{AutomationService, RetryPolicy};
use crate::test_support::demo_http_state;

use super::state::HttpState;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// HTTP state over the demo registry with an always-accepting dispatcher.
pub fn demo_state() -> HttpState {
    demo_state_with(AutomationService::new(
        Arc::new(FixtureWebhookDispatcher),
        RetryPolicy::default(),
    ))
}

/// HTTP state over the demo registry using `automations`.
pub fn demo_state_with(automations: AutomationService) -> HttpState {
    demo_http_state(automations)
}

/// Extract the `session` cookie set by a response.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
