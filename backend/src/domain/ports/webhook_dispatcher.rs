//! Driven port for delivering automation webhooks.
//!
//! One call is one delivery attempt; retries and backoff belong to
//! [`crate::domain::AutomationService`].

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::WebhookEvent;

/// Upstream answer to a successful delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebhookResponse {
    /// HTTP status returned by the automation endpoint.
    pub status: u16,
}

define_port_error! {
    /// Errors surfaced by one webhook delivery attempt.
    pub enum WebhookDispatchError {
        /// The attempt exceeded its timeout.
        Timeout { message: String } => "webhook timed out: {message}",
        /// Connection or transport failure before a response arrived.
        Transport { message: String } => "webhook transport failed: {message}",
        /// Upstream asked us to slow down.
        RateLimited { message: String } => "webhook rate limited: {message}",
        /// Upstream failed with a server error.
        Upstream { status: u16, message: String } => "webhook upstream error {status}: {message}",
        /// Upstream rejected the request.
        Rejected { status: u16, message: String } => "webhook rejected with {status}: {message}",
        /// The request could not be built.
        InvalidRequest { message: String } => "webhook request invalid: {message}",
    }
}

impl WebhookDispatchError {
    /// Return whether retrying this error is expected to help.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Transport { .. } | Self::RateLimited { .. } | Self::Upstream { .. }
        )
    }
}

/// Port delivering one webhook event.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebhookDispatcher: Send + Sync {
    /// Attempt a single delivery of `event`.
    async fn dispatch(&self, event: &WebhookEvent) -> Result<WebhookResponse, WebhookDispatchError>;
}

/// Fixture dispatcher that accepts every event with `200 OK`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureWebhookDispatcher;

#[async_trait]
impl WebhookDispatcher for FixtureWebhookDispatcher {
    async fn dispatch(&self, _event: &WebhookEvent) -> Result<WebhookResponse, WebhookDispatchError> {
        Ok(WebhookResponse { status: 200 })
    }
}
