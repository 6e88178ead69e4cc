//! Automation webhooks.
//!
//! Users holding the `automations` permission can trigger named workflows on
//! the automation server. Each trigger is delivered through a
//! [`WebhookDispatcher`]; transient failures are retried with linear backoff.

use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};
use utoipa::ToSchema;

use super::ports::{WebhookDispatchError, WebhookDispatcher};
use super::{CredentialId, Error, Permission, SessionUser};

/// Permission required to trigger automations.
pub const AUTOMATIONS_PERMISSION: &str = "automations";

/// Validation errors for [`WorkflowName`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("workflow name '{value}' must be 1-64 lowercase letters, digits, '-' or '_'")]
pub struct WorkflowNameError {
    /// Offending value.
    pub value: String,
}

/// Name of an automation workflow; used as the webhook path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkflowName(String);

static WORKFLOW_RE: OnceLock<Regex> = OnceLock::new();

fn workflow_regex() -> &'static Regex {
    WORKFLOW_RE.get_or_init(|| {
        Regex::new("^[a-z0-9][a-z0-9_-]{0,63}$")
            .unwrap_or_else(|error| panic!("workflow regex failed to compile: {error}"))
    })
}

impl WorkflowName {
    /// Validate a workflow name: lowercase ASCII, digits, `_` and `-`.
    pub fn new(value: impl Into<String>) -> Result<Self, WorkflowNameError> {
        Self::from_owned(value.into())
    }

    fn from_owned(value: String) -> Result<Self, WorkflowNameError> {
        if workflow_regex().is_match(&value) {
            Ok(Self(value))
        } else {
            Err(WorkflowNameError { value })
        }
    }
}

impl AsRef<str> for WorkflowName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for WorkflowName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<WorkflowName> for String {
    fn from(value: WorkflowName) -> Self {
        value.0
    }
}

impl TryFrom<String> for WorkflowName {
    type Error = WorkflowNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Event delivered to the automation server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    /// Target workflow.
    pub workflow: WorkflowName,
    /// Caller-supplied payload.
    pub payload: Value,
    /// Credential that triggered the event.
    pub triggered_by: CredentialId,
}

/// Attempt count, per-attempt timeout and linear backoff step.
///
/// The delay after failed attempt `n` is `backoff_step * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first; at least one.
    pub max_attempts: u32,
    /// Timeout applied to each attempt.
    pub attempt_timeout: Duration,
    /// Backoff unit.
    pub backoff_step: Duration,
}

impl RetryPolicy {
    /// Build a policy, clamping `max_attempts` to at least one.
    pub fn new(max_attempts: u32, attempt_timeout: Duration, backoff_step: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            attempt_timeout,
            backoff_step,
        }
    }

    /// Delay to wait after failed attempt `attempt` (1-based).
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    ///
    /// use campaign_auth::domain::RetryPolicy;
    ///
    /// let policy = RetryPolicy::new(3, Duration::from_secs(5), Duration::from_millis(500));
    /// assert_eq!(policy.backoff_after(1), Duration::from_millis(500));
    /// assert_eq!(policy.backoff_after(2), Duration::from_secs(1));
    /// ```
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        self.backoff_step.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(10), Duration::from_secs(1))
    }
}

/// Outcome of a delivered automation trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookReceipt {
    /// Workflow that accepted the event.
    #[schema(value_type = String, example = "sync-contacts")]
    pub workflow: WorkflowName,
    /// Attempts used, including the successful one.
    #[schema(example = 1)]
    pub attempts: u32,
    /// Upstream HTTP status.
    #[schema(example = 200)]
    pub status: u16,
}

/// Triggers automation workflows on behalf of authorised users.
#[derive(Clone)]
pub struct AutomationService {
    dispatcher: Arc<dyn WebhookDispatcher>,
    policy: RetryPolicy,
}

impl AutomationService {
    /// Service delivering through `dispatcher` under `policy`.
    pub fn new(dispatcher: Arc<dyn WebhookDispatcher>, policy: RetryPolicy) -> Self {
        Self { dispatcher, policy }
    }

    /// Retry policy applied to each trigger.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Deliver `payload` to `workflow` for `user`.
    ///
    /// Fails with `forbidden` unless the user holds `automations`. Retryable
    /// dispatch errors are retried up to the policy's attempt count.
    pub async fn trigger(
        &self,
        user: &SessionUser,
        workflow: WorkflowName,
        payload: Value,
    ) -> Result<WebhookReceipt, Error> {
        let required = Permission::new(AUTOMATIONS_PERMISSION)
            .map_err(|error| Error::internal(error.to_string()))?;
        if !user.has_permission(&required) {
            return Err(Error::forbidden("missing permission")
                .with_details(json!({ "permission": AUTOMATIONS_PERMISSION })));
        }

        let event = WebhookEvent {
            workflow,
            payload,
            triggered_by: user.id().clone(),
        };
        let mut attempt = 1;
        loop {
            match self.dispatcher.dispatch(&event).await {
                Ok(response) => {
                    info!(
                        workflow = %event.workflow,
                        attempts = attempt,
                        status = response.status,
                        "automation delivered"
                    );
                    return Ok(WebhookReceipt {
                        workflow: event.workflow,
                        attempts: attempt,
                        status: response.status,
                    });
                }
                Err(error) if error.is_retryable() && attempt < self.policy.max_attempts => {
                    let delay = self.policy.backoff_after(attempt);
                    warn!(
                        workflow = %event.workflow,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        %error,
                        "automation attempt failed; retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(map_dispatch_error(&event.workflow, attempt, &error)),
            }
        }
    }
}

fn map_dispatch_error(workflow: &WorkflowName, attempts: u32, error: &WebhookDispatchError) -> Error {
    warn!(%workflow, attempts, %error, "automation delivery failed");
    let details = json!({ "workflow": workflow.as_ref(), "attempts": attempts });
    if error.is_retryable() {
        return Error::service_unavailable("automation server unavailable").with_details(details);
    }
    match error {
        WebhookDispatchError::Rejected { status, .. } => {
            Error::invalid_request("automation rejected the request").with_details(json!({
                "workflow": workflow.as_ref(),
                "attempts": attempts,
                "status": status,
            }))
        }
        _ => Error::internal(error.to_string()),
    }
}

#[cfg(test)]
mod tests;
