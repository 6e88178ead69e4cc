//! Reqwest-backed N8N webhook adapter.
//!
//! One `dispatch` call is one HTTP POST with the client's timeout. Retry
//! policy lives in the domain; this adapter only classifies failures.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::WebhookEvent;
use crate::domain::ports::{WebhookDispatchError, WebhookDispatcher, WebhookResponse};

const WEBHOOK_PATH_SEGMENT: &str = "webhook";

/// Body posted to the workflow webhook.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookBody<'a> {
    workflow: &'a str,
    triggered_by: &'a str,
    payload: &'a Value,
}

/// Webhook dispatcher posting events to `{base_url}/webhook/{workflow}`.
#[derive(Debug, Clone)]
pub struct N8nWebhookClient {
    client: Client,
    base_url: Url,
}

impl N8nWebhookClient {
    /// Build a client whose every request is bounded by `attempt_timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, attempt_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(attempt_timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, workflow: &str) -> Result<Url, WebhookDispatchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                WebhookDispatchError::invalid_request(format!(
                    "base url {} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push(WEBHOOK_PATH_SEGMENT)
            .push(workflow);
        Ok(url)
    }
}

#[async_trait]
impl WebhookDispatcher for N8nWebhookClient {
    async fn dispatch(&self, event: &WebhookEvent) -> Result<WebhookResponse, WebhookDispatchError> {
        let url = self.endpoint(event.workflow.as_ref())?;
        let body = WebhookBody {
            workflow: event.workflow.as_ref(),
            triggered_by: event.triggered_by.as_ref(),
            payload: &event.payload,
        };
        debug!(%url, workflow = %event.workflow, "posting webhook");

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(WebhookResponse {
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }
}

fn map_transport_error(error: reqwest::Error) -> WebhookDispatchError {
    if error.is_timeout() {
        WebhookDispatchError::timeout(error.to_string())
    } else {
        WebhookDispatchError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> WebhookDispatchError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        preview
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => WebhookDispatchError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            WebhookDispatchError::timeout(message)
        }
        _ if status.is_client_error() => WebhookDispatchError::rejected(status.as_u16(), message),
        _ => WebhookDispatchError::upstream(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network webhook helpers.

    use super::*;
    use rstest::rstest;

    fn client(base: &str) -> N8nWebhookClient {
        N8nWebhookClient::new(
            Url::parse(base).expect("valid url"),
            Duration::from_secs(1),
        )
        .expect("client builds")
    }

    #[rstest]
    #[case::bare_host("http://n8n.local", "http://n8n.local/webhook/daily-report")]
    #[case::trailing_slash("http://n8n.local/", "http://n8n.local/webhook/daily-report")]
    #[case::prefixed("https://automations.example/n8n/", "https://automations.example/n8n/webhook/daily-report")]
    fn builds_webhook_endpoint(#[case] base: &str, #[case] expected: &str) {
        let url = client(base).endpoint("daily-report").expect("endpoint");
        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn rejects_base_urls_without_paths() {
        let error = client("mailto:ops@example.com")
            .endpoint("daily-report")
            .expect_err("cannot-be-a-base url");
        assert!(matches!(error, WebhookDispatchError::InvalidRequest { .. }));
    }

    #[rstest]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, true)]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, true)]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, true)]
    #[case::bad_gateway(StatusCode::BAD_GATEWAY, true)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, true)]
    #[case::not_found(StatusCode::NOT_FOUND, false)]
    #[case::bad_request(StatusCode::BAD_REQUEST, false)]
    fn classifies_statuses_for_retry(#[case] status: StatusCode, #[case] retryable: bool) {
        let error = map_status_error(status, b"{\"message\": \"workflow failed\"}");
        assert_eq!(error.is_retryable(), retryable);
    }

    #[test]
    fn rejection_keeps_upstream_status() {
        let error = map_status_error(StatusCode::NOT_FOUND, b"");
        assert_eq!(
            error,
            WebhookDispatchError::rejected(404_u16, "status 404")
        );
    }

    #[test]
    fn body_preview_compacts_and_truncates() {
        let long = format!("  a\n\tb {}", "x".repeat(200));
        let preview = body_preview(long.as_bytes());
        assert!(preview.starts_with("a b x"));
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }
}
