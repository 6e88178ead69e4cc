//! Tests for automation triggering and the retry policy.

use std::sync::Mutex;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockWebhookDispatcher, WebhookResponse};
use rstest::{fixture, rstest};

fn user_with(permissions: &[&str]) -> SessionUser {
    serde_json::from_value(json!({
        "id": "demo-master",
        "name": "Master",
        "username": "master",
        "email": "master@campana.com",
        "role": "master",
        "permissions": permissions,
        "isDemoUser": true
    }))
    .expect("session user")
}

#[fixture]
fn operator() -> SessionUser {
    user_with(&["dashboard", "automations"])
}

fn workflow() -> WorkflowName {
    WorkflowName::new("sync-contacts").expect("workflow")
}

fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(max_attempts, Duration::from_secs(1), Duration::ZERO)
}

fn scripted(
    outcomes: Vec<Result<WebhookResponse, WebhookDispatchError>>,
) -> (Arc<MockWebhookDispatcher>, usize) {
    let expected_calls = outcomes.len();
    let queue = Mutex::new(outcomes.into_iter());
    let mut dispatcher = MockWebhookDispatcher::new();
    dispatcher
        .expect_dispatch()
        .times(expected_calls)
        .returning(move |_| {
            queue
                .lock()
                .expect("queue lock")
                .next()
                .expect("scripted outcome")
        });
    (Arc::new(dispatcher), expected_calls)
}

#[rstest]
#[case("sync-contacts", true)]
#[case("daily_report2", true)]
#[case("", false)]
#[case("Sync", false)]
#[case("-leading", false)]
#[case("../escape", false)]
fn workflow_name_validation(#[case] value: &str, #[case] valid: bool) {
    assert_eq!(WorkflowName::new(value).is_ok(), valid);
}

#[rstest]
#[case(1, 100)]
#[case(2, 200)]
#[case(5, 500)]
fn backoff_is_linear(#[case] attempt: u32, #[case] expected_ms: u64) {
    let policy = RetryPolicy::new(5, Duration::from_secs(1), Duration::from_millis(100));
    assert_eq!(policy.backoff_after(attempt), Duration::from_millis(expected_ms));
}

#[test]
fn attempts_are_clamped_to_one() {
    assert_eq!(fast_policy(0).max_attempts, 1);
}

#[rstest]
#[tokio::test]
async fn delivers_on_first_attempt(operator: SessionUser) {
    let (dispatcher, _) = scripted(vec![Ok(WebhookResponse { status: 200 })]);
    let service = AutomationService::new(dispatcher, fast_policy(3));

    let receipt = service
        .trigger(&operator, workflow(), json!({"segment": "norte"}))
        .await
        .expect("delivered");

    assert_eq!(
        receipt,
        WebhookReceipt {
            workflow: workflow(),
            attempts: 1,
            status: 200
        }
    );
}

#[rstest]
#[tokio::test]
async fn retries_transient_failures(operator: SessionUser) {
    let (dispatcher, _) = scripted(vec![
        Err(WebhookDispatchError::timeout("slow")),
        Err(WebhookDispatchError::upstream(503_u16, "busy")),
        Ok(WebhookResponse { status: 202 }),
    ]);
    let service = AutomationService::new(dispatcher, fast_policy(3));

    let receipt = service
        .trigger(&operator, workflow(), Value::Null)
        .await
        .expect("delivered after retries");

    assert_eq!(receipt.attempts, 3);
    assert_eq!(receipt.status, 202);
}

#[rstest]
#[tokio::test]
async fn gives_up_after_max_attempts(operator: SessionUser) {
    let (dispatcher, calls) = scripted(vec![
        Err(WebhookDispatchError::rate_limited("429")),
        Err(WebhookDispatchError::transport("refused")),
    ]);
    let service = AutomationService::new(dispatcher, fast_policy(2));

    let err = service
        .trigger(&operator, workflow(), Value::Null)
        .await
        .expect_err("exhausted");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    assert_eq!(
        err.details().and_then(|details| details.get("attempts")),
        Some(&json!(calls))
    );
}

#[rstest]
#[tokio::test]
async fn does_not_retry_rejections(operator: SessionUser) {
    let (dispatcher, _) = scripted(vec![Err(WebhookDispatchError::rejected(
        404_u16,
        "unknown workflow",
    ))]);
    let service = AutomationService::new(dispatcher, fast_policy(5));

    let err = service
        .trigger(&operator, workflow(), Value::Null)
        .await
        .expect_err("rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details().and_then(|details| details.get("status")),
        Some(&json!(404))
    );
}

#[rstest]
#[case(&["dashboard", "messaging"])]
#[case(&[])]
#[tokio::test]
async fn requires_automations_permission(#[case] permissions: &[&str]) {
    let mut dispatcher = MockWebhookDispatcher::new();
    dispatcher.expect_dispatch().never();
    let service = AutomationService::new(Arc::new(dispatcher), fast_policy(3));

    let err = service
        .trigger(&user_with(permissions), workflow(), Value::Null)
        .await
        .expect_err("forbidden");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn wildcard_user_may_trigger() {
    let (dispatcher, _) = scripted(vec![Ok(WebhookResponse { status: 200 })]);
    let service = AutomationService::new(dispatcher, fast_policy(1));

    let receipt = service
        .trigger(&user_with(&["all"]), workflow(), Value::Null)
        .await
        .expect("delivered");

    assert_eq!(receipt.attempts, 1);
}

#[rstest]
#[tokio::test]
async fn event_names_the_triggering_user(operator: SessionUser) {
    let mut dispatcher = MockWebhookDispatcher::new();
    dispatcher
        .expect_dispatch()
        .withf(|event| {
            event.triggered_by.as_ref() == "demo-master"
                && event.workflow.as_ref() == "sync-contacts"
                && event.payload == json!({"n": 1})
        })
        .times(1)
        .returning(|_| Ok(WebhookResponse { status: 200 }));
    let service = AutomationService::new(Arc::new(dispatcher), fast_policy(1));

    service
        .trigger(&operator, workflow(), json!({"n": 1}))
        .await
        .expect("delivered");
}
