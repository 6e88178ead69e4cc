//! Automation trigger handler.
//!
//! ```text
//! POST /api/v1/automations/sync-contacts {"territory":"Norte"}
//! ```

use actix_web::{post, web};
use serde_json::{Value, json};

use crate::domain::{Error, WebhookReceipt, WorkflowName};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Trigger an automation workflow with the request body as payload.
///
/// Requires the `automations` permission. Transient upstream failures are
/// retried before the request fails with `503`.
#[utoipa::path(
    post,
    path = "/api/v1/automations/{workflow}",
    params(("workflow" = String, Path, description = "Workflow name")),
    request_body(content = serde_json::Value, description = "Payload forwarded to the workflow"),
    responses(
        (status = 200, description = "Workflow accepted the event", body = WebhookReceipt),
        (status = 400, description = "Invalid workflow or rejected by the workflow", body = Error),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Missing automations permission", body = Error),
        (status = 503, description = "Automation server unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["automations"],
    operation_id = "triggerAutomation"
)]
#[post("/automations/{workflow}")]
pub async fn trigger_automation(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<WebhookReceipt>> {
    let user = session.require_user(&state)?;
    let workflow = WorkflowName::new(path.into_inner()).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "workflow", "code": "invalid_workflow" }))
    })?;
    state
        .automations
        .trigger(&user, workflow, payload.into_inner())
        .await
        .map(web::Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::domain::ports::{WebhookDispatchError, WebhookDispatcher, WebhookResponse};
    use crate::domain::{AutomationService, ErrorCode, RetryPolicy, WebhookEvent};
    use crate::inbound::http::auth::login;
    use crate::inbound::http::test_utils::{
        demo_state_with, session_cookie, test_session_middleware,
    };
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingDispatcher {
        events: Mutex<Vec<WebhookEvent>>,
        fail_with: Option<WebhookDispatchError>,
    }

    #[async_trait]
    impl WebhookDispatcher for RecordingDispatcher {
        async fn dispatch(
            &self,
            event: &WebhookEvent,
        ) -> Result<WebhookResponse, WebhookDispatchError> {
            self.events.lock().expect("events lock").push(event.clone());
            match &self.fail_with {
                Some(error) => Err(error.clone()),
                None => Ok(WebhookResponse { status: 202 }),
            }
        }
    }

    fn service(dispatcher: Arc<RecordingDispatcher>) -> AutomationService {
        AutomationService::new(
            dispatcher,
            RetryPolicy::new(2, Duration::from_secs(1), Duration::ZERO),
        )
    }

    async fn trigger_as(
        dispatcher: Arc<RecordingDispatcher>,
        identifier: &str,
        password: &str,
        workflow: &str,
    ) -> actix_web::dev::ServiceResponse {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(demo_state_with(service(dispatcher))))
                .wrap(test_session_middleware())
                .service(
                    web::scope("/api/v1")
                        .service(login)
                        .service(trigger_automation),
                ),
        )
        .await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(json!({ "identifier": identifier, "password": password }))
                .to_request(),
        )
        .await;
        let cookie: Cookie<'static> = session_cookie(&res);

        test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/v1/automations/{workflow}"))
                .cookie(cookie)
                .set_json(json!({ "territory": "Norte" }))
                .to_request(),
        )
        .await
    }

    #[actix_web::test]
    async fn delivers_for_permitted_users() {
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let res = trigger_as(Arc::clone(&dispatcher), "master", "master123", "sync-contacts").await;
        assert_eq!(res.status(), StatusCode::OK);
        let receipt: Value = test::read_body_json(res).await;
        assert_eq!(
            receipt,
            json!({ "workflow": "sync-contacts", "attempts": 1, "status": 202 })
        );

        let events = dispatcher.events.lock().expect("events lock");
        let event = events.first().expect("one event");
        assert_eq!(event.triggered_by.as_ref(), "demo-master");
        assert_eq!(event.payload, json!({ "territory": "Norte" }));
    }

    #[actix_web::test]
    async fn forbids_users_without_permission() {
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let res = trigger_as(Arc::clone(&dispatcher), "lider", "12345678", "sync-contacts").await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert!(dispatcher.events.lock().expect("events lock").is_empty());
    }

    #[actix_web::test]
    async fn rejects_malformed_workflow_names() {
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let res = trigger_as(dispatcher, "master", "master123", "Sync_Contacts").await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn exhausted_retries_are_service_unavailable() {
        let dispatcher = Arc::new(RecordingDispatcher {
            fail_with: Some(WebhookDispatchError::upstream(502_u16, "bad gateway")),
            ..RecordingDispatcher::default()
        });
        let res = trigger_as(Arc::clone(&dispatcher), "master", "master123", "sync-contacts").await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        let error: Error = test::read_body_json(res).await;
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
        assert_eq!(dispatcher.events.lock().expect("events lock").len(), 2);
    }
}
