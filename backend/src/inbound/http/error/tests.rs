//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("invalid credentials"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("missing permission"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::service_unavailable("later"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] expected: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), expected);
}

async fn decode(response: HttpResponse) -> Error {
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error payload decodes")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("failed to read session key electoral_user: disk on fire")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"path": "/var/lib/state"}));

    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    assert_eq!(header.as_deref(), Some(expected_trace_id.as_str()));

    let payload = decode(response).await;
    assert_eq!(payload.message(), INTERNAL_ERROR_MESSAGE);
    assert_eq!(payload.trace_id(), Some(expected_trace_id.as_str()));
    assert!(payload.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details() {
    let error = Error::forbidden("missing permission")
        .with_details(json!({"permission": "automations"}));

    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.headers().get(TRACE_ID_HEADER).is_none());
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
        Some(&b"no-store"[..])
    );

    let payload = decode(response).await;
    assert_eq!(payload.code(), ErrorCode::Forbidden);
    assert_eq!(payload.message(), "missing permission");
    assert_eq!(payload.details(), Some(&json!({"permission": "automations"})));
}

#[rstest]
fn actix_errors_become_internal() {
    let actix = actix_web::error::ErrorBadGateway("upstream detail");
    let error = Error::from(actix);
    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(error.message(), INTERNAL_ERROR_MESSAGE);
}
