//! Tests for domain error construction, trace capture and serialisation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("invalid credentials"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("missing permission"), ErrorCode::Forbidden)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::service_unavailable("later"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_blank_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
}

#[rstest]
fn try_with_trace_id_rejects_blank_values() {
    let result = Error::invalid_request("bad").try_with_trace_id("  ");
    assert_eq!(result, Err(ErrorValidationError::EmptyTraceId));
}

#[rstest]
fn with_trace_id_keeps_previous_value_on_blank(expected_trace_id: String) {
    let error = Error::invalid_request("bad")
        .with_trace_id(expected_trace_id.clone())
        .with_trace_id(" ");
    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn trace_id_is_absent_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::unauthorized("invalid credentials") })
        .await;
    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn serialises_camel_case_and_skips_empty_fields() {
    let value = serde_json::to_value(Error::unauthorized("invalid credentials")).expect("encode");
    assert_eq!(
        value,
        json!({"code": "unauthorized", "message": "invalid credentials"})
    );
}

#[rstest]
fn serialises_trace_and_details(expected_trace_id: String) {
    let error = Error::forbidden("missing permission")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"permission": "automations"}));
    let value = serde_json::to_value(error).expect("encode");
    assert_eq!(
        value,
        json!({
            "code": "forbidden",
            "message": "missing permission",
            "traceId": expected_trace_id,
            "details": {"permission": "automations"}
        })
    );
}

#[rstest]
#[case(json!({"code": "unauthorized", "message": ""}))]
#[case(json!({"code": "unauthorized", "message": "x", "traceId": " "}))]
#[case(json!({"code": "teapot", "message": "x"}))]
fn rejects_invalid_payloads(#[case] payload: serde_json::Value) {
    let result: Result<Error, _> = serde_json::from_value(payload);
    assert!(result.is_err());
}

#[rstest]
#[tokio::test]
async fn decoding_ignores_ambient_trace(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("valid UUID");
    let error = TraceId::scope(trace_id, async move {
        serde_json::from_value::<Error>(json!({"code": "not_found", "message": "missing"}))
            .expect("decode")
    })
    .await;
    assert!(error.trace_id().is_none());
}
