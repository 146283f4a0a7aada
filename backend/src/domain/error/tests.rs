//! Tests for the domain error type.

use super::*;
use rstest::rstest;
use serde_json::json;
use uuid::Uuid;

#[rstest]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::forbidden("nope"), ErrorCode::Forbidden)]
#[case(Error::validation("bad"), ErrorCode::UnprocessableEntity)]
#[case(Error::unauthorized("who"), ErrorCode::Unauthorized)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn display_includes_category_and_message() {
    let error = Error::forbidden("User:alice cannot delete Post:7.");
    assert_eq!(
        error.to_string(),
        "forbidden: User:alice cannot delete Post:7."
    );
}

#[rstest]
fn trace_id_is_absent_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[tokio::test]
async fn trace_id_is_captured_in_scope() {
    let trace_id = TraceId::from_uuid(Uuid::nil());
    let error = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
    assert_eq!(error.trace_id(), Some(trace_id.to_string().as_str()));
}

#[rstest]
fn details_are_attached() {
    let error = Error::validation("bad").with_details(json!({ "field": "content" }));
    assert_eq!(
        error
            .details()
            .and_then(|value| value.get("field"))
            .and_then(|value| value.as_str()),
        Some("content")
    );
}
