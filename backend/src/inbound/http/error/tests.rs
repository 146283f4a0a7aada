//! Tests for HTTP error classification.

use super::*;
use actix_web::body::to_bytes;
use rstest::rstest;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[rstest]
#[case(Error::not_found("Post:7 does not exist."), StatusCode::NOT_FOUND, "Not Found")]
#[case(Error::forbidden("User:bob cannot delete Post:7."), StatusCode::FORBIDDEN, "Forbidden")]
#[case(
    Error::validation("User:bob has already liked Post:7."),
    StatusCode::UNPROCESSABLE_ENTITY,
    "Unprocessable Entity"
)]
#[case(Error::unauthorized("expired"), StatusCode::UNAUTHORIZED, "Unauthorized")]
#[case(
    Error::internal("connection refused"),
    StatusCode::INTERNAL_SERVER_ERROR,
    "Internal Server Error"
)]
#[actix_web::test]
async fn maps_code_to_status_and_fixed_phrase(
    #[case] error: Error,
    #[case] status: StatusCode,
    #[case] phrase: &str,
) {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), status);

    let bytes = to_bytes(response.into_body()).await.expect("read body");
    let body: ErrorBody = serde_json::from_slice(&bytes).expect("error body");
    assert_eq!(body.message, phrase);
}

#[rstest]
#[actix_web::test]
async fn detail_never_reaches_the_body() {
    let response = ResponseError::error_response(&Error::internal("password=hunter2"));
    let bytes = to_bytes(response.into_body()).await.expect("read body");
    let text = std::str::from_utf8(&bytes).expect("utf8 body");
    assert!(!text.contains("hunter2"));
}

#[rstest]
fn trace_id_is_echoed_as_header() {
    let response = ResponseError::error_response(&Error::not_found("x").with_trace_id(TRACE_ID));
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .expect("trace id header")
        .to_str()
        .expect("ascii header");
    assert_eq!(header, TRACE_ID);
}

#[actix_web::test]
async fn unmatched_routes_are_not_found() {
    use actix_web::{App, test, web};

    let app = test::init_service(App::new().default_service(web::to(unmatched_route))).await;
    let response =
        test::call_service(&app, test::TestRequest::get().uri("/nowhere").to_request()).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = test::read_body_json(response).await;
    assert_eq!(body.message, "Not Found");
}

#[rstest]
fn rejected_json_becomes_a_validation_error() {
    let req = actix_web::test::TestRequest::default().to_http_request();
    let err = json_error_handler(JsonPayloadError::ContentType, &req);

    assert_eq!(err.as_response_error().status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let domain = err.as_error::<Error>().expect("domain error");
    assert_eq!(domain.code(), ErrorCode::UnprocessableEntity);
}
