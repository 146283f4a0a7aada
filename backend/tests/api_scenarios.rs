//! End-to-end scenarios over the full application stack.
//!
//! The app is built exactly as the server builds it (middleware, error
//! handlers, routes) but over in-memory adapters, with identity tokens
//! signed by a shared test secret.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, ORIGIN};
use actix_web::{test, web};
use jsonwebtoken::{EncodingKey, Header, encode};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::{Value, json};

use sns_backend::inbound::http::health::HealthState;
use sns_backend::inbound::http::state::HttpState;
use sns_backend::middleware::trace::TRACE_ID_HEADER;
use sns_backend::outbound::icons::InMemoryIconStore;
use sns_backend::outbound::jwt::{JwtTokenVerifier, VerificationKey};
use sns_backend::outbound::memory::InMemoryStore;
use sns_backend::server::{AppDependencies, build_app};

const SECRET: &[u8] = b"scenario-secret";

fn token(username: &str) -> String {
    let claims = json!({
        "sub": format!("{username}-subject"),
        "cognito:username": username,
        "token_use": "id",
        "exp": chrono::Utc::now().timestamp() + 600,
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).expect("sign")
}

fn dependencies() -> AppDependencies {
    let store = InMemoryStore::new();
    let tokens =
        JwtTokenVerifier::new(VerificationKey::Secret(SECRET), None, None).expect("verifier");
    let state = HttpState::from_adapters(
        Arc::new(store.clone()),
        Arc::new(store),
        Arc::new(InMemoryIconStore::new()),
        Arc::new(tokens),
        Arc::new(DefaultClock),
    );
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    AppDependencies {
        health_state: health,
        http_state: web::Data::new(state),
        allowed_origin: Some("http://localhost:3000".to_owned()),
        json_limit: 1024 * 1024,
    }
}

struct Reply {
    status: StatusCode,
    trace_id: Option<String>,
    body: Value,
}

async fn send<S, B>(app: &S, user: &str, request: test::TestRequest) -> Reply
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: actix_web::body::MessageBody,
{
    let request = request
        .insert_header((AUTHORIZATION, format!("Bearer {}", token(user))))
        .to_request();
    let response = test::call_service(app, request).await;
    let status = response.status();
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    Reply {
        status,
        trace_id,
        body,
    }
}

async fn post_as<S, B>(app: &S, user: &str, content: &str) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: actix_web::body::MessageBody,
{
    let reply = send(
        app,
        user,
        test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "content": content })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    reply.body
}

#[actix_web::test]
async fn scenario_a_publishing_a_post() {
    let app = test::init_service(build_app(dependencies())).await;

    let reply = send(
        &app,
        "alice",
        test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "content": "hello" })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["content"], "hello");
    assert_eq!(reply.body["type"], "post");
    assert_eq!(reply.body["user"]["username"], "alice");
    assert_eq!(reply.body["user"]["iconImage"], "");
    assert_eq!(reply.body["likeCount"], 0);
    assert_eq!(reply.body["isLiked"], false);
    assert!(reply.body["postedAt"].is_string());
    assert!(reply.trace_id.is_some());
}

#[actix_web::test]
async fn scenario_b_liking_twice() {
    let app = test::init_service(build_app(dependencies())).await;
    for n in 1..=5 {
        post_as(&app, "alice", &format!("post {n}")).await;
    }

    let like = || {
        test::TestRequest::post()
            .uri("/api/likes")
            .set_json(json!({ "postid": 5 }))
    };
    let first = send(&app, "bob", like()).await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.body, json!({ "likeCount": 1, "isLiked": true }));

    let second = send(&app, "bob", like()).await;
    assert_eq!(second.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(second.body, json!({ "message": "Unprocessable Entity" }));

    let listing = send(&app, "bob", test::TestRequest::get().uri("/api/posts/alice")).await;
    let liked = listing.body["Items"]
        .as_array()
        .expect("items")
        .iter()
        .find(|item| item["id"] == 5)
        .expect("post 5 listed")
        .clone();
    assert_eq!(liked["likeCount"], 1);
    assert_eq!(liked["isLiked"], true);
}

#[actix_web::test]
async fn scenario_c_deleting_someone_elses_post() {
    let app = test::init_service(build_app(dependencies())).await;
    for n in 1..=7 {
        post_as(&app, "alice", &format!("post {n}")).await;
    }

    let intruder = send(&app, "mallory", test::TestRequest::delete().uri("/api/posts/7")).await;
    assert_eq!(intruder.status, StatusCode::FORBIDDEN);
    assert_eq!(intruder.body, json!({ "message": "Forbidden" }));

    let owner = send(&app, "alice", test::TestRequest::delete().uri("/api/posts/7")).await;
    assert_eq!(owner.status, StatusCode::NO_CONTENT);
    assert_eq!(owner.body, Value::Null);

    let listing = send(&app, "alice", test::TestRequest::get().uri("/api/posts")).await;
    let ids: Vec<i64> = listing.body["Items"]
        .as_array()
        .expect("items")
        .iter()
        .filter_map(|item| item["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![6, 5, 4, 3, 2, 1]);
}

#[actix_web::test]
async fn scenario_d_unknown_profile() {
    let app = test::init_service(build_app(dependencies())).await;

    let reply = send(
        &app,
        "alice",
        test::TestRequest::get().uri("/api/profiles/nonexistentuser"),
    )
    .await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body, json!({ "message": "Not Found" }));
}

#[rstest]
#[case::missing_header(None)]
#[case::forged_token(Some("Bearer eyJhbGciOiJIUzI1NiJ9.e30.c2lnbmF0dXJl"))]
#[actix_web::test]
async fn requests_without_a_valid_identity_are_rejected(#[case] header: Option<&str>) {
    let app = test::init_service(build_app(dependencies())).await;

    let mut request = test::TestRequest::get().uri("/api/posts");
    if let Some(value) = header {
        request = request.insert_header((AUTHORIZATION, value));
    }
    let response = test::call_service(&app, request.to_request()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body, json!({ "message": "Unauthorized" }));
}

#[actix_web::test]
async fn profile_and_icon_round_trip() {
    let app = test::init_service(build_app(dependencies())).await;

    let profile = send(
        &app,
        "alice",
        test::TestRequest::put()
            .uri("/api/profiles")
            .set_json(json!({ "profile": "I write Rust." })),
    )
    .await;
    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.body, json!({ "profile": "I write Rust." }));

    let icon = send(
        &app,
        "alice",
        test::TestRequest::put()
            .uri("/api/icons")
            .set_json(json!({ "iconImage": "data:image/png;base64,AAAA" })),
    )
    .await;
    assert_eq!(icon.status, StatusCode::OK);

    post_as(&app, "alice", "with avatar").await;
    let listing = send(&app, "bob", test::TestRequest::get().uri("/api/posts")).await;
    assert_eq!(
        listing.body["Items"][0]["user"]["iconImage"],
        "data:image/png;base64,AAAA"
    );

    let fetched = send(&app, "bob", test::TestRequest::get().uri("/api/profiles/alice")).await;
    assert_eq!(fetched.body, json!({ "profile": "I write Rust." }));
}

#[actix_web::test]
async fn unknown_routes_use_the_uniform_body() {
    let app = test::init_service(build_app(dependencies())).await;

    let reply = send(&app, "alice", test::TestRequest::get().uri("/api/follows")).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body, json!({ "message": "Not Found" }));
}

#[actix_web::test]
async fn foreign_origins_get_the_uniform_body() {
    let app = test::init_service(build_app(dependencies())).await;

    let reply = send(
        &app,
        "alice",
        test::TestRequest::get()
            .uri("/api/posts")
            .insert_header((ORIGIN, "http://evil.example")),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body, json!({ "message": "Bad Request" }));
    assert!(reply.trace_id.is_some());
}

#[actix_web::test]
async fn readiness_probe_is_served() {
    let app = test::init_service(build_app(dependencies())).await;

    let response =
        test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request()).await;

    assert_eq!(response.status(), StatusCode::OK);
}
