//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::header::AUTHORIZATION;
use chrono::{TimeZone, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use mockable::MockClock;
use serde_json::json;

use crate::inbound::http::state::HttpState;
use crate::outbound::icons::InMemoryIconStore;
use crate::outbound::jwt::{JwtTokenVerifier, VerificationKey};
use crate::outbound::memory::InMemoryStore;

pub const TEST_SECRET: &[u8] = b"handler-test-secret";

/// In-memory adapters behind a fully wired [`HttpState`].
pub struct TestBackend {
    pub state: HttpState,
    pub store: InMemoryStore,
    pub icons: InMemoryIconStore,
}

/// Build state over fresh in-memory adapters with a fixed clock.
///
/// Tokens signed by [`id_token`] verify against the returned state.
pub fn test_backend() -> TestBackend {
    let store = InMemoryStore::new();
    let icons = InMemoryIconStore::new();
    let tokens = JwtTokenVerifier::new(VerificationKey::Secret(TEST_SECRET), None, None)
        .expect("test verifier");
    let mut clock = MockClock::new();
    clock
        .expect_utc()
        .returning(|| Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("instant"));
    let state = HttpState::from_adapters(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(icons.clone()),
        Arc::new(tokens),
        Arc::new(clock),
    );
    TestBackend {
        state,
        store,
        icons,
    }
}

/// Sign an id token for `username` with [`TEST_SECRET`].
pub fn id_token(username: &str) -> String {
    let claims = json!({
        "cognito:username": username,
        "token_use": "id",
        "exp": Utc::now().timestamp() + 3600,
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET),
    )
    .expect("sign token")
}

/// `Authorization` header pair authenticating as `username`.
pub fn auth_header(username: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {}", id_token(username)))
}
