//! Request authentication for HTTP handlers.
//!
//! [`AuthenticatedUser`] resolves the `Authorization` header to a domain
//! [`User`] before a handler body runs: the identity token is verified, then
//! the user is provisioned on first sight. Handlers that take the extractor
//! never see an anonymous request.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use serde_json::{Map, Value};

use crate::domain::{Error, User};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{Field, FieldKind, Schema, validate};

const BEARER_PREFIX: &str = "Bearer ";

const IS_LOGGED_IN: Schema = Schema {
    name: "isLoggedIn",
    fields: &[Field::required(
        "authorization",
        FieldKind::String {
            min_len: 1,
            max_len: None,
        },
    )],
};

/// The caller, resolved from its identity token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    pub fn into_inner(self) -> User {
        self.0
    }
}

fn header_input(req: &HttpRequest) -> Value {
    let mut input = Map::new();
    if let Some(raw) = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    {
        input.insert("authorization".to_owned(), Value::String(raw.to_owned()));
    }
    Value::Object(input)
}

fn token_from(header: &str) -> &str {
    header.strip_prefix(BEARER_PREFIX).unwrap_or(header).trim()
}

async fn authenticate(state: Option<web::Data<HttpState>>, input: Value) -> Result<User, Error> {
    let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let values = validate(&IS_LOGGED_IN, &input)
        .map_err(|violations| Error::unauthorized(violations.message()))?;
    let header = values
        .get("authorization")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::unauthorized("authorization is required"))?;

    let identity = state
        .tokens
        .verify(token_from(header))
        .map_err(|err| Error::unauthorized(format!("identity token rejected: {err}")))?;

    state
        .users
        .get_or_save_user(&identity.username)
        .await
        .map_err(|err| {
            Error::internal(format!(
                "failed to provision user {}: {}",
                identity.username,
                err.message()
            ))
        })
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let input = header_input(req);
        Box::pin(async move {
            authenticate(state, input)
                .await
                .map(AuthenticatedUser)
                .map_err(actix_web::Error::from)
        })
    }
}
