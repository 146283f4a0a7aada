//! Profile HTTP handlers.
//!
//! ```text
//! GET /api/profiles/{owner}
//! PUT /api/profiles {"profile":"Hello there"}
//! ```

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::domain::{Error, PROFILE_MAX, Profile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::posts::{OWNER, username_from};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{Field, FieldKind, Schema, parse};

const GET_PROFILE: Schema = Schema {
    name: "getProfile",
    fields: &[OWNER],
};
const UPDATE_PROFILE: Schema = Schema {
    name: "updateProfile",
    fields: &[Field::required(
        "profile",
        FieldKind::String {
            min_len: 0,
            max_len: Some(PROFILE_MAX),
        },
    )],
};

#[derive(Debug, Deserialize)]
struct OwnerParams {
    owner: String,
}

/// Profile text of one user.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, ToSchema)]
pub struct ProfileBody {
    #[schema(example = "Hello there")]
    pub profile: String,
}

/// Fetch a user's profile text (empty when never set).
#[utoipa::path(
    get,
    path = "/api/profiles/{owner}",
    params(("owner" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Profile", body = ProfileBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody),
        (status = 422, description = "Unprocessable Entity", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody)
    ),
    tags = ["profiles"],
    operation_id = "getProfile"
)]
#[get("/profiles/{owner}")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProfileBody>> {
    let params: OwnerParams = parse(&GET_PROFILE, &json!({ "owner": path.into_inner() }))?;
    let profile = state
        .profiles
        .get_profile(&username_from(params.owner)?)
        .await?;
    Ok(web::Json(ProfileBody {
        profile: profile.into(),
    }))
}

/// Replace the caller's profile text.
#[utoipa::path(
    put,
    path = "/api/profiles",
    request_body = ProfileBody,
    responses(
        (status = 200, description = "Stored profile", body = ProfileBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 422, description = "Unprocessable Entity", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody)
    ),
    tags = ["profiles"],
    operation_id = "updateProfile"
)]
#[put("/profiles")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    body: web::Json<Value>,
) -> ApiResult<web::Json<ProfileBody>> {
    let request: ProfileBody = parse(&UPDATE_PROFILE, &body)?;
    let profile =
        Profile::new(request.profile).map_err(|err| Error::validation(err.to_string()))?;
    let stored = state
        .profile_commands
        .update_profile(&user.0.username, profile)
        .await?;
    Ok(web::Json(ProfileBody {
        profile: stored.into(),
    }))
}
