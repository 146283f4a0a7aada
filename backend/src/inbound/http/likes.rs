//! Like HTTP handlers.
//!
//! ```text
//! POST   /api/likes            {"postid":5}
//! DELETE /api/likes/{postid}
//! ```

use actix_web::{HttpResponse, delete, post, web};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::domain::PostId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::posts::{POST_ID, with_path_id};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{Schema, coerce_integer_field, parse};

const LIKE_POST: Schema = Schema {
    name: "likePost",
    fields: &[POST_ID],
};
const UNLIKE_POST: Schema = Schema {
    name: "unlikePost",
    fields: &[POST_ID],
};

/// Body for liking a post.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LikeRequest {
    #[schema(example = 5)]
    pub postid: i32,
}

/// Like state of a post after a like or unlike.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub like_count: usize,
    pub is_liked: bool,
}

/// Body ids may arrive as numeric strings; coerce before validating.
fn like_input(body: Value) -> Value {
    let mut input = match body {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    coerce_integer_field(&mut input, "postid");
    Value::Object(input)
}

/// Like a post as the caller.
#[utoipa::path(
    post,
    path = "/api/likes",
    request_body = LikeRequest,
    responses(
        (status = 201, description = "Liked", body = LikeResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody),
        (status = 422, description = "Invalid input or already liked", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody)
    ),
    tags = ["likes"],
    operation_id = "likePost"
)]
#[post("/likes")]
pub async fn like_post(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let request: LikeRequest = parse(&LIKE_POST, &like_input(body.into_inner()))?;
    let like_count = state
        .likes
        .like_post(PostId::new(request.postid), &user.0)
        .await?;
    Ok(HttpResponse::Created().json(LikeResponse {
        like_count,
        is_liked: true,
    }))
}

/// Withdraw the caller's like.
#[utoipa::path(
    delete,
    path = "/api/likes/{postid}",
    params(("postid" = i32, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Unliked", body = LikeResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody),
        (status = 422, description = "Invalid input or not liked", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody)
    ),
    tags = ["likes"],
    operation_id = "unlikePost"
)]
#[delete("/likes/{postid}")]
pub async fn unlike_post(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<LikeResponse>> {
    let request: LikeRequest = parse(&UNLIKE_POST, &with_path_id(None, path.into_inner()))?;
    let like_count = state
        .likes
        .unlike_post(PostId::new(request.postid), &user.0)
        .await?;
    Ok(web::Json(LikeResponse {
        like_count,
        is_liked: false,
    }))
}
