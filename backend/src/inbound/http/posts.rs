//! Post HTTP handlers.
//!
//! ```text
//! GET    /api/posts?offset=0&limit=20
//! GET    /api/posts/{owner}?offset=0&limit=20
//! POST   /api/posts            {"content":"hello"}
//! PUT    /api/posts/{postid}   {"content":"edited"}
//! DELETE /api/posts/{postid}
//! ```

use std::collections::HashMap;

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::domain::ports::ListPostsRequest;
use crate::domain::{
    CONTENT_MAX, Error, MAX_LIST_LIMIT, PostContent, PostId, PostPage, PostView, USERNAME_MAX,
    Username,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    Field, FieldKind, Schema, coerce_integer, coerce_integer_field, parse,
};

const OFFSET: Field = Field::optional(
    "offset",
    FieldKind::Integer { min: 0, max: None },
);
const LIMIT: Field = Field::optional(
    "limit",
    FieldKind::Integer {
        min: 1,
        max: Some(MAX_LIST_LIMIT),
    },
);
pub(crate) const OWNER: Field = Field::required(
    "owner",
    FieldKind::String {
        min_len: 1,
        max_len: Some(USERNAME_MAX),
    },
);
const CONTENT: Field = Field::required(
    "content",
    FieldKind::String {
        min_len: 1,
        max_len: Some(CONTENT_MAX),
    },
);
pub(crate) const POST_ID: Field = Field::required(
    "postid",
    FieldKind::Integer {
        min: 1,
        max: Some(i32::MAX as i64),
    },
);

const GET_POSTS: Schema = Schema {
    name: "getPosts",
    fields: &[OFFSET, LIMIT],
};
const GET_OWNER_POSTS: Schema = Schema {
    name: "getOwnerPosts",
    fields: &[OWNER, OFFSET, LIMIT],
};
const POST_POST: Schema = Schema {
    name: "postPost",
    fields: &[CONTENT],
};
const UPDATE_POST: Schema = Schema {
    name: "updatePost",
    fields: &[POST_ID, CONTENT],
};
const DELETE_POST: Schema = Schema {
    name: "deletePost",
    fields: &[POST_ID],
};

/// Listing page returned by both listing routes.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PostListResponse {
    #[serde(rename = "Items")]
    pub items: Vec<PostView>,
}

/// Body for creating or editing a post.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PostContentRequest {
    #[schema(example = "hello")]
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct PageParams {
    offset: Option<i64>,
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwnerPageParams {
    owner: String,
    offset: Option<i64>,
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct UpdatePostParams {
    postid: i32,
    content: String,
}

#[derive(Debug, Deserialize)]
struct PostIdParams {
    postid: i32,
}

/// Copy the paging parameters out of the query string, coercing numbers.
/// Empty values count as absent.
fn page_input(query: &HashMap<String, String>) -> Map<String, Value> {
    let mut input = Map::new();
    for key in ["offset", "limit"] {
        if let Some(raw) = query.get(key).filter(|raw| !raw.is_empty()) {
            input.insert(key.to_owned(), coerce_integer(raw));
        }
    }
    input
}

/// Merge a raw path id into a JSON body for validation.
pub(crate) fn with_path_id(body: Option<Value>, raw_id: String) -> Value {
    let mut input = match body {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    input.insert("postid".to_owned(), Value::String(raw_id));
    coerce_integer_field(&mut input, "postid");
    Value::Object(input)
}

pub(crate) fn content_from(raw: String) -> Result<PostContent, Error> {
    PostContent::new(raw).map_err(|err| Error::validation(err.to_string()))
}

pub(crate) fn username_from(raw: String) -> Result<Username, Error> {
    Username::new(raw).map_err(|err| Error::validation(err.to_string()))
}

/// List the newest posts across all owners.
#[utoipa::path(
    get,
    path = "/api/posts",
    params(
        ("offset" = Option<i64>, Query, description = "Posts to skip (default 0)"),
        ("limit" = Option<i64>, Query, description = "Page size, 1..=100 (default 20)")
    ),
    responses(
        (status = 200, description = "Newest posts first", body = PostListResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 422, description = "Unprocessable Entity", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody)
    ),
    tags = ["posts"],
    operation_id = "getPosts"
)]
#[get("/posts")]
pub async fn get_posts(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    query: web::Query<HashMap<String, String>>,
) -> ApiResult<web::Json<PostListResponse>> {
    let params: PageParams = parse(&GET_POSTS, &Value::Object(page_input(&query)))?;
    let items = state
        .posts
        .list_posts(ListPostsRequest {
            viewer: Some(user.0.id),
            owner: None,
            page: PostPage::new(params.offset, params.limit),
        })
        .await?;
    Ok(web::Json(PostListResponse { items }))
}

/// List one owner's posts, newest first.
#[utoipa::path(
    get,
    path = "/api/posts/{owner}",
    params(
        ("owner" = String, Path, description = "Username of the posts' owner"),
        ("offset" = Option<i64>, Query, description = "Posts to skip (default 0)"),
        ("limit" = Option<i64>, Query, description = "Page size, 1..=100 (default 20)")
    ),
    responses(
        (status = 200, description = "Owner's posts, newest first", body = PostListResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 422, description = "Unprocessable Entity", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody)
    ),
    tags = ["posts"],
    operation_id = "getOwnerPosts"
)]
#[get("/posts/{owner}")]
pub async fn get_owner_posts(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> ApiResult<web::Json<PostListResponse>> {
    let mut input = page_input(&query);
    input.insert("owner".to_owned(), Value::String(path.into_inner()));
    let params: OwnerPageParams = parse(&GET_OWNER_POSTS, &Value::Object(input))?;
    let items = state
        .posts
        .list_posts(ListPostsRequest {
            viewer: Some(user.0.id),
            owner: Some(username_from(params.owner)?),
            page: PostPage::new(params.offset, params.limit),
        })
        .await?;
    Ok(web::Json(PostListResponse { items }))
}

/// Publish a post as the caller.
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = PostContentRequest,
    responses(
        (status = 201, description = "Created", body = PostView),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 422, description = "Unprocessable Entity", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody)
    ),
    tags = ["posts"],
    operation_id = "postPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let request: PostContentRequest = parse(&POST_POST, &body)?;
    let view = state
        .post_commands
        .create_post(content_from(request.content)?, &user.0)
        .await?;
    Ok(HttpResponse::Created().json(view))
}

/// Replace the content of one of the caller's posts.
#[utoipa::path(
    put,
    path = "/api/posts/{postid}",
    params(("postid" = i32, Path, description = "Post identifier")),
    request_body = PostContentRequest,
    responses(
        (status = 200, description = "Updated post", body = PostView),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody),
        (status = 422, description = "Unprocessable Entity", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody)
    ),
    tags = ["posts"],
    operation_id = "updatePost"
)]
#[put("/posts/{postid}")]
pub async fn update_post(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> ApiResult<web::Json<PostView>> {
    let input = with_path_id(Some(body.into_inner()), path.into_inner());
    let params: UpdatePostParams = parse(&UPDATE_POST, &input)?;
    let view = state
        .post_commands
        .update_post(
            PostId::new(params.postid),
            content_from(params.content)?,
            &user.0,
        )
        .await?;
    Ok(web::Json(view))
}

/// Delete one of the caller's posts along with its likes.
#[utoipa::path(
    delete,
    path = "/api/posts/{postid}",
    params(("postid" = i32, Path, description = "Post identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody),
        (status = 422, description = "Unprocessable Entity", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/posts/{postid}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let params: PostIdParams = parse(&DELETE_POST, &with_path_id(None, path.into_inner()))?;
    state
        .post_commands
        .delete_post(PostId::new(params.postid), &user.0)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "posts_tests.rs"]
mod tests;
