//! Icon HTTP handlers.
//!
//! ```text
//! GET /api/icons/{owner}
//! PUT /api/icons {"iconImage":"data:image/png;base64,..."}
//! ```

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::posts::{OWNER, username_from};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{Field, FieldKind, Schema, parse};

const GET_ICON: Schema = Schema {
    name: "getIcon",
    fields: &[OWNER],
};
const UPDATE_ICON: Schema = Schema {
    name: "updateIcon",
    fields: &[Field::required(
        "iconImage",
        FieldKind::String {
            min_len: 0,
            max_len: None,
        },
    )],
};

#[derive(Debug, Deserialize)]
struct OwnerParams {
    owner: String,
}

/// Avatar blob of one user; empty when none was uploaded.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IconBody {
    #[schema(example = "data:image/png;base64,iVBORw0KGgo=")]
    pub icon_image: String,
}

#[utoipa::path(
    get,
    path = "/api/icons/{owner}",
    params(("owner" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Icon", body = IconBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 422, description = "Unprocessable Entity", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody)
    ),
    tags = ["icons"],
    operation_id = "getIcon"
)]
#[get("/icons/{owner}")]
pub async fn get_icon(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<IconBody>> {
    let params: OwnerParams = parse(&GET_ICON, &json!({ "owner": path.into_inner() }))?;
    let icon_image = state.icons.get_icon(&username_from(params.owner)?).await?;
    Ok(web::Json(IconBody { icon_image }))
}

#[utoipa::path(
    put,
    path = "/api/icons",
    request_body = IconBody,
    responses(
        (status = 200, description = "Stored icon", body = IconBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 422, description = "Unprocessable Entity", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody)
    ),
    tags = ["icons"],
    operation_id = "updateIcon"
)]
#[put("/icons")]
pub async fn update_icon(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    body: web::Json<Value>,
) -> ApiResult<web::Json<IconBody>> {
    let request: IconBody = parse(&UPDATE_ICON, &body)?;
    let icon_image = state
        .icon_commands
        .update_icon(&user.0.username, request.icon_image)
        .await?;
    Ok(web::Json(IconBody { icon_image }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IconKey, Username};
    use crate::domain::ports::IconStore;
    use crate::inbound::http::test_utils::{auth_header, test_backend};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};

    #[actix_web::test]
    async fn upload_then_fetch() {
        let backend = test_backend();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(backend.state.clone()))
                .service(web::scope("/api").service(get_icon).service(update_icon)),
        )
        .await;

        let missing = test::TestRequest::get()
            .uri("/api/icons/alice")
            .insert_header(auth_header("bob"))
            .to_request();
        let body: IconBody = test::call_and_read_body_json(&app, missing).await;
        assert_eq!(body.icon_image, "");

        let upload = test::TestRequest::put()
            .uri("/api/icons")
            .insert_header(auth_header("alice"))
            .set_json(json!({ "iconImage": "data:image/png;base64,AAAA" }))
            .to_request();
        let stored: IconBody = test::call_and_read_body_json(&app, upload).await;
        assert_eq!(stored.icon_image, "data:image/png;base64,AAAA");

        let key = IconKey::for_username(&Username::new("alice").expect("username"));
        assert_eq!(
            backend.icons.get(&key).await.expect("read"),
            Some("data:image/png;base64,AAAA".to_owned())
        );

        let fetch = test::TestRequest::get()
            .uri("/api/icons/alice")
            .insert_header(auth_header("bob"))
            .to_request();
        let fetched: IconBody = test::call_and_read_body_json(&app, fetch).await;
        assert_eq!(fetched, stored);
    }

    #[actix_web::test]
    async fn upload_requires_an_image() {
        let backend = test_backend();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(backend.state.clone()))
                .service(web::scope("/api").service(update_icon)),
        )
        .await;

        let request = test::TestRequest::put()
            .uri("/api/icons")
            .insert_header(auth_header("alice"))
            .set_json(json!({ "icon": "wrong key" }))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
