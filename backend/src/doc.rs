//! OpenAPI documentation.
//!
//! [`ApiDoc`] registers every `/api` handler, the health probes, the
//! response schemas, and the bearer token scheme. Swagger UI serves it at
//! `/docs` in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{PostAuthorView, PostType, PostView};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::icons::IconBody;
use crate::inbound::http::likes::{LikeRequest, LikeResponse};
use crate::inbound::http::posts::{PostContentRequest, PostListResponse};
use crate::inbound::http::profiles::ProfileBody;

/// Adds the identity token scheme to the generated document.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "IdToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Identity provider id token; the `Bearer ` prefix is optional.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "SNS backend API",
        description = "Posts, likes, profiles, and icons for the social network client."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("IdToken" = [])),
    paths(
        crate::inbound::http::posts::get_posts,
        crate::inbound::http::posts::get_owner_posts,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::update_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::likes::like_post,
        crate::inbound::http::likes::unlike_post,
        crate::inbound::http::profiles::get_profile,
        crate::inbound::http::profiles::update_profile,
        crate::inbound::http::icons::get_icon,
        crate::inbound::http::icons::update_icon,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorBody,
        PostView,
        PostAuthorView,
        PostType,
        PostListResponse,
        PostContentRequest,
        LikeRequest,
        LikeResponse,
        ProfileBody,
        IconBody,
    )),
    tags(
        (name = "posts", description = "Publishing and listing posts"),
        (name = "likes", description = "Liking and unliking posts"),
        (name = "profiles", description = "Profile text"),
        (name = "icons", description = "Avatar images"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
