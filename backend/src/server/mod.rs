//! Server construction and middleware wiring.
//!
//! This is the composition root: adapters are chosen from
//! [`ServerSettings`], services are constructed explicitly, and the handlers
//! receive them through [`HttpState`].

pub mod config;
mod cors;
mod state_builders;

pub use config::ServerSettings;
pub use cors::build_cors;
pub use state_builders::{build_http_state, build_token_verifier};

use std::net::AddrParseError;

use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::error::{
    json_error_handler, path_error_handler, query_error_handler, unmatched_route,
};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::icons::{get_icon, update_icon};
use crate::inbound::http::likes::{like_post, unlike_post};
use crate::inbound::http::posts::{
    create_post, delete_post, get_owner_posts, get_posts, update_post,
};
use crate::inbound::http::profiles::{get_profile, update_profile};
use crate::inbound::http::state::HttpState;
use crate::middleware::{FailureLog, Trace};
use crate::outbound::persistence::PoolError;

/// Failures that prevent the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid bind address: {0}")]
    BindAddr(#[from] AddrParseError),
    #[error("identity token key: {message}")]
    Jwt { message: String },
    #[error("icon store: {message}")]
    Icons { message: String },
    #[error(transparent)]
    Database(#[from] PoolError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StartupError {
    pub fn jwt(message: impl Into<String>) -> Self {
        Self::Jwt {
            message: message.into(),
        }
    }

    pub fn icons(message: impl Into<String>) -> Self {
        Self::Icons {
            message: message.into(),
        }
    }
}

/// Everything one worker's [`App`] needs.
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
    pub allowed_origin: Option<String>,
    pub json_limit: usize,
}

/// Assemble the application: `/api` routes, probes, error handlers, and
/// middleware (trace outermost, then failure logging, then CORS).
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        allowed_origin,
        json_limit,
    } = deps;

    let api = web::scope("/api")
        .service(get_posts)
        .service(get_owner_posts)
        .service(create_post)
        .service(update_post)
        .service(delete_post)
        .service(like_post)
        .service(unlike_post)
        .service(get_profile)
        .service(update_profile)
        .service(get_icon)
        .service(update_icon);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(
            web::JsonConfig::default()
                .limit(json_limit)
                .error_handler(json_error_handler),
        )
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .wrap(build_cors(allowed_origin.as_deref()))
        .wrap(FailureLog)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.default_service(web::to(unmatched_route))
}

/// Wire adapters per `settings` and bind the HTTP server.
///
/// The health state is marked ready once the listener is bound.
///
/// # Errors
///
/// Returns [`StartupError`] when adapters cannot be built or the socket
/// cannot be bound.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    settings: &ServerSettings,
) -> Result<Server, StartupError> {
    let http_state = web::Data::new(build_http_state(settings).await?);
    let bind_addr = settings.bind_addr()?;
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state,
        allowed_origin: settings.allowed_origin().map(str::to_owned),
        json_limit: settings.json_limit(),
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();

    health_state.mark_ready();
    tracing::info!(%bind_addr, "listening");
    Ok(server)
}
