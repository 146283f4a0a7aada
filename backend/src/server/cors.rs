//! Cross-origin policy for the browser client.

use actix_cors::Cors;
use actix_web::http::{Method, header};

use crate::middleware::trace::TRACE_ID_HEADER;

const MAX_AGE_SECS: usize = 3600;

/// Build the CORS middleware.
///
/// Only `allowed_origin` may call cross-origin; with no origin configured
/// every cross-origin request is refused. Requests without an `Origin`
/// header are never affected.
pub fn build_cors(allowed_origin: Option<&str>) -> Cors {
    let cors = Cors::default()
        .allowed_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([TRACE_ID_HEADER])
        .max_age(MAX_AGE_SECS);
    match allowed_origin {
        Some(origin) => cors.allowed_origin(origin),
        None => cors,
    }
}
