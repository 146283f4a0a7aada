//! Social network backend: posts, likes, profiles, and icons over REST.
//!
//! - [`domain`]: entities, services, and ports.
//! - [`inbound`]: the actix-web adapter.
//! - [`outbound`]: persistence, icon storage, and token verification.
//! - [`middleware`]: request tracing and failure logging.
//! - [`server`]: configuration and composition root.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
