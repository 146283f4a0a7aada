//! Adapter selection and wiring of the HTTP state.
//!
//! A configured database selects the Diesel repositories, otherwise one
//! shared in-memory store serves both. Icons go to the filesystem when an
//! icon directory is configured, otherwise to memory.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use crate::domain::ports::{PostRepository, TokenVerifier, UserRepository};
use crate::inbound::http::state::HttpState;
use crate::outbound::icons::{FsIconStore, InMemoryIconStore};
use crate::outbound::jwt::{JwtTokenVerifier, VerificationKey};
use crate::outbound::memory::InMemoryStore;
use crate::outbound::persistence::{
    DbPool, DieselPostRepository, DieselUserRepository, PoolConfig, run_migrations,
};

use super::StartupError;
use super::config::ServerSettings;

/// Build the identity token verifier from the configured key material.
///
/// A public key file takes precedence over a shared secret.
///
/// # Errors
///
/// Returns [`StartupError::Jwt`] when neither key is configured or the key
/// cannot be read.
pub fn build_token_verifier(settings: &ServerSettings) -> Result<JwtTokenVerifier, StartupError> {
    let issuer = settings.jwt_issuer.as_deref();
    let audience = settings.jwt_audience.as_deref();
    if let Some(path) = settings.jwt_public_key_path.as_deref() {
        let pem = fs::read(path).map_err(|err| {
            StartupError::jwt(format!("reading {}: {err}", path.display()))
        })?;
        return JwtTokenVerifier::new(VerificationKey::RsaPem(&pem), issuer, audience)
            .map_err(|err| StartupError::jwt(err.to_string()));
    }
    match settings.jwt_secret.as_deref().filter(|secret| !secret.is_empty()) {
        Some(secret) => {
            JwtTokenVerifier::new(VerificationKey::Secret(secret.as_bytes()), issuer, audience)
                .map_err(|err| StartupError::jwt(err.to_string()))
        }
        None => Err(StartupError::jwt(
            "configure SNS_JWT_PUBLIC_KEY_PATH or SNS_JWT_SECRET",
        )),
    }
}

fn with_icon_store<U, P>(
    users: Arc<U>,
    posts: Arc<P>,
    icon_dir: Option<&Path>,
    tokens: Arc<dyn TokenVerifier>,
    clock: Arc<dyn Clock>,
) -> Result<HttpState, StartupError>
where
    U: UserRepository + 'static,
    P: PostRepository + 'static,
{
    match icon_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "storing icons on disk");
            let store = FsIconStore::open(dir).map_err(|err| StartupError::icons(err.to_string()))?;
            Ok(HttpState::from_adapters(users, posts, Arc::new(store), tokens, clock))
        }
        None => {
            warn!("no icon directory configured; icons are kept in memory");
            Ok(HttpState::from_adapters(
                users,
                posts,
                Arc::new(InMemoryIconStore::new()),
                tokens,
                clock,
            ))
        }
    }
}

/// Select adapters per `settings` and wire the services behind them.
///
/// Pending migrations are applied before the pool is built.
///
/// # Errors
///
/// Propagates key, migration, pool, and icon directory failures.
pub async fn build_http_state(settings: &ServerSettings) -> Result<HttpState, StartupError> {
    let tokens: Arc<dyn TokenVerifier> = Arc::new(build_token_verifier(settings)?);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    match settings.database_url() {
        Some(url) => {
            run_migrations(url).await?;
            let pool = DbPool::new(
                PoolConfig::new(url).with_max_size(settings.db_max_connections()),
            )
            .await?;
            info!("using PostgreSQL repositories");
            with_icon_store(
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselPostRepository::new(pool)),
                settings.icon_dir(),
                tokens,
                clock,
            )
        }
        None => {
            warn!("no database configured; users and posts are kept in memory");
            let store = InMemoryStore::new();
            with_icon_store(
                Arc::new(store.clone()),
                Arc::new(store),
                settings.icon_dir(),
                tokens,
                clock,
            )
        }
    }
}
