//! Server settings loaded via OrthoConfig.
//!
//! Every field can come from a CLI flag, an `SNS_*` environment variable, or
//! a configuration file. Accessors apply the defaults.

use std::net::{AddrParseError, SocketAddr};
use std::path::{Path, PathBuf};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_JSON_LIMIT: usize = 50 * 1024 * 1024;

/// Runtime configuration for the HTTP server and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SNS")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; without it posts and users live in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Directory holding icon blobs; without it icons live in memory.
    pub icon_dir: Option<PathBuf>,
    /// PEM file with the identity provider's RS256 public key.
    pub jwt_public_key_path: Option<PathBuf>,
    /// Shared HS256 secret, used when no public key is configured.
    pub jwt_secret: Option<String>,
    /// Expected `iss` claim.
    pub jwt_issuer: Option<String>,
    /// Expected `aud` claim (the identity provider's client id).
    pub jwt_audience: Option<String>,
    /// Browser origin allowed to call the API cross-origin.
    pub allowed_origin: Option<String>,
    /// Maximum JSON request body in bytes.
    pub json_limit: Option<usize>,
    /// Disable all log output.
    #[ortho_config(default = false)]
    pub log_silent: bool,
}

impl ServerSettings {
    /// Listen address, falling back to `0.0.0.0:5000`.
    ///
    /// # Errors
    ///
    /// Returns [`AddrParseError`] when the configured value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn json_limit(&self) -> usize {
        self.json_limit.unwrap_or(DEFAULT_JSON_LIMIT)
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref().filter(|url| !url.is_empty())
    }

    pub fn icon_dir(&self) -> Option<&Path> {
        self.icon_dir.as_deref()
    }

    pub fn allowed_origin(&self) -> Option<&str> {
        self.allowed_origin
            .as_deref()
            .filter(|origin| !origin.is_empty())
    }
}
