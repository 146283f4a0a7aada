//! Backend entry-point: loads settings, wires adapters, and serves the API.

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use sns_backend::inbound::http::health::HealthState;
use sns_backend::server::{ServerSettings, create_server};

fn init_tracing(silent: bool) {
    let filter = if silent {
        EnvFilter::new("off")
    } else {
        EnvFilter::from_default_env()
    };
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let settings = ServerSettings::load().map_err(|e| {
        std::io::Error::other(format!("failed to load settings: {e}"))
    })?;
    init_tracing(settings.log_silent);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), &settings)
        .await
        .map_err(|e| {
            error!(error = %e, "server startup failed");
            std::io::Error::other(e)
        })?;

    let result = server.await;
    health_state.mark_draining();
    result
}
