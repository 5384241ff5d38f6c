//! Service entry-point: loads settings, wires adapters and serves the REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use chronograf::inbound::http::health::HealthState;
use chronograf::settings::Settings;

use server::{ServerConfig, build_http_state, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = Settings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let http_state = build_http_state(&settings)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, http_state, ServerConfig::new(bind_addr))?;
    info!(%bind_addr, "chronograf listening");
    server.await
}
