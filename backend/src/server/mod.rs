//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::ServerConfig;
pub(crate) use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};

use chronograf::Trace;
#[cfg(debug_assertions)]
use chronograf::doc::ApiDoc;
use chronograf::inbound::http::explorations::{
    create_exploration, delete_exploration, get_exploration, list_explorations,
    update_exploration,
};
use chronograf::inbound::http::health::{HealthState, live, ready};
use chronograf::inbound::http::sources::{get_source, list_sources, monitored_services, proxy};
use chronograf::inbound::http::state::HttpState;
use chronograf::inbound::http::validation::json_config;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/chronograf/v1")
        .service(list_sources)
        .service(get_source)
        .service(proxy)
        .service(monitored_services)
        .service(list_explorations)
        .service(create_exploration)
        .service(get_exploration)
        .service(update_exploration)
        .service(delete_exploration);

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live)
        .configure(mount_docs)
}

/// Swagger UI and the raw document, in debug builds only.
#[cfg(debug_assertions)]
fn mount_docs(config: &mut web::ServiceConfig) {
    config.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
}

#[cfg(not(debug_assertions))]
const fn mount_docs(_: &mut web::ServiceConfig) {}

/// Resolve on SIGINT or, on Unix, SIGTERM.
async fn shutdown_requested() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
                return;
            }
            Err(err) => warn!(error = %err, "SIGTERM listener unavailable"),
        }
    }
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "interrupt listener failed; running until killed");
        std::future::pending::<()>().await;
    }
}

/// Construct the HTTP server over prepared handler state.
///
/// Readiness flips once the listener is bound; an interrupt moves the
/// probes to draining before the workers stop. With the `metrics` feature
/// every request is counted and `/metrics` serves the registry.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let drain_health_state = health_state.clone();
    let ServerConfig { bind_addr } = config;
    #[cfg(feature = "metrics")]
    let prometheus = metrics::build_metrics()?;

    #[cfg(feature = "metrics")]
    let factory = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone()).wrap(prometheus.clone())
    });
    #[cfg(not(feature = "metrics"))]
    let factory =
        HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()));

    let server = factory
        .shutdown_signal(async move {
            shutdown_requested().await;
            drain_health_state.mark_draining();
            info!("draining; readiness and liveness now fail");
        })
        .bind(bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}
