//! Assembly of handler state from loaded settings.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use chronograf::domain::ports::ExplorationRepository;
use chronograf::domain::{ExplorationService, SourceService};
use chronograf::inbound::http::state::HttpState;
use chronograf::outbound::influx::InfluxHttpClient;
use chronograf::outbound::persistence::{
    InMemoryExplorationRepository, JsonFileExplorationRepository,
};
use chronograf::outbound::sources::StaticSourceCatalogue;
use chronograf::settings::Settings;

fn with_repository<R>(repository: Arc<R>, sources: Arc<SourceService>) -> HttpState
where
    R: ExplorationRepository + 'static,
{
    let explorations = Arc::new(ExplorationService::new(repository, Arc::new(DefaultClock)));
    HttpState::new(explorations.clone(), explorations, sources)
}

/// Wire the exploration store, the configured source and the InfluxDB
/// client into shared handler state.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the settings are malformed, the store
/// cannot be opened or the HTTP client cannot be built.
pub(crate) fn build_http_state(settings: &Settings) -> std::io::Result<web::Data<HttpState>> {
    let source = settings.source().map_err(std::io::Error::other)?;
    let client = InfluxHttpClient::new(settings.query_timeout())
        .map_err(|err| std::io::Error::other(format!("influx client setup failed: {err}")))?;
    let sources = Arc::new(SourceService::new(
        Arc::new(StaticSourceCatalogue::new(vec![source])),
        Arc::new(client),
    ));

    let state = match settings.store_path() {
        Some(path) => {
            let repository =
                JsonFileExplorationRepository::open(path).map_err(std::io::Error::other)?;
            with_repository(Arc::new(repository), sources)
        }
        None => {
            info!("no store path configured; explorations are kept in memory");
            with_repository(Arc::new(InMemoryExplorationRepository::new()), sources)
        }
    };
    Ok(web::Data::new(state))
}
