//! Shared fixtures for HTTP-level integration tests.

use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use mockable::DefaultClock;
use url::Url;

use chronograf::Trace;
use chronograf::domain::ports::ExplorationRepository;
use chronograf::domain::{ExplorationService, Source, SourceId, SourceService};
use chronograf::inbound::http::explorations;
use chronograf::inbound::http::state::HttpState;
use chronograf::inbound::http::validation::json_config;
use chronograf::outbound::influx::InfluxHttpClient;
use chronograf::outbound::sources::StaticSourceCatalogue;

/// Collection URI for user 42 on source 1.
pub const COLLECTION: &str = "/chronograf/v1/sources/1/users/42/explorations";

fn configured_source() -> Source {
    Source {
        id: SourceId::new(1),
        name: "local influx".to_owned(),
        kind: "influx".to_owned(),
        url: Url::parse("http://127.0.0.1:9").expect("valid url"),
        username: None,
        password: None,
        monitored_database: "telegraf".to_owned(),
    }
}

/// Real services over `repository` with source `1` configured.
pub fn state_over<R>(repository: Arc<R>) -> HttpState
where
    R: ExplorationRepository + 'static,
{
    let client = InfluxHttpClient::new(Duration::from_secs(1)).expect("reqwest client");
    let sources = Arc::new(SourceService::new(
        Arc::new(StaticSourceCatalogue::new(vec![configured_source()])),
        Arc::new(client),
    ));
    let service = Arc::new(ExplorationService::new(repository, Arc::new(DefaultClock)));
    HttpState::new(service.clone(), service, sources)
}

/// App mounting the exploration handlers as the server does.
pub fn app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .wrap(Trace)
        .service(
            web::scope("/chronograf/v1")
                .service(explorations::list_explorations)
                .service(explorations::create_exploration)
                .service(explorations::get_exploration)
                .service(explorations::update_exploration)
                .service(explorations::delete_exploration),
        )
}
