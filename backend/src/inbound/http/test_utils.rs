//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use mockable::DefaultClock;
use url::Url;

use crate::Trace;
use crate::domain::ports::MockSourcesQuery;
use crate::domain::{Error, ExplorationService, Source, SourceId};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::json_config;
use crate::inbound::http::{explorations, sources};
use crate::outbound::persistence::InMemoryExplorationRepository;

/// Source id `1`, the only source [`known_sources`] resolves.
pub fn sample_source() -> Source {
    Source {
        id: SourceId::new(1),
        name: "muh name".to_owned(),
        kind: "influx-enterprise".to_owned(),
        url: Url::parse("http://localhost:8086").expect("valid url"),
        username: Some("admin".to_owned()),
        password: Some("changeme".to_owned()),
        monitored_database: "telegraf".to_owned(),
    }
}

/// Sources port resolving only [`sample_source`].
pub fn known_sources() -> MockSourcesQuery {
    let mut sources = MockSourcesQuery::new();
    sources
        .expect_list_sources()
        .returning(|| Ok(vec![sample_source()]));
    sources.expect_get_source().returning(|id| {
        if id == SourceId::new(1) {
            Ok(sample_source())
        } else {
            Err(Error::not_found(format!("source {id} not found")))
        }
    });
    sources
}

/// State backed by a fresh in-memory exploration store.
pub fn in_memory_state(sources: MockSourcesQuery) -> HttpState {
    let service = Arc::new(ExplorationService::new(
        Arc::new(InMemoryExplorationRepository::new()),
        Arc::new(DefaultClock),
    ));
    HttpState::new(service.clone(), service, Arc::new(sources))
}

/// App exposing every REST handler the way the server mounts them.
pub fn test_app(
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
                .service(sources::list_sources)
                .service(sources::get_source)
                .service(sources::proxy)
                .service(sources::monitored_services)
                .service(explorations::list_explorations)
                .service(explorations::create_exploration)
                .service(explorations::get_exploration)
                .service(explorations::update_exploration)
                .service(explorations::delete_exploration),
        )
}
