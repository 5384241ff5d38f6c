//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST handler together with the error schema
//! wrappers from [`crate::inbound::http::schemas`]. Request and response
//! bodies are pulled in through the handlers' `#[utoipa::path]` attributes.
//!
//! The document backs Swagger UI in debug builds and is exported by
//! `cargo run --bin openapi-dump`.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Chronograf exploration API",
        description = "Saved time-series explorations scoped to a source and user, plus the \
                       source proxy used to run them.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::sources::list_sources,
        crate::inbound::http::sources::get_source,
        crate::inbound::http::sources::proxy,
        crate::inbound::http::sources::monitored_services,
        crate::inbound::http::explorations::list_explorations,
        crate::inbound::http::explorations::create_exploration,
        crate::inbound::http::explorations::get_exploration,
        crate::inbound::http::explorations::update_exploration,
        crate::inbound::http::explorations::delete_exploration,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "explorations", description = "Saved queries owned by a user"),
        (name = "sources", description = "Configured time-series backends"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
