//! Source HTTP handlers.
//!
//! ```text
//! GET  /chronograf/v1/sources
//! GET  /chronograf/v1/sources/{id}
//! POST /chronograf/v1/sources/{id}/proxy
//! GET  /chronograf/v1/sources/{id}/monitored
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::links;
use crate::domain::ports::ProxyRequest;
use crate::domain::{MonitoredService, Source, TimeSeriesQuery};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_source_id;

/// Navigation links for a source.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SourceLinksBody {
    /// The source itself.
    #[serde(rename = "self")]
    #[schema(example = "/chronograf/v1/sources/1")]
    pub self_link: String,
    /// Query pass-through.
    #[schema(example = "/chronograf/v1/sources/1/proxy")]
    pub proxy: String,
    /// Service discovery.
    #[schema(example = "/chronograf/v1/sources/1/monitored")]
    pub monitored: String,
    /// Root of the per-user exploration collections.
    #[schema(example = "/chronograf/v1/sources/1/users")]
    pub users: String,
}

/// A configured time-series source. Credentials other than the user name
/// are never rendered.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SourceBody {
    /// Identifier rendered as a string.
    #[schema(example = "1")]
    pub id: String,
    /// Display name.
    #[schema(example = "local influx")]
    pub name: String,
    /// Backend flavour.
    #[serde(rename = "type")]
    #[schema(example = "influx")]
    pub kind: String,
    /// Base URL of the backend.
    #[schema(example = "http://localhost:8086")]
    pub url: String,
    /// Basic-auth user, when configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Navigation links.
    pub links: SourceLinksBody,
}

impl From<Source> for SourceBody {
    fn from(value: Source) -> Self {
        let base = links::source_path(value.id);
        Self {
            id: value.id.to_string(),
            name: value.name,
            kind: value.kind,
            url: value.url.to_string(),
            username: value.username,
            links: SourceLinksBody {
                proxy: format!("{base}/proxy"),
                monitored: format!("{base}/monitored"),
                users: format!("{base}/users"),
                self_link: base,
            },
        }
    }
}

/// Every configured source.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SourcesBody {
    /// Sources ordered by identifier.
    pub sources: Vec<SourceBody>,
}

/// Query forwarded to the source's backend.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ProxyRequestBody {
    /// Query text; must not be blank.
    #[schema(example = "SHOW DATABASES")]
    pub query: String,
    /// Database the query runs against.
    #[serde(default)]
    pub db: Option<String>,
    /// Retention policy the query runs against.
    #[serde(default)]
    pub rp: Option<String>,
}

/// Backend results passed through verbatim.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ProxyResponseBody {
    /// One entry per statement, as the backend returned it.
    #[schema(value_type = Object)]
    pub results: Value,
}

/// A service discovered on the source's backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonitoredServiceBody {
    /// Tag key, e.g. `host`.
    #[schema(example = "host")]
    pub tag_key: String,
    /// Tag value.
    #[schema(example = "server01")]
    pub tag_value: String,
    /// Measurement the tag was found on.
    #[serde(rename = "type")]
    #[schema(example = "system")]
    pub kind: String,
}

impl From<MonitoredService> for MonitoredServiceBody {
    fn from(value: MonitoredService) -> Self {
        Self {
            tag_key: value.tag_key,
            tag_value: value.tag_value,
            kind: value.kind,
        }
    }
}

/// Services discovered on a source.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct MonitoredServicesBody {
    /// Discovered services.
    pub services: Vec<MonitoredServiceBody>,
}

/// List the configured sources.
#[utoipa::path(
    get,
    path = "/chronograf/v1/sources",
    responses(
        (status = 200, description = "Configured sources", body = SourcesBody),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["sources"],
    operation_id = "listSources"
)]
#[get("/sources")]
pub async fn list_sources(state: web::Data<HttpState>) -> ApiResult<web::Json<SourcesBody>> {
    let sources = state.sources.list_sources().await?;
    Ok(web::Json(SourcesBody {
        sources: sources.into_iter().map(SourceBody::from).collect(),
    }))
}

/// Fetch one source.
#[utoipa::path(
    get,
    path = "/chronograf/v1/sources/{id}",
    params(("id" = String, Path, description = "Source identifier")),
    responses(
        (status = 200, description = "Source", body = SourceBody),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown source", body = ErrorSchema)
    ),
    tags = ["sources"],
    operation_id = "getSource"
)]
#[get("/sources/{id}")]
pub async fn get_source(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<SourceBody>> {
    let id = parse_source_id(&path.into_inner())?;
    let source = state.sources.get_source(id).await?;
    Ok(web::Json(source.into()))
}

/// Run a query on the source's backend and return its results.
#[utoipa::path(
    post,
    path = "/chronograf/v1/sources/{id}/proxy",
    params(("id" = String, Path, description = "Source identifier")),
    request_body = ProxyRequestBody,
    responses(
        (status = 200, description = "Backend results", body = ProxyResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown source", body = ErrorSchema),
        (status = 500, description = "Backend failure", body = ErrorSchema)
    ),
    tags = ["sources"],
    operation_id = "proxyQuery"
)]
#[post("/sources/{id}/proxy")]
pub async fn proxy(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ProxyRequestBody>,
) -> ApiResult<web::Json<ProxyResponseBody>> {
    let source = parse_source_id(&path.into_inner())?;
    let ProxyRequestBody { query, db, rp } = payload.into_inner();

    let results = state
        .sources
        .proxy(ProxyRequest {
            source,
            query: TimeSeriesQuery {
                command: query,
                database: db,
                retention_policy: rp,
            },
        })
        .await?;

    Ok(web::Json(ProxyResponseBody { results }))
}

/// List services discovered on the source's backend.
#[utoipa::path(
    get,
    path = "/chronograf/v1/sources/{id}/monitored",
    params(("id" = String, Path, description = "Source identifier")),
    responses(
        (status = 200, description = "Monitored services", body = MonitoredServicesBody),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown source", body = ErrorSchema),
        (status = 500, description = "Backend failure", body = ErrorSchema)
    ),
    tags = ["sources"],
    operation_id = "monitoredServices"
)]
#[get("/sources/{id}/monitored")]
pub async fn monitored_services(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MonitoredServicesBody>> {
    let id = parse_source_id(&path.into_inner())?;
    let services = state.sources.monitored_services(id).await?;
    Ok(web::Json(MonitoredServicesBody {
        services: services
            .into_iter()
            .map(MonitoredServiceBody::from)
            .collect(),
    }))
}

#[cfg(test)]
#[path = "sources_tests.rs"]
mod tests;
