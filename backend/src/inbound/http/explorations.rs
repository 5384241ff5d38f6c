//! Exploration HTTP handlers.
//!
//! ```text
//! GET    /chronograf/v1/sources/{id}/users/{user_id}/explorations
//! POST   /chronograf/v1/sources/{id}/users/{user_id}/explorations
//! GET    /chronograf/v1/sources/{id}/users/{user_id}/explorations/{exploration_id}
//! PATCH  /chronograf/v1/sources/{id}/users/{user_id}/explorations/{exploration_id}
//! DELETE /chronograf/v1/sources/{id}/users/{user_id}/explorations/{exploration_id}
//! ```
//!
//! Path segments are parsed here; the source must exist before any store
//! call is made.

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::links::Link;
use crate::domain::ports::{
    CreateExplorationRequest, DeleteExplorationRequest, ExplorationPayload,
    GetExplorationRequest, ListExplorationsRequest, UpdateExplorationRequest,
};
use crate::domain::{Error, ExplorationDraft, ExplorationId, SourceId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    exploration_content_error, parse_exploration_id, parse_optional_json, parse_source_id,
    parse_user_id,
};

/// Exploration content supplied by clients.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ExplorationRequestBody {
    /// Display name; must not be blank.
    #[schema(example = "cpu by host")]
    pub name: String,
    /// Opaque query payload stored verbatim.
    #[serde(default)]
    #[schema(example = "SELECT mean(usage_idle) FROM cpu GROUP BY host")]
    pub data: String,
}

/// Hyperlink embedded in representations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct LinkBody {
    /// Link relation.
    #[schema(example = "self")]
    pub rel: String,
    /// Absolute path of the target.
    #[schema(example = "/chronograf/v1/sources/1/users/42/explorations/0")]
    pub href: String,
}

impl From<Link> for LinkBody {
    fn from(value: Link) -> Self {
        Self {
            rel: value.rel,
            href: value.href,
        }
    }
}

/// Stored exploration as returned to clients.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExplorationResponseBody {
    /// Store-wide identifier.
    pub id: u64,
    /// Owning user.
    pub user_id: u64,
    /// Display name.
    pub name: String,
    /// Opaque query payload.
    pub data: String,
    /// Creation time, RFC3339 in UTC.
    #[schema(format = "date-time")]
    pub created_at: String,
    /// Last revision time, RFC3339 in UTC.
    #[schema(format = "date-time")]
    pub updated_at: String,
    /// Self link.
    pub link: LinkBody,
}

fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl From<ExplorationPayload> for ExplorationResponseBody {
    fn from(value: ExplorationPayload) -> Self {
        Self {
            id: value.id.get(),
            user_id: value.owner.get(),
            name: value.name,
            data: value.data,
            created_at: timestamp(value.created_at),
            updated_at: timestamp(value.updated_at),
            link: value.link.into(),
        }
    }
}

/// Collection of one owner's explorations.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ExplorationsResponseBody {
    /// Records in insertion order.
    pub explorations: Vec<ExplorationResponseBody>,
}

fn draft_from(body: ExplorationRequestBody) -> Result<ExplorationDraft, Error> {
    ExplorationDraft::new(body.name, body.data).map_err(|err| exploration_content_error(&err))
}

/// Parse the collection path and confirm the source exists.
async fn owner_scope(
    state: &HttpState,
    (raw_source, raw_owner): (String, String),
) -> Result<(SourceId, UserId), Error> {
    let source = parse_source_id(&raw_source)?;
    let owner = parse_user_id(&raw_owner)?;
    state.sources.get_source(source).await?;
    Ok((source, owner))
}

/// Parse the item path segments in path order, then confirm the source
/// exists.
async fn item_scope(
    state: &HttpState,
    (raw_source, raw_owner, raw_id): (String, String, String),
) -> Result<(SourceId, UserId, ExplorationId), Error> {
    let source = parse_source_id(&raw_source)?;
    let owner = parse_user_id(&raw_owner)?;
    let id = parse_exploration_id(&raw_id)?;
    state.sources.get_source(source).await?;
    Ok((source, owner, id))
}

/// List the user's explorations in insertion order.
#[utoipa::path(
    get,
    path = "/chronograf/v1/sources/{id}/users/{user_id}/explorations",
    params(
        ("id" = String, Path, description = "Source identifier"),
        ("user_id" = String, Path, description = "Owning user identifier")
    ),
    responses(
        (status = 200, description = "Explorations", body = ExplorationsResponseBody),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown source", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["explorations"],
    operation_id = "listExplorations"
)]
#[get("/sources/{id}/users/{user_id}/explorations")]
pub async fn list_explorations(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<ExplorationsResponseBody>> {
    let (source, owner) = owner_scope(&state, path.into_inner()).await?;

    let explorations = state
        .explorations_query
        .list(ListExplorationsRequest { source, owner })
        .await?;

    Ok(web::Json(ExplorationsResponseBody {
        explorations: explorations
            .into_iter()
            .map(ExplorationResponseBody::from)
            .collect(),
    }))
}

/// Create an exploration; answers 201 with a `Location` header.
#[utoipa::path(
    post,
    path = "/chronograf/v1/sources/{id}/users/{user_id}/explorations",
    params(
        ("id" = String, Path, description = "Source identifier"),
        ("user_id" = String, Path, description = "Owning user identifier")
    ),
    request_body = ExplorationRequestBody,
    responses(
        (status = 201, description = "Exploration created", body = ExplorationResponseBody,
            headers(("Location" = String, description = "Path of the new exploration"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown source", body = ErrorSchema),
        (status = 409, description = "Identifier collision", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["explorations"],
    operation_id = "createExploration"
)]
#[post("/sources/{id}/users/{user_id}/explorations")]
pub async fn create_exploration(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
    payload: web::Json<ExplorationRequestBody>,
) -> ApiResult<HttpResponse> {
    let (source, owner) = owner_scope(&state, path.into_inner()).await?;
    let draft = draft_from(payload.into_inner())?;

    let created = state
        .explorations
        .create(CreateExplorationRequest {
            source,
            owner,
            draft,
        })
        .await?;

    let location = created.link.href.clone();
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location))
        .json(ExplorationResponseBody::from(created)))
}

/// Fetch one exploration.
#[utoipa::path(
    get,
    path = "/chronograf/v1/sources/{id}/users/{user_id}/explorations/{exploration_id}",
    params(
        ("id" = String, Path, description = "Source identifier"),
        ("user_id" = String, Path, description = "Owning user identifier"),
        ("exploration_id" = String, Path, description = "Exploration identifier")
    ),
    responses(
        (status = 200, description = "Exploration", body = ExplorationResponseBody),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown source or exploration", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["explorations"],
    operation_id = "getExploration"
)]
#[get("/sources/{id}/users/{user_id}/explorations/{exploration_id}")]
pub async fn get_exploration(
    state: web::Data<HttpState>,
    path: web::Path<(String, String, String)>,
) -> ApiResult<web::Json<ExplorationResponseBody>> {
    let (source, owner, id) = item_scope(&state, path.into_inner()).await?;

    let exploration = state
        .explorations_query
        .get(GetExplorationRequest { source, owner, id })
        .await?;

    Ok(web::Json(exploration.into()))
}

/// Replace an exploration's name and data.
///
/// An empty body leaves the exploration untouched and still answers 204.
#[utoipa::path(
    patch,
    path = "/chronograf/v1/sources/{id}/users/{user_id}/explorations/{exploration_id}",
    params(
        ("id" = String, Path, description = "Source identifier"),
        ("user_id" = String, Path, description = "Owning user identifier"),
        ("exploration_id" = String, Path, description = "Exploration identifier")
    ),
    request_body(content = ExplorationRequestBody, description = "Replacement content; optional"),
    responses(
        (status = 204, description = "Exploration updated"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown source or exploration", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["explorations"],
    operation_id = "updateExploration"
)]
#[patch("/sources/{id}/users/{user_id}/explorations/{exploration_id}")]
pub async fn update_exploration(
    state: web::Data<HttpState>,
    path: web::Path<(String, String, String)>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let (_, owner, id) = item_scope(&state, path.into_inner()).await?;
    let draft = parse_optional_json::<ExplorationRequestBody>(&body)?
        .map(draft_from)
        .transpose()?;

    state
        .explorations
        .update(UpdateExplorationRequest { owner, id, draft })
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Delete an exploration.
#[utoipa::path(
    delete,
    path = "/chronograf/v1/sources/{id}/users/{user_id}/explorations/{exploration_id}",
    params(
        ("id" = String, Path, description = "Source identifier"),
        ("user_id" = String, Path, description = "Owning user identifier"),
        ("exploration_id" = String, Path, description = "Exploration identifier")
    ),
    responses(
        (status = 204, description = "Exploration deleted"),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown source or exploration", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["explorations"],
    operation_id = "deleteExploration"
)]
#[delete("/sources/{id}/users/{user_id}/explorations/{exploration_id}")]
pub async fn delete_exploration(
    state: web::Data<HttpState>,
    path: web::Path<(String, String, String)>,
) -> ApiResult<HttpResponse> {
    let (_, owner, id) = item_scope(&state, path.into_inner()).await?;

    state
        .explorations
        .delete(DeleteExplorationRequest { owner, id })
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "explorations_tests.rs"]
mod tests;
