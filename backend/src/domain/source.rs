//! Time-series source configuration and discovered services.
//!
//! Sources are read-only configuration: the domain resolves them by id and
//! hands them to the time-series port, but never mutates them.

use url::Url;

use super::SourceId;

/// A configured time-series backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Source identifier used in resource paths.
    pub id: SourceId,
    /// Display name.
    pub name: String,
    /// Backend flavour, e.g. `influx` or `influx-enterprise`.
    pub kind: String,
    /// Base URL of the backend HTTP API.
    pub url: Url,
    /// Basic-auth user name, when the backend requires one.
    pub username: Option<String>,
    /// Basic-auth password. Never rendered in responses.
    pub password: Option<String>,
    /// Database queried for monitored service discovery.
    pub monitored_database: String,
}

/// Query forwarded verbatim to a time-series backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSeriesQuery {
    /// Query text in the backend's own language.
    pub command: String,
    /// Target database, when the query does not name one.
    pub database: Option<String>,
    /// Target retention policy.
    pub retention_policy: Option<String>,
}

/// A service discovered through the backend's tag index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoredService {
    /// Tag key identifying the service, e.g. `host`.
    pub tag_key: String,
    /// Tag value, e.g. `server01`.
    pub tag_value: String,
    /// Measurement the tag was found on.
    pub kind: String,
}
