//! Driving port for source listing and backend pass-through.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Error, MonitoredService, Source, SourceId, TimeSeriesQuery};

/// Request to run a query against a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRequest {
    /// Source whose backend runs the query.
    pub source: SourceId,
    /// Query forwarded verbatim.
    pub query: TimeSeriesQuery,
}

/// Use-case port for sources and their time-series backends.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourcesQuery: Send + Sync {
    /// Every configured source.
    async fn list_sources(&self) -> Result<Vec<Source>, Error>;

    /// One source; `not_found` when unknown.
    async fn get_source(&self, id: SourceId) -> Result<Source, Error>;

    /// Execute a query on the source's backend.
    async fn proxy(&self, request: ProxyRequest) -> Result<Value, Error>;

    /// Services discovered on the source's backend.
    async fn monitored_services(&self, id: SourceId) -> Result<Vec<MonitoredService>, Error>;
}
