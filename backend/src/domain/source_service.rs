//! Source lookup and time-series pass-through.
//!
//! Backend failures of any kind collapse to an internal error; the detail is
//! logged, never returned to clients.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::error;

use crate::domain::ports::{ProxyRequest, SourceCatalogue, SourcesQuery, TimeSeries, TimeSeriesError};
use crate::domain::{Error, MonitoredService, Source, SourceId};

fn map_time_series_error(source: SourceId, err: &TimeSeriesError) -> Error {
    error!(%source, error = %err, "time-series backend call failed");
    Error::internal(format!("source {source} backend error: {err}"))
}

/// Service implementing [`SourcesQuery`] over a catalogue and a backend.
#[derive(Clone)]
pub struct SourceService {
    catalogue: Arc<dyn SourceCatalogue>,
    time_series: Arc<dyn TimeSeries>,
}

impl SourceService {
    /// Create a service resolving sources from `catalogue` and querying them
    /// through `time_series`.
    #[must_use]
    pub const fn new(
        catalogue: Arc<dyn SourceCatalogue>,
        time_series: Arc<dyn TimeSeries>,
    ) -> Self {
        Self {
            catalogue,
            time_series,
        }
    }

    fn resolve(&self, id: SourceId) -> Result<Source, Error> {
        self.catalogue
            .find(id)
            .ok_or_else(|| Error::not_found(format!("source {id} not found")))
    }
}

#[async_trait]
impl SourcesQuery for SourceService {
    async fn list_sources(&self) -> Result<Vec<Source>, Error> {
        Ok(self.catalogue.list())
    }

    async fn get_source(&self, id: SourceId) -> Result<Source, Error> {
        self.resolve(id)
    }

    async fn proxy(&self, request: ProxyRequest) -> Result<Value, Error> {
        let ProxyRequest { source, query } = request;
        if query.command.trim().is_empty() {
            return Err(Error::invalid_request("query must not be empty"));
        }
        let resolved = self.resolve(source)?;
        self.time_series
            .execute_query(&resolved, &query)
            .await
            .map_err(|err| map_time_series_error(source, &err))
    }

    async fn monitored_services(&self, id: SourceId) -> Result<Vec<MonitoredService>, Error> {
        let resolved = self.resolve(id)?;
        self.time_series
            .monitored_services(&resolved)
            .await
            .map_err(|err| map_time_series_error(id, &err))
    }
}
