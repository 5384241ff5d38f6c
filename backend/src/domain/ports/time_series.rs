//! Driven port for time-series backends.
//!
//! The domain never interprets query text or result payloads; results are
//! passed through as opaque JSON.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{MonitoredService, Source, TimeSeriesQuery};

use super::define_port_error;

define_port_error! {
    /// Errors raised by time-series adapters.
    pub enum TimeSeriesError {
        /// The backend could not be reached.
        Transport {
            /// Client-side failure description.
            message: String,
        } => "time-series transport failed: {message}",
        /// The backend did not answer in time.
        Timeout {
            /// Client or gateway timeout message.
            message: String,
        } => "time-series request timed out: {message}",
        /// The backend answered with an error.
        Rejected {
            /// Backend error text or a status with a body preview.
            message: String,
        } => "time-series backend rejected the request: {message}",
        /// The backend answered with an undecodable payload.
        Decode {
            /// Decoder message.
            message: String,
        } => "time-series response could not be decoded: {message}",
    }
}

/// Port executing queries and discovering services on a source.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TimeSeries: Send + Sync {
    /// Execute `query` against `source` and return its raw results.
    async fn execute_query(
        &self,
        source: &Source,
        query: &TimeSeriesQuery,
    ) -> Result<Value, TimeSeriesError>;

    /// List the services the source is monitoring.
    async fn monitored_services(
        &self,
        source: &Source,
    ) -> Result<Vec<MonitoredService>, TimeSeriesError>;
}
