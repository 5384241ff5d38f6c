//! Reqwest-backed InfluxDB client.
//!
//! This adapter owns transport details only: request construction, timeout
//! and HTTP error mapping, and JSON decoding. Query results are returned
//! untouched.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::dto::{QueryResponseDto, StatementDto};
use crate::domain::ports::{TimeSeries, TimeSeriesError};
use crate::domain::{MonitoredService, Source, TimeSeriesQuery};

const MONITORED_SERVICES_QUERY: &str = r#"SHOW TAG VALUES WITH KEY IN ("host", "app")"#;

/// InfluxDB 1.x HTTP client shared by every configured source.
pub struct InfluxHttpClient {
    client: Client,
}

impl InfluxHttpClient {
    /// Build a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    async fn query(
        &self,
        source: &Source,
        query: &TimeSeriesQuery,
    ) -> Result<Vec<Value>, TimeSeriesError> {
        let endpoint = query_endpoint(&source.url)?;
        let mut params = vec![("q", query.command.as_str())];
        if let Some(db) = query.database.as_deref() {
            params.push(("db", db));
        }
        if let Some(rp) = query.retention_policy.as_deref() {
            params.push(("rp", rp));
        }

        let mut request = self.client.get(endpoint).query(&params);
        if let Some(username) = source.username.as_deref() {
            request = request.basic_auth(username, source.password.as_deref());
        }

        debug!(source = %source.id, db = ?query.database, "forwarding time-series query");
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_results(body.as_ref())
    }
}

#[async_trait]
impl TimeSeries for InfluxHttpClient {
    async fn execute_query(
        &self,
        source: &Source,
        query: &TimeSeriesQuery,
    ) -> Result<Value, TimeSeriesError> {
        self.query(source, query).await.map(Value::Array)
    }

    async fn monitored_services(
        &self,
        source: &Source,
    ) -> Result<Vec<MonitoredService>, TimeSeriesError> {
        let query = TimeSeriesQuery {
            command: MONITORED_SERVICES_QUERY.to_owned(),
            database: Some(source.monitored_database.clone()),
            retention_policy: None,
        };
        let results = self.query(source, &query).await?;
        parse_services(results)
    }
}

fn query_endpoint(base: &Url) -> Result<Url, TimeSeriesError> {
    let mut endpoint = base.clone();
    endpoint
        .path_segments_mut()
        .map_err(|()| TimeSeriesError::transport(format!("{base} cannot be a base URL")))?
        .pop_if_empty()
        .push("query");
    Ok(endpoint)
}

fn parse_results(body: &[u8]) -> Result<Vec<Value>, TimeSeriesError> {
    let decoded: QueryResponseDto = serde_json::from_slice(body).map_err(|error| {
        TimeSeriesError::decode(format!("invalid InfluxDB JSON payload: {error}"))
    })?;
    let QueryResponseDto { results, error } = decoded;
    error.map_or(Ok(results), |message| Err(TimeSeriesError::rejected(message)))
}

fn parse_services(results: Vec<Value>) -> Result<Vec<MonitoredService>, TimeSeriesError> {
    let mut services = Vec::new();
    for result in results {
        let statement: StatementDto = serde_json::from_value(result)
            .map_err(|error| TimeSeriesError::decode(format!("invalid statement: {error}")))?;
        if let Some(error) = statement.error {
            return Err(TimeSeriesError::rejected(error));
        }
        for series in statement.series {
            services.extend(series.into_services().map_err(TimeSeriesError::decode)?);
        }
    }
    Ok(services)
}

fn map_transport_error(error: reqwest::Error) -> TimeSeriesError {
    if error.is_timeout() {
        TimeSeriesError::timeout(error.to_string())
    } else {
        TimeSeriesError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> TimeSeriesError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            TimeSeriesError::timeout(message)
        }
        _ if status.is_client_error() => TimeSeriesError::rejected(message),
        _ => TimeSeriesError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
