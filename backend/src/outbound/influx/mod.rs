//! InfluxDB outbound adapter.
//!
//! Implements the `TimeSeries` port over the InfluxDB 1.x HTTP query API.

mod dto;
mod http_client;

pub use http_client::InfluxHttpClient;
