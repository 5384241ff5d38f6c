//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: exploration stores (in-memory and JSON file)
//! - **influx**: InfluxDB HTTP client behind the time-series port
//! - **sources**: configuration-backed source catalogue
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod influx;
pub mod persistence;
pub mod sources;
