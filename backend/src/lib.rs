//! Exploration service library modules.
//!
//! The crate follows a hexagonal layout: [`domain`] holds entities, services
//! and ports; [`inbound`] adapts HTTP requests onto driving ports; and
//! [`outbound`] implements driven ports against storage and time-series
//! backends. [`settings`] carries the process configuration.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
