//! Domain primitives, services and ports.
//!
//! Purpose: define the exploration aggregate, source configuration types and
//! the services implementing the driving ports. Types here stay free of
//! transport concerns; inbound adapters shape them into HTTP payloads.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: structured error payload shared by adapters.
//! - [`Exploration`], [`ExplorationDraft`]: the exploration aggregate.
//! - [`ExplorationService`]: exploration lifecycle over a repository port.
//! - [`SourceService`]: source lookup and time-series pass-through.
//! - [`TraceId`]: request-scoped correlation identifier.

pub mod error;
pub mod exploration;
pub mod exploration_service;
pub mod ids;
pub mod links;
pub mod ports;
pub mod source;
pub mod source_service;
pub mod trace_id;

pub use self::error::{DomainError as Error, ErrorCode};
pub use self::exploration::{Exploration, ExplorationDraft, ExplorationValidationError};
pub use self::exploration_service::ExplorationService;
pub use self::ids::{ExplorationId, SourceId, UserId};
pub use self::source::{MonitoredService, Source, TimeSeriesQuery};
pub use self::source_service::SourceService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
