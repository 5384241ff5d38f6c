//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod exploration_command;
mod exploration_query;
mod exploration_repository;
mod source_catalogue;
mod sources_query;
mod time_series;

#[cfg(test)]
pub use exploration_command::MockExplorationCommand;
pub use exploration_command::{
    CreateExplorationRequest, DeleteExplorationRequest, ExplorationCommand,
    UpdateExplorationRequest,
};
#[cfg(test)]
pub use exploration_query::MockExplorationQuery;
pub use exploration_query::{
    ExplorationPayload, ExplorationQuery, GetExplorationRequest, ListExplorationsRequest,
};
#[cfg(test)]
pub use exploration_repository::MockExplorationRepository;
pub use exploration_repository::{ExplorationRepository, ExplorationRepositoryError};
#[cfg(test)]
pub use source_catalogue::MockSourceCatalogue;
pub use source_catalogue::SourceCatalogue;
#[cfg(test)]
pub use sources_query::MockSourcesQuery;
pub use sources_query::{ProxyRequest, SourcesQuery};
#[cfg(test)]
pub use time_series::MockTimeSeries;
pub use time_series::{TimeSeries, TimeSeriesError};
