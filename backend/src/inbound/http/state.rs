//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ExplorationCommand, ExplorationQuery, SourcesQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Exploration mutations.
    pub explorations: Arc<dyn ExplorationCommand>,
    /// Exploration reads.
    pub explorations_query: Arc<dyn ExplorationQuery>,
    /// Source lookup, proxy and discovery.
    pub sources: Arc<dyn SourcesQuery>,
}

impl HttpState {
    /// Construct state from the port implementations.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use chronograf::domain::{ExplorationService, SourceService};
    /// use chronograf::inbound::http::state::HttpState;
    /// use chronograf::outbound::influx::InfluxHttpClient;
    /// use chronograf::outbound::persistence::InMemoryExplorationRepository;
    /// use chronograf::outbound::sources::StaticSourceCatalogue;
    /// use mockable::DefaultClock;
    ///
    /// let explorations = Arc::new(ExplorationService::new(
    ///     Arc::new(InMemoryExplorationRepository::new()),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let client = InfluxHttpClient::new(std::time::Duration::from_secs(5)).expect("client");
    /// let sources = Arc::new(SourceService::new(
    ///     Arc::new(StaticSourceCatalogue::new(Vec::new())),
    ///     Arc::new(client),
    /// ));
    /// let state = HttpState::new(explorations.clone(), explorations, sources);
    /// let _query = state.explorations_query.clone();
    /// ```
    #[must_use]
    pub const fn new(
        explorations: Arc<dyn ExplorationCommand>,
        explorations_query: Arc<dyn ExplorationQuery>,
        sources: Arc<dyn SourcesQuery>,
    ) -> Self {
        Self {
            explorations,
            explorations_query,
            sources,
        }
    }
}
