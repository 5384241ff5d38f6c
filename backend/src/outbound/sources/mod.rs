//! Configuration-backed source catalogue.

use crate::domain::ports::SourceCatalogue;
use crate::domain::{Source, SourceId};

/// Fixed set of sources resolved at startup.
///
/// # Examples
/// ```
/// use chronograf::domain::SourceId;
/// use chronograf::domain::ports::SourceCatalogue;
/// use chronograf::outbound::sources::StaticSourceCatalogue;
///
/// let catalogue = StaticSourceCatalogue::new(Vec::new());
/// assert!(catalogue.find(SourceId::new(1)).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticSourceCatalogue {
    sources: Vec<Source>,
}

impl StaticSourceCatalogue {
    /// Build a catalogue over `sources`, ordered by identifier.
    #[must_use]
    pub fn new(mut sources: Vec<Source>) -> Self {
        sources.sort_by_key(|source| source.id);
        Self { sources }
    }
}

impl SourceCatalogue for StaticSourceCatalogue {
    fn list(&self) -> Vec<Source> {
        self.sources.clone()
    }

    fn find(&self, id: SourceId) -> Option<Source> {
        self.sources.iter().find(|source| source.id == id).cloned()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use url::Url;

    fn source(id: u64) -> Source {
        Source {
            id: SourceId::new(id),
            name: format!("influx {id}"),
            kind: "influx".to_owned(),
            url: Url::parse("http://localhost:8086").expect("valid url"),
            username: None,
            password: None,
            monitored_database: "telegraf".to_owned(),
        }
    }

    #[rstest]
    fn lists_sources_by_identifier() {
        let catalogue = StaticSourceCatalogue::new(vec![source(3), source(1)]);
        let ids: Vec<u64> = catalogue.list().iter().map(|s| s.id.get()).collect();
        assert_eq!(ids, [1, 3]);
    }

    #[rstest]
    #[case(1, true)]
    #[case(2, false)]
    fn finds_only_configured_sources(#[case] id: u64, #[case] expected: bool) {
        let catalogue = StaticSourceCatalogue::new(vec![source(1)]);
        assert_eq!(catalogue.find(SourceId::new(id)).is_some(), expected);
    }
}
