//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `CHRONOGRAF_*` environment variables and
//! configuration files, in the precedence OrthoConfig defines. The query
//! timeout carries a loader default; the remaining fields are optional and
//! their accessors apply the defaults.

use std::net::{AddrParseError, SocketAddr};
use std::path::Path;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::{Source, SourceId};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8888";
const DEFAULT_SOURCE_NAME: &str = "Influx 1";
const DEFAULT_SOURCE_TYPE: &str = "influx";
const DEFAULT_SOURCE_URL: &str = "http://localhost:8086";
const DEFAULT_MONITORED_DATABASE: &str = "telegraf";

/// Identifier of the single configured source.
pub const CONFIGURED_SOURCE_ID: SourceId = SourceId::new(1);

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The bind address is not a socket address.
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        /// Configured text.
        value: String,
        /// Parser failure.
        #[source]
        source: AddrParseError,
    },
    /// The source URL does not parse.
    #[error("invalid source url {value:?}: {source}")]
    SourceUrl {
        /// Configured text.
        value: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
}

/// Configuration values for the exploration service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CHRONOGRAF")]
pub struct Settings {
    /// Socket address the HTTP server binds.
    pub bind_addr: Option<String>,
    /// JSON file backing the exploration store; in-memory when unset.
    pub store_path: Option<String>,
    /// Display name of the configured source.
    pub source_name: Option<String>,
    /// Backend flavour of the configured source.
    pub source_type: Option<String>,
    /// Base URL of the configured source.
    pub source_url: Option<String>,
    /// Basic-auth user for the configured source.
    pub source_username: Option<String>,
    /// Basic-auth password for the configured source.
    pub source_password: Option<String>,
    /// Database queried for monitored service discovery.
    pub monitored_database: Option<String>,
    /// Upper bound on a single backend request, in seconds.
    #[ortho_config(default = 30)]
    pub query_timeout_secs: u64,
}

impl Settings {
    /// Address the HTTP server binds, defaulting to `0.0.0.0:8888`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Path of the JSON exploration store, if one is configured.
    #[must_use]
    pub fn store_path(&self) -> Option<&Path> {
        self.store_path
            .as_deref()
            .filter(|path| !path.trim().is_empty())
            .map(Path::new)
    }

    /// Backend request timeout, at least one second.
    #[must_use]
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs.max(1))
    }

    /// The configured source, served under id `1`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::SourceUrl`] when the URL does not parse.
    pub fn source(&self) -> Result<Source, SettingsError> {
        let raw_url = self.source_url.as_deref().unwrap_or(DEFAULT_SOURCE_URL);
        let url = Url::parse(raw_url).map_err(|source| SettingsError::SourceUrl {
            value: raw_url.to_owned(),
            source,
        })?;

        Ok(Source {
            id: CONFIGURED_SOURCE_ID,
            name: self
                .source_name
                .clone()
                .unwrap_or_else(|| DEFAULT_SOURCE_NAME.to_owned()),
            kind: self
                .source_type
                .clone()
                .unwrap_or_else(|| DEFAULT_SOURCE_TYPE.to_owned()),
            url,
            username: self.source_username.clone(),
            password: self.source_password.clone(),
            monitored_database: self
                .monitored_database
                .clone()
                .unwrap_or_else(|| DEFAULT_MONITORED_DATABASE.to_owned()),
        })
    }
}
