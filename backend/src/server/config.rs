//! HTTP server configuration object.

use std::net::SocketAddr;

/// Listener settings for [`super::create_server`].
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Configuration binding `bind_addr`.
    #[must_use]
    pub const fn new(bind_addr: SocketAddr) -> Self {
        Self { bind_addr }
    }
}
