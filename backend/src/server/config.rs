//! HTTP server configuration object and helpers.

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use campaign_auth::domain::LoginPath;
use campaign_auth::inbound::http::session_config::SessionSettings;
use std::net::SocketAddr;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) session_ttl: Duration,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) login_path: LoginPath,
}

impl ServerConfig {
    /// Construct a server configuration from validated session settings.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
            ttl,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            session_ttl: ttl,
            bind_addr,
            login_path: LoginPath::default(),
        }
    }

    /// Redirect unauthenticated browsers to `login_path`.
    #[must_use]
    pub fn with_login_path(mut self, login_path: LoginPath) -> Self {
        self.login_path = login_path;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
