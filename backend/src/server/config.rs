//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::Key;
use yt2mp3::config::AppConfig;
use yt2mp3::domain::ConversionService;
use yt2mp3::inbound::http::state::HttpState;
use yt2mp3::outbound::google::GoogleIdentityProvider;
use yt2mp3::outbound::rapidapi::RapidApiSource;

/// Everything the server factory needs to build an app per worker.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) http_state: HttpState,
}

impl ServerConfig {
    /// Construct a server configuration from already-built parts.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, bind_addr: SocketAddr, http_state: HttpState) -> Self {
        Self {
            key,
            cookie_secure,
            bind_addr,
            http_state,
        }
    }

    /// Build the outbound adapters described by `config` and wire them into
    /// the HTTP state.
    ///
    /// # Errors
    ///
    /// Returns [`std::io::Error`] when an HTTP client cannot be constructed.
    pub fn from_app_config(config: &AppConfig) -> std::io::Result<Self> {
        let source = RapidApiSource::new(&config.conversion).map_err(std::io::Error::other)?;
        let identity = GoogleIdentityProvider::new(&config.google).map_err(std::io::Error::other)?;
        let http_state = HttpState::new(
            Arc::new(ConversionService::new(Arc::new(source))),
            Arc::new(identity),
        );
        Ok(Self::new(
            config.session.key.clone(),
            config.session.cookie_secure,
            config.bind_addr,
            http_state,
        ))
    }
}
