//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ConversionCommand, IdentityProvider};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Conversion use-case behind `POST /convert-mp3`.
    pub conversion: Arc<dyn ConversionCommand>,
    /// Identity provider behind the `/auth/google` routes.
    pub identity: Arc<dyn IdentityProvider>,
}

impl HttpState {
    /// Bundle the ports used by the handlers.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use url::Url;
    /// use yt2mp3::domain::ports::{FixtureConversionCommand, FixtureIdentityProvider};
    /// use yt2mp3::inbound::http::state::HttpState;
    ///
    /// let callback = Url::parse("http://localhost:3000/auth/google/callback").expect("url");
    /// let state = HttpState::new(
    ///     Arc::new(FixtureConversionCommand),
    ///     Arc::new(FixtureIdentityProvider::new(callback)),
    /// );
    /// let _conversion = state.conversion.clone();
    /// ```
    pub fn new(
        conversion: Arc<dyn ConversionCommand>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            conversion,
            identity,
        }
    }
}
