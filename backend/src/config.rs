//! Application configuration read once at startup.
//!
//! Every adapter receives its settings from [`AppConfig`] by reference; nothing
//! below the entry point reads the process environment. Values come through
//! [`mockable::Env`] so tests can inject a `MockEnv`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use mockable::Env;
use tracing::warn;
use url::Url;

use crate::inbound::http::session_config::{
    BuildMode, SessionConfigError, SessionSettings, session_settings_from_env,
};
use crate::outbound::google::GoogleOAuthSettings;
use crate::outbound::rapidapi::{DEFAULT_CONVERSION_ENDPOINT, RapidApiSettings};

/// Listen port.
pub const PORT_ENV: &str = "PORT";
/// Listen address.
pub const BIND_ADDR_ENV: &str = "BIND_ADDR";
/// RapidAPI application key.
pub const API_KEY_ENV: &str = "API_KEY";
/// RapidAPI host header value.
pub const API_HOST_ENV: &str = "API_HOST";
/// Conversion endpoint override.
pub const CONVERSION_API_URL_ENV: &str = "CONVERSION_API_URL";
/// Google OAuth client id.
pub const GOOGLE_CLIENT_ID_ENV: &str = "GOOGLE_CLIENT_ID";
/// Google OAuth client secret.
pub const GOOGLE_CLIENT_SECRET_ENV: &str = "GOOGLE_CLIENT_SECRET";
/// Redirect URI registered with Google.
pub const GOOGLE_CALLBACK_URL_ENV: &str = "GOOGLE_CALLBACK_URL";

/// Port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3000;

/// Errors that stop the service from starting.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A required variable is missing or blank.
    #[error("missing required environment variable: {name}")]
    MissingEnv {
        /// Variable name.
        name: &'static str,
    },
    /// A variable is present but malformed.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
        /// What would have been accepted.
        expected: &'static str,
    },
    /// A URL setting does not parse as an absolute URL.
    #[error("invalid URL for {name}: {source}")]
    InvalidUrl {
        /// Setting name.
        name: &'static str,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// Session settings were rejected.
    #[error(transparent)]
    Session(#[from] SessionConfigError),
}

/// Settings for every adapter, validated together.
#[derive(Clone)]
pub struct AppConfig {
    /// Socket the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Conversion API endpoint and credentials.
    pub conversion: RapidApiSettings,
    /// Google OAuth client registration.
    pub google: GoogleOAuthSettings,
    /// Cookie session key and flags.
    pub session: SessionSettings,
}

impl AppConfig {
    /// Read and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required value is missing or any value
    /// is malformed. Missing RapidAPI credentials only produce a warning.
    pub fn from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Self, ConfigError> {
        let port = port_from_env(env)?;
        let ip = bind_ip_from_env(env)?;
        let conversion = conversion_from_env(env)?;
        let google = google_from_env(env, port)?;
        let session = session_settings_from_env(env, mode)?;

        Ok(Self {
            bind_addr: SocketAddr::new(ip, port),
            conversion,
            google,
            session,
        })
    }
}

fn non_blank<E: Env>(env: &E, name: &str) -> Option<String> {
    env.string(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn port_from_env<E: Env>(env: &E) -> Result<u16, ConfigError> {
    let Some(value) = non_blank(env, PORT_ENV) else {
        return Ok(DEFAULT_PORT);
    };
    value.parse().map_err(|_| ConfigError::InvalidEnv {
        name: PORT_ENV,
        value,
        expected: "a port number between 0 and 65535",
    })
}

fn bind_ip_from_env<E: Env>(env: &E) -> Result<IpAddr, ConfigError> {
    let Some(value) = non_blank(env, BIND_ADDR_ENV) else {
        return Ok(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    };
    value.parse().map_err(|_| ConfigError::InvalidEnv {
        name: BIND_ADDR_ENV,
        value,
        expected: "an IPv4 or IPv6 address",
    })
}

fn conversion_from_env<E: Env>(env: &E) -> Result<RapidApiSettings, ConfigError> {
    let endpoint = non_blank(env, CONVERSION_API_URL_ENV)
        .unwrap_or_else(|| DEFAULT_CONVERSION_ENDPOINT.to_owned());
    let endpoint = Url::parse(&endpoint).map_err(|source| ConfigError::InvalidUrl {
        name: CONVERSION_API_URL_ENV,
        source,
    })?;

    let api_key = non_blank(env, API_KEY_ENV);
    if api_key.is_none() {
        warn!("API_KEY not set; conversion requests will be sent without X-RapidAPI-Key");
    }
    let api_host = non_blank(env, API_HOST_ENV);
    if api_host.is_none() {
        warn!("API_HOST not set; conversion requests will be sent without X-RapidAPI-Host");
    }

    Ok(RapidApiSettings {
        endpoint,
        api_key,
        api_host,
    })
}

fn google_from_env<E: Env>(env: &E, port: u16) -> Result<GoogleOAuthSettings, ConfigError> {
    let client_id = non_blank(env, GOOGLE_CLIENT_ID_ENV).ok_or(ConfigError::MissingEnv {
        name: GOOGLE_CLIENT_ID_ENV,
    })?;
    let client_secret =
        non_blank(env, GOOGLE_CLIENT_SECRET_ENV).ok_or(ConfigError::MissingEnv {
            name: GOOGLE_CLIENT_SECRET_ENV,
        })?;
    let callback = non_blank(env, GOOGLE_CALLBACK_URL_ENV)
        .unwrap_or_else(|| format!("http://localhost:{port}/auth/google/callback"));
    let callback_url = Url::parse(&callback).map_err(|source| ConfigError::InvalidUrl {
        name: GOOGLE_CALLBACK_URL_ENV,
        source,
    })?;

    GoogleOAuthSettings::new(client_id, client_secret, callback_url).map_err(|source| {
        ConfigError::InvalidUrl {
            name: "Google OAuth endpoint",
            source,
        }
    })
}
