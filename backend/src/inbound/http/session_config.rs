//! Session configuration parsing and validation.
//!
//! This module centralises the environment-driven session settings so they are
//! validated consistently and can be tested in isolation.

use actix_web::cookie::Key;
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

pub mod fingerprint;
mod parsing;

use parsing::{BoolEnvConfig, parse_bool_env};

/// Variable holding the secret the session key is derived from.
pub const SESSION_SECRET_ENV: &str = "SESSION_SECRET";
/// Variable toggling the `Secure` attribute on the session cookie.
pub const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
/// Shortest secret accepted for key derivation.
pub const SESSION_SECRET_MIN_LEN: usize = 32;

/// Build mode for configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for bad toggles.
    Debug,
    /// Release builds require valid settings and a real session secret.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yt2mp3::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    pub(crate) fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Session settings derived from configuration toggles.
#[derive(Clone)]
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv {
        /// Variable name.
        name: &'static str,
    },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
        /// Accepted values.
        expected: &'static str,
    },
    /// The session secret is too short to derive a key from.
    #[error("SESSION_SECRET too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        /// Length of the supplied secret in bytes.
        length: usize,
        /// Minimum accepted length in bytes.
        min_len: usize,
    },
}

/// Build session settings from environment variables and build mode.
///
/// # Errors
///
/// Release builds fail when `SESSION_SECRET` is missing or shorter than
/// [`SESSION_SECRET_MIN_LEN`], or when `SESSION_COOKIE_SECURE` is not a
/// boolean. Debug builds fall back to a temporary key and secure cookies.
///
/// # Examples
///
/// ```rust
/// use yt2mp3::inbound::http::session_config::{BuildMode, session_settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "SESSION_SECRET" => Some("a".repeat(64)),
///     "SESSION_COOKIE_SECURE" => Some("1".to_owned()),
///     _ => None,
/// });
///
/// let settings = session_settings_from_env(&env, BuildMode::Release).expect("valid settings");
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = parse_bool_env(env, mode, BoolEnvConfig::new(COOKIE_SECURE_ENV, true))?;
    if !cookie_secure {
        warn!("session cookies are not marked Secure; use only behind plain HTTP in development");
    }
    let key = session_key_from_env(env, mode)?;

    Ok(SessionSettings { key, cookie_secure })
}

fn session_key_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Key, SessionConfigError> {
    let Some(mut secret) = env.string(SESSION_SECRET_ENV) else {
        if mode.is_debug() {
            warn!("SESSION_SECRET not set; using temporary session key (dev only)");
            return Ok(Key::generate());
        }
        return Err(SessionConfigError::MissingEnv {
            name: SESSION_SECRET_ENV,
        });
    };

    let length = secret.len();
    if length < SESSION_SECRET_MIN_LEN {
        secret.zeroize();
        if mode.is_debug() {
            warn!(
                length,
                min_len = SESSION_SECRET_MIN_LEN,
                "SESSION_SECRET too short; using temporary session key (dev only)"
            );
            return Ok(Key::generate());
        }
        return Err(SessionConfigError::SecretTooShort {
            length,
            min_len: SESSION_SECRET_MIN_LEN,
        });
    }

    let key = Key::derive_from(secret.as_bytes());
    secret.zeroize();
    Ok(key)
}
