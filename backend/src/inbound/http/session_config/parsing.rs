//! Environment parsing helpers for session configuration.

use mockable::Env;
use tracing::warn;

use super::{BuildMode, SessionConfigError};

pub(crate) const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";

/// Configuration for parsing a boolean environment variable.
pub(crate) struct BoolEnvConfig {
    name: &'static str,
    default_value: bool,
}

impl BoolEnvConfig {
    pub(crate) const fn new(name: &'static str, default_value: bool) -> Self {
        Self {
            name,
            default_value,
        }
    }
}

/// Read a boolean toggle. Missing values take the default; malformed values
/// fall back to it in debug builds and are rejected in release builds.
pub(crate) fn parse_bool_env<E: Env>(
    env: &E,
    mode: BuildMode,
    config: BoolEnvConfig,
) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(config.name) else {
        return Ok(config.default_value);
    };
    if let Some(flag) = parse_bool(&value) {
        return Ok(flag);
    }
    let default_label = if config.default_value {
        "enabled"
    } else {
        "disabled"
    };
    let value_clone = value.clone();
    debug_warn_or_error(
        mode,
        config.default_value,
        SessionConfigError::InvalidEnv {
            name: config.name,
            value: value_clone,
            expected: BOOL_EXPECTED,
        },
        || {
            warn!(
                value = %value,
                "invalid {}; defaulting to {}",
                config.name,
                default_label
            );
        },
    )
}

pub(crate) fn debug_warn_or_error<T, F>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
    warn_fn: F,
) -> Result<T, SessionConfigError>
where
    F: FnOnce(),
{
    if mode.is_debug() {
        warn_fn();
        Ok(fallback)
    } else {
        Err(error)
    }
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
