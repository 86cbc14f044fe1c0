//! Environment-variable configuration helpers

use std::str::FromStr;

/// Read `key` from the environment, treating a blank value as unset
pub fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Read `key` from the environment, falling back to `default` when unset or empty
pub fn env_or(key: &str, default: &str) -> String {
    env_non_empty(key).unwrap_or_else(|| default.to_string())
}

/// Read and parse `key` from the environment
///
/// Returns `None` when the variable is unset; a value that fails to parse is
/// logged and also yields `None` so callers keep their defaults.
pub fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring unparseable value for {}: {:?}", key, raw);
            None
        }
    }
}
