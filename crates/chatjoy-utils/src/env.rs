//! Environment variable helpers

use std::str::FromStr;

/// Load a `.env` file from the working directory if one exists
///
/// Returns `true` when a file was loaded.
pub fn load_dotenv() -> bool {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!("Loaded environment from {}", path.display());
            true
        }
        Err(_) => false,
    }
}

/// Read a variable, treating unset and blank values alike
pub fn var_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read and parse a variable
///
/// Unparseable values are logged and ignored.
pub fn var_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = var_opt(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {key}={raw}: not a valid value");
            None
        }
    }
}
