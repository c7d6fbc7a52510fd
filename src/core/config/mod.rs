pub mod secrets;

use crate::core::constants::DEFAULT_BASE_URL;
use crate::utils::url::normalize_base_url;

/// Environment variable overriding the Gemini endpoint.
pub const BASE_URL_ENV_VAR: &str = "GEMINI_BASE_URL";

/// Resolve the API base URL from the raw `GEMINI_BASE_URL` value.
pub fn resolve_base_url(env_value: Option<&str>) -> String {
    match env_value.map(str::trim) {
        Some(value) if !value.is_empty() => normalize_base_url(value),
        _ => DEFAULT_BASE_URL.to_string(),
    }
}
