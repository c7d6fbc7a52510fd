//! Authentication utilities for API requests

/// Header the Gemini API reads the API key from.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Attach the API key to an outgoing request.
///
/// The key is sent as a header, never as the `key=` query parameter.
pub fn add_auth_headers(
    request: reqwest::RequestBuilder,
    api_key: &str,
) -> reqwest::RequestBuilder {
    request
        .header(API_KEY_HEADER, api_key)
        .header("Content-Type", "application/json")
}
