//! URL utilities for building Gemini API endpoints

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use pvai::utils::url::normalize_base_url;
///
/// assert_eq!(
///     normalize_base_url("https://generativelanguage.googleapis.com/v1beta/"),
///     "https://generativelanguage.googleapis.com/v1beta"
/// );
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Construct a complete API endpoint URL from a base URL and endpoint path
///
/// # Examples
///
/// ```
/// use pvai::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://generativelanguage.googleapis.com/v1beta/", "/models"),
///     "https://generativelanguage.googleapis.com/v1beta/models"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// URL of a custom method on a model resource, e.g. `models/{model}:generateContent`.
///
/// Accepts the model either bare or with its `models/` prefix.
pub fn model_action_url(base_url: &str, model: &str, action: &str) -> String {
    let model = model.strip_prefix("models/").unwrap_or(model);
    construct_api_url(base_url, &format!("models/{model}:{action}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://generativelanguage.googleapis.com/v1beta"),
            "https://generativelanguage.googleapis.com/v1beta"
        );

        assert_eq!(
            normalize_base_url("http://localhost:8080///"),
            "http://localhost:8080"
        );

        assert_eq!(normalize_base_url(""), "");
    }

    #[test]
    fn test_construct_api_url() {
        assert_eq!(
            construct_api_url("https://generativelanguage.googleapis.com/v1beta", "models"),
            "https://generativelanguage.googleapis.com/v1beta/models"
        );

        // Slashes on both sides collapse to one
        assert_eq!(
            construct_api_url("http://localhost:8080/v1beta//", "//models"),
            "http://localhost:8080/v1beta/models"
        );
    }

    #[test]
    fn test_model_action_url() {
        assert_eq!(
            model_action_url(
                "https://generativelanguage.googleapis.com/v1beta/",
                "gemini-2.0-flash-exp",
                "generateContent"
            ),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash-exp:generateContent"
        );

        assert_eq!(
            model_action_url("http://localhost:8080", "models/gemini-pro", "generateContent"),
            "http://localhost:8080/models/gemini-pro:generateContent"
        );
    }
}
