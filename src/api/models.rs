use crate::api::{ModelInfo, ModelsResponse, GENERATE_CONTENT_METHOD};
use crate::utils::auth::add_auth_headers;
use crate::utils::url::construct_api_url;
use tracing::debug;

const MODELS_PAGE_SIZE: &str = "1000";

/// Fetch one page of the model catalogue.
pub async fn fetch_models_page(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    page_token: Option<&str>,
) -> Result<ModelsResponse, Box<dyn std::error::Error + Send + Sync>> {
    let models_url = construct_api_url(base_url, "models");
    let mut request = client
        .get(models_url)
        .query(&[("pageSize", MODELS_PAGE_SIZE)]);
    if let Some(token) = page_token {
        request = request.query(&[("pageToken", token)]);
    }

    let response = add_auth_headers(request, api_key).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(format!("API request failed with status {status}: {error_text}").into());
    }

    Ok(response.json::<ModelsResponse>().await?)
}

/// Fetch every model the service advertises, following page tokens.
pub async fn fetch_models(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
) -> Result<Vec<ModelInfo>, Box<dyn std::error::Error + Send + Sync>> {
    let mut models = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = fetch_models_page(client, base_url, api_key, page_token.as_deref()).await?;
        debug!(count = page.models.len(), "fetched model page");
        models.extend(page.models);

        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }

    Ok(models)
}

/// Identifiers of the models that accept free-form `generateContent` calls.
pub fn generate_content_models(models: &[ModelInfo]) -> Vec<String> {
    let mut ids: Vec<String> = models
        .iter()
        .filter(|model| model.supports(GENERATE_CONTENT_METHOD))
        .map(|model| model.id().to_string())
        .collect();
    ids.sort();
    ids.dedup();
    ids
}
