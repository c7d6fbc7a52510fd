//! Commentary client: asks a Gemini model what it makes of the relayed data.
//!
//! The relay only sees the [`Commentator`] trait. [`GeminiClient`] is the
//! production implementation; its [`Commentator::generate_content`] never
//! fails, it folds every transport or service problem into
//! [`Commentary::Failed`] so the relay loop keeps going.

use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::api::models::{fetch_models, generate_content_models};
use crate::api::{GenerateContentRequest, GenerateContentResponse, GENERATE_CONTENT_METHOD};
use crate::core::api_error::format_api_error;
use crate::utils::auth::add_auth_headers;
use crate::utils::url::model_action_url;

/// Prefix of every commentary produced in place of a failed request.
pub const FAILURE_PREFIX: &str = "Something went wrong with the Gemini API call";

/// Text produced for one request: the model's answer, or a rendered failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commentary {
    Text(String),
    Failed(String),
}

impl Commentary {
    pub fn failed(reason: impl fmt::Display) -> Self {
        Commentary::Failed(format!("{FAILURE_PREFIX}: {reason}"))
    }

    pub fn text(&self) -> &str {
        match self {
            Commentary::Text(text) | Commentary::Failed(text) => text,
        }
    }

    #[cfg(test)]
    pub fn is_failure(&self) -> bool {
        matches!(self, Commentary::Failed(_))
    }
}

impl fmt::Display for Commentary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Source of commentary for the relay.
#[async_trait]
pub trait Commentator: Send + Sync {
    async fn generate_content(&self, text: &str) -> Commentary;
}

/// Errors that prevent the commentary client from starting.
#[derive(Debug)]
pub enum ClientError {
    /// The HTTP client could not be constructed.
    Http(reqwest::Error),

    /// The model catalogue could not be fetched.
    ModelListing(String),

    /// The configured model is not among the `generateContent` models.
    UnsupportedModel {
        model: String,
        available: Vec<String>,
    },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Http(source) => write!(f, "Failed to create HTTP client: {source}"),
            ClientError::ModelListing(reason) => {
                write!(f, "Failed to list available models: {reason}")
            }
            ClientError::UnsupportedModel { model, available } => {
                if available.is_empty() {
                    write!(
                        f,
                        "Model {model} is not supported. No models supporting {GENERATE_CONTENT_METHOD} are available!"
                    )
                } else {
                    write!(
                        f,
                        "Model {model} is not supported. Available models are: {}!",
                        available.join(", ")
                    )
                }
            }
        }
    }
}

impl StdError for ClientError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ClientError::Http(source) => Some(source),
            ClientError::ModelListing(_) | ClientError::UnsupportedModel { .. } => None,
        }
    }
}

/// Check `model` against the catalogue of `generateContent`-capable models.
pub fn ensure_model_supported(model: &str, available: Vec<String>) -> Result<(), ClientError> {
    if available.iter().any(|candidate| candidate == model) {
        Ok(())
    } else {
        Err(ClientError::UnsupportedModel {
            model: model.to_string(),
            available,
        })
    }
}

/// Gemini `generateContent` client bound to one model.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Connect and verify that `model` supports free-form text generation.
    pub async fn initialize(
        model: &str,
        api_key: String,
        base_url: &str,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(ClientError::Http)?;

        let models = fetch_models(&client, base_url, &api_key)
            .await
            .map_err(|err| ClientError::ModelListing(err.to_string()))?;
        let available = generate_content_models(&models);
        debug!(count = available.len(), "generateContent models available");
        ensure_model_supported(model, available)?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            api_key,
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request_content(&self, text: &str) -> Result<String, String> {
        let url = model_action_url(&self.base_url, &self.model, GENERATE_CONTENT_METHOD);
        let request = GenerateContentRequest::from_text(text);

        let response = add_auth_headers(self.client.post(url), &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| err.to_string())?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(format_api_error(status, &error_text));
        }

        let body = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|err| format!("unreadable response: {err}"))?;
        commentary_from_response(&body)
    }
}

/// Pull the commentary text out of a successful response body.
pub fn commentary_from_response(response: &GenerateContentResponse) -> Result<String, String> {
    if let Some(reason) = response.block_reason() {
        return Err(format!("the prompt was blocked ({reason})"));
    }

    response.first_candidate_text().ok_or_else(|| {
        match response
            .candidates
            .first()
            .and_then(|candidate| candidate.finish_reason.as_deref())
        {
            Some(reason) => format!("the response contained no text (finish reason {reason})"),
            None => "the response contained no text".to_string(),
        }
    })
}

#[async_trait]
impl Commentator for GeminiClient {
    async fn generate_content(&self, text: &str) -> Commentary {
        debug!(model = %self.model, bytes = text.len(), "requesting commentary");
        match self.request_content(text).await {
            Ok(answer) => Commentary::Text(answer),
            Err(reason) => {
                warn!(model = %self.model, "commentary request failed");
                Commentary::failed(reason)
            }
        }
    }
}
