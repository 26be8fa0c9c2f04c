//! Gemini text generation client.

use crate::gemini::{GenerateContentRequest, GenerateContentResponse};
use aprendia_error::{GenerationError, GenerationErrorKind};
use derive_getters::Getters;
use reqwest::Client;
use tracing::{debug, error, instrument};

/// Default Gemini REST endpoint.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default Gemini model.
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Connection settings for the Gemini API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct GeminiConfig {
    /// API key sent as `x-goog-api-key`
    api_key: String,
    /// Model identifier, e.g. "gemini-2.5-flash"
    #[builder(default = "GEMINI_DEFAULT_MODEL.to_string()")]
    model: String,
    /// REST base URL without trailing slash
    #[builder(default = "GEMINI_BASE_URL.to_string()")]
    base_url: String,
    /// Upper bound on generated tokens
    #[builder(default = "Some(2048)")]
    max_output_tokens: Option<u32>,
}

impl GeminiConfig {
    /// Creates a new builder for GeminiConfig.
    pub fn builder() -> GeminiConfigBuilder {
        GeminiConfigBuilder::default()
    }

    /// Default model and endpoint with the given key.
    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: GEMINI_DEFAULT_MODEL.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
            max_output_tokens: Some(2048),
        }
    }
}

/// Client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Creates a new Gemini client.
    #[instrument(skip(config), fields(model = %config.model()))]
    pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
        if config.api_key().trim().is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::ClientCreation(
                "Gemini API key is empty".to_string(),
            )));
        }
        let client = Client::builder().build().map_err(|e| {
            GenerationError::new(GenerationErrorKind::ClientCreation(e.to_string()))
        })?;

        debug!(model = %config.model(), url = %config.base_url(), "Created Gemini client");

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url().trim_end_matches('/'),
            self.config.model()
        )
    }

    /// Generates text for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the provider answers with a
    /// non-success status, or the first candidate carries no text.
    #[instrument(
        skip(self, prompt),
        fields(model = %self.config.model(), prompt_len = prompt.len())
    )]
    pub async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request =
            GenerateContentRequest::from_prompt(prompt, *self.config.max_output_tokens());

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.config.api_key())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Gemini request failed");
                GenerationError::new(GenerationErrorKind::ApiRequest(e.to_string()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = %status, error = %message, "Gemini API error");
            return Err(GenerationError::new(GenerationErrorKind::HttpError {
                status_code: status.as_u16(),
                message,
            }));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse Gemini response");
            GenerationError::new(GenerationErrorKind::ResponseParsing(e.to_string()))
        })?;

        let text = body.first_text().ok_or_else(|| {
            let reason = body
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone())
                .unwrap_or_else(|| "no candidates".to_string());
            GenerationError::new(GenerationErrorKind::EmptyResponse(format!(
                "generated text ({})",
                reason
            )))
        })?;

        debug!(chars = text.len(), "Received Gemini response");
        Ok(text)
    }

    /// Returns the model name.
    pub fn model_name(&self) -> &str {
        self.config.model()
    }
}
