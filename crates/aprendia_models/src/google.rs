//! Google-backed [`GenerationClient`]: Gemini for text, Cloud TTS for speech.

use crate::gemini::{GeminiClient, GeminiConfig};
use crate::tts::{TextToSpeechClient, TextToSpeechConfig};
use aprendia_error::AprendiaResult;
use aprendia_interface::GenerationClient;
use async_trait::async_trait;
use tracing::instrument;

/// Pairs a Gemini text client with a Text-to-Speech client.
#[derive(Debug, Clone)]
pub struct GoogleGenerationClient {
    text: GeminiClient,
    speech: TextToSpeechClient,
}

impl GoogleGenerationClient {
    /// Creates both underlying clients.
    pub fn new(text: GeminiConfig, speech: TextToSpeechConfig) -> AprendiaResult<Self> {
        Ok(Self {
            text: GeminiClient::new(text)?,
            speech: TextToSpeechClient::new(speech)?,
        })
    }

    /// Creates a client using one API key for both services.
    pub fn from_api_key(api_key: impl Into<String>) -> AprendiaResult<Self> {
        let api_key = api_key.into();
        Self::new(
            GeminiConfig::with_key(api_key.clone()),
            TextToSpeechConfig::with_key(api_key),
        )
    }

    /// The Gemini model in use.
    pub fn model_name(&self) -> &str {
        self.text.model_name()
    }
}

#[async_trait]
impl GenerationClient for GoogleGenerationClient {
    #[instrument(skip(self, prompt), fields(provider = "google"))]
    async fn generate_text(&self, prompt: &str) -> AprendiaResult<String> {
        Ok(self.text.generate(prompt).await?)
    }

    #[instrument(skip(self, text), fields(provider = "google"))]
    async fn synthesize_speech(&self, locale: &str, text: &str) -> AprendiaResult<Vec<u8>> {
        Ok(self.speech.synthesize(locale, text).await?)
    }

    fn provider_name(&self) -> &'static str {
        "google"
    }
}
