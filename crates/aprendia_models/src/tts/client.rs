//! Cloud Text-to-Speech client.

use crate::tts::{
    AudioConfig, SynthesisInput, SynthesizeSpeechRequest, SynthesizeSpeechResponse,
    VoiceSelectionParams, language_code,
};
use aprendia_error::{GenerationError, GenerationErrorKind};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use derive_getters::Getters;
use reqwest::Client;
use tracing::{debug, error, instrument};

/// Default Text-to-Speech REST endpoint.
pub const TTS_BASE_URL: &str = "https://texttospeech.googleapis.com/v1";

/// Connection settings for Cloud Text-to-Speech.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct TextToSpeechConfig {
    /// API key sent as `x-goog-api-key`
    api_key: String,
    /// REST base URL without trailing slash
    #[builder(default = "TTS_BASE_URL.to_string()")]
    base_url: String,
    /// Output encoding; the audio cache stores `.mp3` files
    #[builder(default = "\"MP3\".to_string()")]
    audio_encoding: String,
}

impl TextToSpeechConfig {
    /// Creates a new builder for TextToSpeechConfig.
    pub fn builder() -> TextToSpeechConfigBuilder {
        TextToSpeechConfigBuilder::default()
    }

    /// Default endpoint and MP3 output with the given key.
    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: TTS_BASE_URL.to_string(),
            audio_encoding: "MP3".to_string(),
        }
    }
}

/// Client for the `text:synthesize` endpoint.
#[derive(Debug, Clone)]
pub struct TextToSpeechClient {
    client: Client,
    config: TextToSpeechConfig,
}

impl TextToSpeechClient {
    /// Creates a new Text-to-Speech client.
    pub fn new(config: TextToSpeechConfig) -> Result<Self, GenerationError> {
        if config.api_key().trim().is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::ClientCreation(
                "Text-to-Speech API key is empty".to_string(),
            )));
        }
        let client = Client::builder().build().map_err(|e| {
            GenerationError::new(GenerationErrorKind::ClientCreation(e.to_string()))
        })?;
        Ok(Self { client, config })
    }

    /// Synthesizes `text` in `locale` and returns the decoded audio bytes.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn synthesize(&self, locale: &str, text: &str) -> Result<Vec<u8>, GenerationError> {
        let request = SynthesizeSpeechRequest {
            input: SynthesisInput {
                text: text.to_string(),
            },
            voice: VoiceSelectionParams {
                language_code: language_code(locale),
            },
            audio_config: AudioConfig {
                audio_encoding: self.config.audio_encoding().clone(),
            },
        };

        let url = format!("{}/text:synthesize", self.config.base_url().trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", self.config.api_key())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Text-to-Speech request failed");
                GenerationError::new(GenerationErrorKind::ApiRequest(e.to_string()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = %status, error = %message, "Text-to-Speech API error");
            return Err(GenerationError::new(GenerationErrorKind::HttpError {
                status_code: status.as_u16(),
                message,
            }));
        }

        let body: SynthesizeSpeechResponse = response.json().await.map_err(|e| {
            GenerationError::new(GenerationErrorKind::ResponseParsing(e.to_string()))
        })?;
        if body.audio_content.is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::EmptyResponse(
                "audio content".to_string(),
            )));
        }

        let audio = STANDARD.decode(body.audio_content.as_bytes()).map_err(|e| {
            GenerationError::new(GenerationErrorKind::Base64Decode(e.to_string()))
        })?;

        debug!(bytes = audio.len(), "Received synthesized audio");
        Ok(audio)
    }
}
