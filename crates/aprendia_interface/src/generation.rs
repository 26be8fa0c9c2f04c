//! Generation provider trait.

use aprendia_error::AprendiaResult;
use async_trait::async_trait;
use std::sync::Arc;

/// External text-generation and speech-synthesis service.
///
/// Any error is treated as fatal by the calling pipeline job; implementations
/// should not retry on the pipeline's behalf.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generate text for a natural-language instruction.
    async fn generate_text(&self, prompt: &str) -> AprendiaResult<String>;

    /// Synthesize `text` spoken in `locale`, returning encoded audio bytes.
    async fn synthesize_speech(&self, locale: &str, text: &str) -> AprendiaResult<Vec<u8>>;

    /// Provider name for logs.
    fn provider_name(&self) -> &'static str;
}

#[async_trait]
impl<T: GenerationClient + ?Sized> GenerationClient for Arc<T> {
    async fn generate_text(&self, prompt: &str) -> AprendiaResult<String> {
        (**self).generate_text(prompt).await
    }

    async fn synthesize_speech(&self, locale: &str, text: &str) -> AprendiaResult<Vec<u8>> {
        (**self).synthesize_speech(locale, text).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }
}
