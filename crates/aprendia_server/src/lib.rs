//! HTTP service for Aprendia.
//!
//! [`build_app`] wires a generation client and a repository into a
//! [`ContentService`] and its axum router. The `aprendia` binary loads an
//! [`AppConfig`] and serves that router.

mod api;
mod config;
mod service;

pub use api::{ApiError, AudioMount, create_router};
pub use config::{
    AppConfig, DEFAULT_CONFIG_FILE, GEMINI_API_KEY_ENV, GeminiSettings, TtsSettings,
};
pub use service::{
    ContentService, CreateStoryRequest, CreateStudiableRequest, StoryCreated, StoryView,
    StudiableCreated, StudiableDetail,
};

use aprendia_interface::{ContentRepository, GenerationClient};
use aprendia_pipeline::{ContentPipeline, JobRunner};
use aprendia_storage::AudioCache;
use axum::Router;
use std::sync::Arc;

/// Builds the content service and its router from configuration.
pub fn build_app<G, R>(
    config: &AppConfig,
    client: Arc<G>,
    repository: Arc<R>,
) -> (Arc<ContentService<G, R>>, Router)
where
    G: GenerationClient + 'static,
    R: ContentRepository + 'static,
{
    let url_prefix = config.audio_url_prefix().trim_end_matches('/').to_string();
    let audio = AudioCache::new(config.audio_dir().clone(), url_prefix.clone());
    let pipeline = ContentPipeline::new(client, repository, audio);
    let jobs = JobRunner::new(*config.max_concurrent_jobs());
    let service = Arc::new(ContentService::new(pipeline, jobs));

    let router = create_router(
        Arc::clone(&service),
        AudioMount {
            url_prefix,
            dir: config.audio_dir().clone(),
        },
        config.cors_origins(),
    );
    (service, router)
}
