//! Chapter and quiz generation jobs.

use crate::{
    JobKind, JobMetrics, ParsedPair, new_story_prompt, next_chapter_prompt, parse_pairs,
    quiz_prompt,
};
use aprendia_core::{
    DEFAULT_LANGUAGE_LEVEL, LevelParams, SentencePair, SentencePairId, Story, Studiable,
    StudiableId,
};
use aprendia_error::{AprendiaResult, PipelineError, PipelineErrorKind};
use aprendia_interface::{ContentRepository, GenerationClient};
use aprendia_storage::AudioCache;
use derive_getters::Getters;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Texts and audio paths for one sentence pair before it gets an identifier.
struct PairDraft {
    source_text: String,
    target_text: String,
    source_audio: String,
    target_audio: String,
    order: usize,
}

/// Drives generation, parsing, speech synthesis and persistence for one
/// studiable at a time.
///
/// Each job exclusively owns the studiable it was started for. The unparsed
/// generation output is stored as soon as it arrives; sentence pairs become
/// visible in a single update once every pair has audio. Any failure stops the
/// job and is recorded into `metadata.error`; nothing is retried.
#[derive(Debug, Getters)]
pub struct ContentPipeline<G, R> {
    client: Arc<G>,
    repository: Arc<R>,
    audio: AudioCache,
    metrics: Arc<JobMetrics>,
}

impl<G, R> Clone for ContentPipeline<G, R> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            repository: Arc::clone(&self.repository),
            audio: self.audio.clone(),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl<G, R> ContentPipeline<G, R>
where
    G: GenerationClient,
    R: ContentRepository,
{
    pub fn new(client: Arc<G>, repository: Arc<R>, audio: AudioCache) -> Self {
        Self::with_metrics(client, repository, audio, Arc::new(JobMetrics::new()))
    }

    pub fn with_metrics(
        client: Arc<G>,
        repository: Arc<R>,
        audio: AudioCache,
        metrics: Arc<JobMetrics>,
    ) -> Self {
        Self {
            client,
            repository,
            audio,
            metrics,
        }
    }

    /// Generates a chapter into the pending studiable `studiable_id`.
    ///
    /// A non-empty `previous_story_text` makes this a continuation.
    #[instrument(
        skip(self, story, params, previous_story_text),
        fields(story_id = story.id, provider = self.client.provider_name())
    )]
    pub async fn process_chapter(
        &self,
        studiable_id: StudiableId,
        story: &Story,
        params: &LevelParams,
        previous_story_text: Option<&str>,
    ) {
        self.metrics.job_started(JobKind::Chapter);
        let result = self
            .run_chapter(studiable_id, story, params, previous_story_text)
            .await;
        self.finish(studiable_id, JobKind::Chapter, result).await;
    }

    /// Generates a quiz into the pending studiable `studiable_id` from the
    /// sentence pairs of `parent_studiable_id`.
    #[instrument(
        skip(self, story),
        fields(story_id = story.id, provider = self.client.provider_name())
    )]
    pub async fn process_quiz(
        &self,
        studiable_id: StudiableId,
        story: &Story,
        parent_studiable_id: StudiableId,
    ) {
        self.metrics.job_started(JobKind::Quiz);
        let result = self
            .run_quiz(studiable_id, story, parent_studiable_id)
            .await;
        self.finish(studiable_id, JobKind::Quiz, result).await;
    }

    async fn run_chapter(
        &self,
        studiable_id: StudiableId,
        story: &Story,
        params: &LevelParams,
        previous_story_text: Option<&str>,
    ) -> AprendiaResult<usize> {
        let prompt = match previous_story_text.filter(|text| !text.trim().is_empty()) {
            Some(previous) => next_chapter_prompt(
                previous,
                &story.source_locale,
                &story.target_locale,
                params,
            ),
            None => new_story_prompt(&story.source_locale, &story.target_locale, params),
        };

        let pairs = self.generate(studiable_id, &prompt).await?;

        let mut drafts = Vec::with_capacity(pairs.len());
        for ParsedPair {
            first,
            second,
            order,
        } in pairs
        {
            let source_audio = self.speak(&story.source_locale, &first).await?;
            let target_audio = self.speak(&story.target_locale, &second).await?;
            drafts.push(PairDraft {
                source_text: first,
                target_text: second,
                source_audio,
                target_audio,
                order,
            });
        }

        self.publish(studiable_id, drafts).await
    }

    async fn run_quiz(
        &self,
        studiable_id: StudiableId,
        story: &Story,
        parent_studiable_id: StudiableId,
    ) -> AprendiaResult<usize> {
        let parent = self.repository.studiable(parent_studiable_id).await?;
        if !parent.metadata.is_chapter() {
            return Err(
                PipelineError::new(PipelineErrorKind::ParentNotChapter(parent_studiable_id))
                    .into(),
            );
        }
        if parent.sentences.is_empty() {
            return Err(PipelineError::new(PipelineErrorKind::ParentHasNoSentences(
                parent_studiable_id,
            ))
            .into());
        }

        let chapter_sentences: Vec<(String, String)> = self
            .repository
            .sentences(&parent.sentences)
            .await?
            .into_iter()
            .map(|s| (s.source_text, s.target_text))
            .collect();
        let language_level = parent
            .metadata
            .language_level
            .as_deref()
            .unwrap_or(DEFAULT_LANGUAGE_LEVEL);
        let prompt = quiz_prompt(&chapter_sentences, &story.target_locale, language_level);

        let pairs = self.generate(studiable_id, &prompt).await?;

        // Both halves of a quiz line are in the target language. The answer
        // goes in the source slot and the question in the target slot.
        let mut drafts = Vec::with_capacity(pairs.len());
        for ParsedPair {
            first: question,
            second: answer,
            order,
        } in pairs
        {
            let answer_audio = self.speak(&story.target_locale, &answer).await?;
            let question_audio = self.speak(&story.target_locale, &question).await?;
            drafts.push(PairDraft {
                source_text: answer,
                target_text: question,
                source_audio: answer_audio,
                target_audio: question_audio,
                order,
            });
        }

        self.publish(studiable_id, drafts).await
    }

    /// Calls the provider, stores the raw text and parses it.
    async fn generate(
        &self,
        studiable_id: StudiableId,
        prompt: &str,
    ) -> AprendiaResult<Vec<ParsedPair>> {
        let raw_text = self.client.generate_text(prompt).await?;

        let stored = raw_text.clone();
        self.repository
            .update_studiable(
                studiable_id,
                Box::new(move |s: &mut Studiable| s.raw_text = stored),
            )
            .await?;

        let pairs = parse_pairs(&raw_text);
        if pairs.is_empty() {
            warn!(studiable_id, "Generated text contained no sentence pairs");
        } else {
            debug!(studiable_id, pair_count = pairs.len(), "Parsed generated text");
        }
        Ok(pairs)
    }

    /// Synthesizes `text` and returns the public path of the cached audio.
    async fn speak(&self, locale: &str, text: &str) -> AprendiaResult<String> {
        let audio = self.client.synthesize_speech(locale, text).await?;
        let artifact = self.audio.write(locale, text, &audio).await?;
        self.metrics.audio_file_written();
        Ok(artifact.url().clone())
    }

    /// Stores every pair, then attaches them to the studiable in one update.
    async fn publish(
        &self,
        studiable_id: StudiableId,
        drafts: Vec<PairDraft>,
    ) -> AprendiaResult<usize> {
        let mut ids: Vec<SentencePairId> = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let id = self.repository.next_sentence_id().await?;
            self.repository
                .put_sentence(SentencePair {
                    id,
                    source_text: draft.source_text,
                    target_text: draft.target_text,
                    source_audio: draft.source_audio,
                    target_audio: draft.target_audio,
                    order: draft.order,
                })
                .await?;
            self.metrics.sentence_pair_created();
            ids.push(id);
        }

        let count = ids.len();
        self.repository
            .update_studiable(
                studiable_id,
                Box::new(move |s: &mut Studiable| s.sentences = ids),
            )
            .await?;
        Ok(count)
    }

    async fn finish(
        &self,
        studiable_id: StudiableId,
        kind: JobKind,
        result: AprendiaResult<usize>,
    ) {
        match result {
            Ok(pair_count) => {
                self.metrics.job_succeeded(kind);
                info!(studiable_id, kind = kind.as_str(), pair_count, "Job completed");
            }
            Err(e) => {
                self.metrics.job_failed(kind);
                error!(
                    studiable_id,
                    kind = kind.as_str(),
                    transient = e.is_transient(),
                    error = %e,
                    "Job failed"
                );
                let message = e.summary();
                if let Err(record_err) = self
                    .repository
                    .update_studiable(
                        studiable_id,
                        Box::new(move |s: &mut Studiable| s.metadata.error = Some(message)),
                    )
                    .await
                {
                    error!(studiable_id, error = %record_err, "Failed to record job error");
                }
            }
        }
    }
}
