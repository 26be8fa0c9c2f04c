//! Creation and read flows behind the HTTP API.
//!
//! Creation stores the new studiable synchronously and hands generation to a
//! background job, so callers get identifiers back before any provider call
//! completes.

use aprendia_core::{
    DEFAULT_CONVERSATION_TYPE, DEFAULT_MAX_SENTENCE_LENGTH, DEFAULT_MIN_SENTENCE_LENGTH,
    LevelParams, SentencePair, Story, StoryId, StoryMetadata, Studiable, StudiableId,
    StudiableMetadata,
};
use aprendia_error::{AprendiaResult, ValidationError, ValidationErrorKind};
use aprendia_interface::{ContentRepository, GenerationClient};
use aprendia_pipeline::{ContentPipeline, JobMetricsSnapshot, JobRunner};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Body of `POST /stories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateStoryRequest {
    pub title: String,
    pub source_locale: String,
    pub target_locale: String,
    pub language_level: String,
    pub age_level: String,
    pub topic: String,
    #[serde(default = "default_conversation_type")]
    pub conversation_type: String,
    #[serde(default = "default_min_sentence_length")]
    pub min_sentence_length: u32,
    #[serde(default = "default_max_sentence_length")]
    pub max_sentence_length: u32,
}

fn default_conversation_type() -> String {
    DEFAULT_CONVERSATION_TYPE.to_string()
}

fn default_min_sentence_length() -> u32 {
    DEFAULT_MIN_SENTENCE_LENGTH
}

fn default_max_sentence_length() -> u32 {
    DEFAULT_MAX_SENTENCE_LENGTH
}

/// Body of `POST /stories/{id}/studiables`.
///
/// `type` is kept as free text so unknown values are reported as a
/// validation failure rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateStudiableRequest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub language_level: Option<String>,
    #[serde(default)]
    pub age_level: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub conversation_type: Option<String>,
    #[serde(default)]
    pub min_sentence_length: Option<u32>,
    #[serde(default)]
    pub max_sentence_length: Option<u32>,
    #[serde(default)]
    pub parent_studiable_id: Option<StudiableId>,
}

/// Response of `POST /stories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryCreated {
    pub story: Story,
    pub chapter_id: StudiableId,
    pub status: String,
}

/// Response of `POST /stories/{id}/studiables`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudiableCreated {
    pub studiable_id: StudiableId,
    pub status: String,
}

/// A story with the identifiers of its studiables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryView {
    #[serde(flatten)]
    pub story: Story,
    pub studiable_ids: Vec<StudiableId>,
}

/// A studiable with its sentence pairs resolved in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudiableDetail {
    pub id: StudiableId,
    pub story_id: StoryId,
    pub title: String,
    pub metadata: StudiableMetadata,
    pub sentences: Vec<SentencePair>,
}

const PROCESSING: &str = "processing";

/// Story and studiable operations over a repository and a pipeline.
pub struct ContentService<G, R> {
    repository: Arc<R>,
    pipeline: ContentPipeline<G, R>,
    jobs: JobRunner,
    /// Held while a chapter number is assigned and its studiable stored
    chapter_numbering: Mutex<()>,
}

impl<G, R> ContentService<G, R>
where
    G: GenerationClient + 'static,
    R: ContentRepository + 'static,
{
    pub fn new(pipeline: ContentPipeline<G, R>, jobs: JobRunner) -> Self {
        Self {
            repository: Arc::clone(pipeline.repository()),
            pipeline,
            jobs,
            chapter_numbering: Mutex::new(()),
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    pub fn metrics(&self) -> JobMetricsSnapshot {
        self.pipeline.metrics().snapshot()
    }

    /// Creates a story with its first chapter and starts generating it.
    #[instrument(skip(self, request), fields(title = %request.title, topic = %request.topic))]
    pub async fn create_story(&self, request: CreateStoryRequest) -> AprendiaResult<StoryCreated> {
        check_locale(&request.source_locale)?;
        check_locale(&request.target_locale)?;
        check_lengths(request.min_sentence_length, request.max_sentence_length)?;

        let story = Story {
            id: self.repository.next_story_id().await?,
            title: request.title,
            source_locale: request.source_locale,
            target_locale: request.target_locale,
            metadata: StoryMetadata {
                language_level: request.language_level.clone(),
                age_level: request.age_level.clone(),
                topic: request.topic.clone(),
            },
        };
        self.repository.put_story(story.clone()).await?;

        let params = LevelParams::new(
            request.language_level,
            request.age_level,
            request.topic,
            request.conversation_type,
            request.min_sentence_length,
            request.max_sentence_length,
        );

        let chapter_id = {
            let _numbering = self.chapter_numbering.lock().await;
            self.store_chapter(story.id, 1, &params).await?
        };
        info!(story_id = story.id, chapter_id, "Story created");

        self.spawn_chapter(chapter_id, story.clone(), params, None);

        Ok(StoryCreated {
            story,
            chapter_id,
            status: PROCESSING.to_string(),
        })
    }

    /// Creates a chapter or quiz for `story_id` and starts generating it.
    #[instrument(skip(self, request), fields(kind = %request.kind))]
    pub async fn create_studiable(
        &self,
        story_id: StoryId,
        request: CreateStudiableRequest,
    ) -> AprendiaResult<StudiableCreated> {
        let story = self.repository.story(story_id).await?;

        let studiable_id = match request.kind.as_str() {
            "chapter" => self.create_chapter(story, request).await?,
            "quiz" => self.create_quiz(story, request).await?,
            other => {
                return Err(ValidationError::new(ValidationErrorKind::UnknownStudiableType(
                    other.to_string(),
                ))
                .into());
            }
        };

        Ok(StudiableCreated {
            studiable_id,
            status: PROCESSING.to_string(),
        })
    }

    async fn create_chapter(
        &self,
        story: Story,
        request: CreateStudiableRequest,
    ) -> AprendiaResult<StudiableId> {
        let (studiable_id, params, previous) = {
            let _numbering = self.chapter_numbering.lock().await;

            let chapters: Vec<Studiable> = self
                .repository
                .list_studiables(story.id)
                .await?
                .into_iter()
                .filter(|s| s.metadata.is_chapter())
                .collect();

            let params = resolve_chapter_params(&request, &story, chapters.last());
            check_lengths(*params.min_sentence_length(), *params.max_sentence_length())?;

            let chapter_number = chapters.len() as u32 + 1;
            let previous = chapters
                .iter()
                .filter(|s| !s.raw_text.is_empty())
                .map(|s| s.raw_text.as_str())
                .collect::<Vec<_>>()
                .join("\n");

            let studiable_id = self.store_chapter(story.id, chapter_number, &params).await?;
            debug!(studiable_id, chapter_number, "Chapter numbered");
            (studiable_id, params, previous)
        };

        let previous = (!previous.is_empty()).then_some(previous);
        self.spawn_chapter(studiable_id, story, params, previous);
        Ok(studiable_id)
    }

    async fn create_quiz(
        &self,
        story: Story,
        request: CreateStudiableRequest,
    ) -> AprendiaResult<StudiableId> {
        let parent_id = request.parent_studiable_id.ok_or_else(|| {
            ValidationError::new(ValidationErrorKind::MissingField("parent_studiable_id"))
        })?;
        let parent = self.repository.studiable(parent_id).await?;

        let studiable_id = self.repository.next_studiable_id().await?;
        let metadata = StudiableMetadata::quiz(parent_id, parent.metadata.language_level.clone());
        self.repository
            .put_studiable(Studiable::pending(
                studiable_id,
                story.id,
                format!("Quiz for {}", parent.title),
                metadata,
            ))
            .await?;
        info!(story_id = story.id, studiable_id, parent_id, "Quiz created");

        let pipeline = self.pipeline.clone();
        self.jobs.spawn("quiz", studiable_id, async move {
            pipeline.process_quiz(studiable_id, &story, parent_id).await;
        });
        Ok(studiable_id)
    }

    async fn store_chapter(
        &self,
        story_id: StoryId,
        chapter_number: u32,
        params: &LevelParams,
    ) -> AprendiaResult<StudiableId> {
        let studiable_id = self.repository.next_studiable_id().await?;
        self.repository
            .put_studiable(Studiable::pending(
                studiable_id,
                story_id,
                format!("Chapter {}", chapter_number),
                StudiableMetadata::chapter(chapter_number, params),
            ))
            .await?;
        Ok(studiable_id)
    }

    fn spawn_chapter(
        &self,
        studiable_id: StudiableId,
        story: Story,
        params: LevelParams,
        previous: Option<String>,
    ) {
        let pipeline = self.pipeline.clone();
        self.jobs.spawn("chapter", studiable_id, async move {
            pipeline
                .process_chapter(studiable_id, &story, &params, previous.as_deref())
                .await;
        });
    }

    pub async fn list_stories(&self) -> AprendiaResult<Vec<Story>> {
        self.repository.list_stories().await
    }

    pub async fn story(&self, story_id: StoryId) -> AprendiaResult<StoryView> {
        let story = self.repository.story(story_id).await?;
        let studiable_ids = self
            .repository
            .list_studiables(story_id)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();
        Ok(StoryView {
            story,
            studiable_ids,
        })
    }

    pub async fn list_studiables(&self, story_id: StoryId) -> AprendiaResult<Vec<Studiable>> {
        self.repository.story(story_id).await?;
        self.repository.list_studiables(story_id).await
    }

    pub async fn studiable(&self, studiable_id: StudiableId) -> AprendiaResult<StudiableDetail> {
        let studiable = self.repository.studiable(studiable_id).await?;
        let sentences = self.repository.sentences(&studiable.sentences).await?;
        Ok(StudiableDetail {
            id: studiable.id,
            story_id: studiable.story_id,
            title: studiable.title,
            metadata: studiable.metadata,
            sentences,
        })
    }
}

/// Fills leveling fields the request leaves out: the story's most recent
/// chapter first, then story metadata, then defaults.
fn resolve_chapter_params(
    request: &CreateStudiableRequest,
    story: &Story,
    latest: Option<&Studiable>,
) -> LevelParams {
    let previous = latest.map(|s| &s.metadata);
    let text = |requested: &Option<String>,
                recorded: Option<&Option<String>>,
                fallback: &str|
     -> String {
        requested
            .clone()
            .or_else(|| recorded.and_then(|r| r.clone()))
            .unwrap_or_else(|| fallback.to_string())
    };

    LevelParams::new(
        text(
            &request.language_level,
            previous.map(|m| &m.language_level),
            &story.metadata.language_level,
        ),
        text(
            &request.age_level,
            previous.map(|m| &m.age_level),
            &story.metadata.age_level,
        ),
        text(
            &request.topic,
            previous.map(|m| &m.topic),
            &story.metadata.topic,
        ),
        text(
            &request.conversation_type,
            previous.map(|m| &m.conversation_type),
            DEFAULT_CONVERSATION_TYPE,
        ),
        request
            .min_sentence_length
            .or_else(|| previous.and_then(|m| m.min_sentence_length))
            .unwrap_or(DEFAULT_MIN_SENTENCE_LENGTH),
        request
            .max_sentence_length
            .or_else(|| previous.and_then(|m| m.max_sentence_length))
            .unwrap_or(DEFAULT_MAX_SENTENCE_LENGTH),
    )
}

/// Accepts language tags such as `en`, `es-CO` or `pt_br`.
fn check_locale(locale: &str) -> AprendiaResult<()> {
    let valid = !locale.is_empty()
        && locale
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(
            ValidationError::new(ValidationErrorKind::InvalidLocale(locale.to_string())).into(),
        );
    }
    Ok(())
}

fn check_lengths(min: u32, max: u32) -> AprendiaResult<()> {
    if min == 0 || min > max {
        return Err(
            ValidationError::new(ValidationErrorKind::InvalidSentenceLength { min, max }).into(),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aprendia_core::StudiableKind;

    fn story() -> Story {
        Story {
            id: 1,
            title: "Cats".to_string(),
            source_locale: "en".to_string(),
            target_locale: "es".to_string(),
            metadata: StoryMetadata {
                language_level: "A2".to_string(),
                age_level: "college".to_string(),
                topic: "cats".to_string(),
            },
        }
    }

    #[test]
    fn params_fall_back_to_story_then_defaults() {
        let request = CreateStudiableRequest {
            kind: "chapter".to_string(),
            ..Default::default()
        };
        let params = resolve_chapter_params(&request, &story(), None);

        assert_eq!(params.language_level(), "A2");
        assert_eq!(params.topic(), "cats");
        assert_eq!(params.conversation_type(), "narration");
        assert_eq!(*params.min_sentence_length(), 3);
        assert_eq!(*params.max_sentence_length(), 10);
    }

    #[test]
    fn params_prefer_request_then_latest_chapter() {
        let mut latest = Studiable::pending(
            7,
            1,
            "Chapter 1",
            StudiableMetadata {
                kind: StudiableKind::Chapter { chapter_number: 1 },
                language_level: Some("B1".to_string()),
                age_level: None,
                topic: Some("dogs".to_string()),
                conversation_type: Some("dialogue".to_string()),
                min_sentence_length: Some(5),
                max_sentence_length: Some(12),
                error: None,
            },
        );
        latest.raw_text = "x|y".to_string();
        let request = CreateStudiableRequest {
            kind: "chapter".to_string(),
            topic: Some("birds".to_string()),
            max_sentence_length: Some(15),
            ..Default::default()
        };

        let params = resolve_chapter_params(&request, &story(), Some(&latest));

        assert_eq!(params.topic(), "birds");
        assert_eq!(params.language_level(), "B1");
        assert_eq!(params.age_level(), "college");
        assert_eq!(params.conversation_type(), "dialogue");
        assert_eq!(*params.min_sentence_length(), 5);
        assert_eq!(*params.max_sentence_length(), 15);
    }

    #[test]
    fn locales_must_be_language_tags() {
        for locale in ["en", "es-CO", "pt_br", "zh-Hant-TW"] {
            assert!(check_locale(locale).is_ok(), "{}", locale);
        }
        for locale in ["", "..", "../../x", "/tmp/audio", "es/CO", "es CO", "és"] {
            assert!(check_locale(locale).unwrap_err().is_validation(), "{:?}", locale);
        }
    }

    #[test]
    fn inverted_lengths_are_rejected() {
        assert!(check_lengths(3, 10).is_ok());
        assert!(check_lengths(4, 4).is_ok());
        assert!(check_lengths(11, 10).unwrap_err().is_validation());
        assert!(check_lengths(0, 10).unwrap_err().is_validation());
    }
}
