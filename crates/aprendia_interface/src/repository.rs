//! Content repository trait.

use aprendia_core::{SentencePair, SentencePairId, Story, StoryId, Studiable, StudiableId};
use aprendia_error::AprendiaResult;
use async_trait::async_trait;

/// In-place edit applied to a stored studiable under the repository's lock.
pub type StudiableMutation = Box<dyn FnOnce(&mut Studiable) + Send>;

/// Storage for stories, studiables and sentence pairs.
///
/// Identifiers come from one monotonically increasing counter per entity
/// kind and are never reused. Implementations must be safe to share between
/// concurrently running pipeline jobs.
///
/// Lookups of absent entities return a not-found storage error.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Reserve the next story identifier.
    async fn next_story_id(&self) -> AprendiaResult<StoryId>;

    /// Reserve the next studiable identifier.
    async fn next_studiable_id(&self) -> AprendiaResult<StudiableId>;

    /// Reserve the next sentence pair identifier.
    async fn next_sentence_id(&self) -> AprendiaResult<SentencePairId>;

    /// Insert or replace a story.
    async fn put_story(&self, story: Story) -> AprendiaResult<()>;

    /// Load a story.
    async fn story(&self, id: StoryId) -> AprendiaResult<Story>;

    /// All stories, ordered by identifier.
    async fn list_stories(&self) -> AprendiaResult<Vec<Story>>;

    /// Insert or replace a studiable.
    async fn put_studiable(&self, studiable: Studiable) -> AprendiaResult<()>;

    /// Load a studiable.
    async fn studiable(&self, id: StudiableId) -> AprendiaResult<Studiable>;

    /// Studiables of one story, ordered by identifier.
    async fn list_studiables(&self, story_id: StoryId) -> AprendiaResult<Vec<Studiable>>;

    /// Apply `mutation` to a stored studiable and return the updated copy.
    ///
    /// Readers never observe a half-applied mutation.
    async fn update_studiable(
        &self,
        id: StudiableId,
        mutation: StudiableMutation,
    ) -> AprendiaResult<Studiable>;

    /// Insert a sentence pair.
    async fn put_sentence(&self, sentence: SentencePair) -> AprendiaResult<()>;

    /// Load sentence pairs in the order of `ids`, skipping unknown ones.
    async fn sentences(&self, ids: &[SentencePairId]) -> AprendiaResult<Vec<SentencePair>>;

    /// Remove every entity and restart all counters. Intended for test isolation.
    async fn reset(&self) -> AprendiaResult<()>;
}
