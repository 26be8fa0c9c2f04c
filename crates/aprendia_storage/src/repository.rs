//! In-memory implementation of ContentRepository.
//!
//! Entities live in HashMaps protected by RwLocks; identifiers come from
//! atomic counters. All data is lost when the last clone is dropped.

use aprendia_core::{SentencePair, SentencePairId, Story, StoryId, Studiable, StudiableId};
use aprendia_error::{AprendiaResult, EntityKind, StorageError};
use aprendia_interface::{ContentRepository, StudiableMutation};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// Per-kind identifier counters. Each starts at 1.
#[derive(Debug)]
struct Counters {
    story: AtomicU64,
    studiable: AtomicU64,
    sentence: AtomicU64,
}

impl Counters {
    fn new() -> Self {
        Self {
            story: AtomicU64::new(1),
            studiable: AtomicU64::new(1),
            sentence: AtomicU64::new(1),
        }
    }

    fn reset(&self) {
        self.story.store(1, Ordering::SeqCst);
        self.studiable.store(1, Ordering::SeqCst);
        self.sentence.store(1, Ordering::SeqCst);
    }
}

/// In-memory repository for stories, studiables and sentence pairs.
///
/// Cloning is cheap and clones share the same storage.
///
/// # Example
/// ```no_run
/// use aprendia_interface::ContentRepository;
/// use aprendia_storage::InMemoryRepository;
///
/// #[tokio::main]
/// async fn main() {
///     let repo = InMemoryRepository::new();
///     let id = repo.next_story_id().await.unwrap();
///     assert_eq!(id, 1);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    stories: Arc<RwLock<HashMap<StoryId, Story>>>,
    studiables: Arc<RwLock<HashMap<StudiableId, Studiable>>>,
    sentences: Arc<RwLock<HashMap<SentencePairId, SentencePair>>>,
    counters: Arc<Counters>,
}

impl InMemoryRepository {
    /// Create a new empty repository.
    pub fn new() -> Self {
        Self {
            stories: Arc::new(RwLock::new(HashMap::new())),
            studiables: Arc::new(RwLock::new(HashMap::new())),
            sentences: Arc::new(RwLock::new(HashMap::new())),
            counters: Arc::new(Counters::new()),
        }
    }

    /// Number of stored sentence pairs across all studiables.
    pub async fn sentence_count(&self) -> usize {
        self.sentences.read().await.len()
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentRepository for InMemoryRepository {
    async fn next_story_id(&self) -> AprendiaResult<StoryId> {
        Ok(self.counters.story.fetch_add(1, Ordering::SeqCst))
    }

    async fn next_studiable_id(&self) -> AprendiaResult<StudiableId> {
        Ok(self.counters.studiable.fetch_add(1, Ordering::SeqCst))
    }

    async fn next_sentence_id(&self) -> AprendiaResult<SentencePairId> {
        Ok(self.counters.sentence.fetch_add(1, Ordering::SeqCst))
    }

    async fn put_story(&self, story: Story) -> AprendiaResult<()> {
        debug!(story_id = story.id, "Storing story");
        self.stories.write().await.insert(story.id, story);
        Ok(())
    }

    async fn story(&self, id: StoryId) -> AprendiaResult<Story> {
        self.stories
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::not_found(EntityKind::Story, id).into())
    }

    async fn list_stories(&self) -> AprendiaResult<Vec<Story>> {
        let mut stories: Vec<Story> = self.stories.read().await.values().cloned().collect();
        stories.sort_by_key(|s| s.id);
        Ok(stories)
    }

    async fn put_studiable(&self, studiable: Studiable) -> AprendiaResult<()> {
        debug!(
            studiable_id = studiable.id,
            story_id = studiable.story_id,
            "Storing studiable"
        );
        self.studiables.write().await.insert(studiable.id, studiable);
        Ok(())
    }

    async fn studiable(&self, id: StudiableId) -> AprendiaResult<Studiable> {
        self.studiables
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::not_found(EntityKind::Studiable, id).into())
    }

    async fn list_studiables(&self, story_id: StoryId) -> AprendiaResult<Vec<Studiable>> {
        let mut studiables: Vec<Studiable> = self
            .studiables
            .read()
            .await
            .values()
            .filter(|s| s.story_id == story_id)
            .cloned()
            .collect();
        studiables.sort_by_key(|s| s.id);
        Ok(studiables)
    }

    async fn update_studiable(
        &self,
        id: StudiableId,
        mutation: StudiableMutation,
    ) -> AprendiaResult<Studiable> {
        let mut studiables = self.studiables.write().await;
        let studiable = studiables
            .get_mut(&id)
            .ok_or_else(|| StorageError::not_found(EntityKind::Studiable, id))?;
        mutation(studiable);
        Ok(studiable.clone())
    }

    async fn put_sentence(&self, sentence: SentencePair) -> AprendiaResult<()> {
        self.sentences.write().await.insert(sentence.id, sentence);
        Ok(())
    }

    async fn sentences(&self, ids: &[SentencePairId]) -> AprendiaResult<Vec<SentencePair>> {
        let sentences = self.sentences.read().await;
        Ok(ids.iter().filter_map(|id| sentences.get(id).cloned()).collect())
    }

    async fn reset(&self) -> AprendiaResult<()> {
        // Hold every map while the counters restart so no id is handed out
        // against a half-cleared store.
        let mut stories = self.stories.write().await;
        let mut studiables = self.studiables.write().await;
        let mut sentences = self.sentences.write().await;
        stories.clear();
        studiables.clear();
        sentences.clear();
        self.counters.reset();
        debug!("Repository reset");
        Ok(())
    }
}
