//! Studiables: chapters and quizzes belonging to a story.

use crate::{LevelParams, SentencePairId, StoryId};
use serde::{Deserialize, Serialize};

/// Identifier of a [`Studiable`].
pub type StudiableId = u64;

/// Type-specific part of a studiable's metadata.
///
/// Serialized with a `type` tag next to the variant's own fields, so a chapter
/// renders as `{"type": "chapter", "chapter_number": 2, ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StudiableKind {
    /// A narrative chapter, numbered per story from 1
    Chapter { chapter_number: u32 },
    /// A quiz derived from a chapter
    Quiz { parent_studiable_id: StudiableId },
}

/// Metadata recorded on a studiable.
///
/// Optional fields are omitted from JSON when unset. `error` is written by the
/// pipeline job when generation fails.
///
/// # Examples
///
/// ```
/// use aprendia_core::{StudiableKind, StudiableMetadata};
///
/// let meta = StudiableMetadata::quiz(4, Some("A2".to_string()));
/// let json = serde_json::to_value(&meta).unwrap();
///
/// assert_eq!(json["type"], "quiz");
/// assert_eq!(json["parent_studiable_id"], 4);
/// assert!(json.get("error").is_none());
/// assert_eq!(meta.kind, StudiableKind::Quiz { parent_studiable_id: 4 });
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudiableMetadata {
    #[serde(flatten)]
    pub kind: StudiableKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_sentence_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_sentence_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StudiableMetadata {
    /// Metadata for a chapter generated with the given parameters.
    pub fn chapter(chapter_number: u32, params: &LevelParams) -> Self {
        Self {
            kind: StudiableKind::Chapter { chapter_number },
            language_level: Some(params.language_level().clone()),
            age_level: Some(params.age_level().clone()),
            topic: Some(params.topic().clone()),
            conversation_type: Some(params.conversation_type().clone()),
            min_sentence_length: Some(*params.min_sentence_length()),
            max_sentence_length: Some(*params.max_sentence_length()),
            error: None,
        }
    }

    /// Metadata for a quiz over `parent_studiable_id`.
    pub fn quiz(parent_studiable_id: StudiableId, language_level: Option<String>) -> Self {
        Self {
            kind: StudiableKind::Quiz {
                parent_studiable_id,
            },
            language_level,
            age_level: None,
            topic: None,
            conversation_type: None,
            min_sentence_length: None,
            max_sentence_length: None,
            error: None,
        }
    }

    pub fn is_chapter(&self) -> bool {
        matches!(self.kind, StudiableKind::Chapter { .. })
    }

    /// Chapter number, if this is a chapter.
    pub fn chapter_number(&self) -> Option<u32> {
        match self.kind {
            StudiableKind::Chapter { chapter_number } => Some(chapter_number),
            StudiableKind::Quiz { .. } => None,
        }
    }
}

/// A generated learning artifact: a chapter or a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Studiable {
    pub id: StudiableId,
    pub story_id: StoryId,
    pub title: String,
    /// Unparsed generation output; empty until the pipeline stores it
    pub raw_text: String,
    pub metadata: StudiableMetadata,
    /// Owned sentence pairs in display order
    pub sentences: Vec<SentencePairId>,
}

impl Studiable {
    /// A freshly created studiable awaiting its pipeline job.
    pub fn pending(
        id: StudiableId,
        story_id: StoryId,
        title: impl Into<String>,
        metadata: StudiableMetadata,
    ) -> Self {
        Self {
            id,
            story_id,
            title: title.into(),
            raw_text: String::new(),
            metadata,
            sentences: Vec::new(),
        }
    }

    /// Whether the owning job recorded a failure.
    pub fn has_failed(&self) -> bool {
        self.metadata.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> LevelParams {
        LevelParams::builder()
            .language_level("B1")
            .age_level("college")
            .topic("travel")
            .conversation_type("dialogue")
            .min_sentence_length(4u32)
            .max_sentence_length(12u32)
            .build()
            .unwrap()
    }

    #[test]
    fn chapter_metadata_flattens_type_tag() {
        let meta = StudiableMetadata::chapter(2, &params());
        let json = serde_json::to_value(&meta).unwrap();

        assert_eq!(json["type"], "chapter");
        assert_eq!(json["chapter_number"], 2);
        assert_eq!(json["language_level"], "B1");
        assert_eq!(json["max_sentence_length"], 12);
        assert!(json.get("parent_studiable_id").is_none());
    }

    #[test]
    fn metadata_round_trips_through_json() {
        let mut meta = StudiableMetadata::chapter(1, &params());
        meta.error = Some("boom".to_string());

        let json = serde_json::to_string(&meta).unwrap();
        let back: StudiableMetadata = serde_json::from_str(&json).unwrap();

        assert_eq!(back, meta);
        assert_eq!(back.chapter_number(), Some(1));
    }

    #[test]
    fn pending_studiable_starts_empty() {
        let studiable =
            Studiable::pending(5, 1, "Chapter 1", StudiableMetadata::chapter(1, &params()));

        assert!(studiable.raw_text.is_empty());
        assert!(studiable.sentences.is_empty());
        assert!(!studiable.has_failed());
        assert!(studiable.metadata.is_chapter());
    }
}
