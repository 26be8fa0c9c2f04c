//! Stories: the top-level learning unit.

use serde::{Deserialize, Serialize};

/// Identifier of a [`Story`].
pub type StoryId = u64;

/// Leveling parameters recorded on a story at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct StoryMetadata {
    pub language_level: String,
    pub age_level: String,
    pub topic: String,
}

/// A learning unit grouping chapters and quizzes in one locale pair.
///
/// # Examples
///
/// ```
/// use aprendia_core::{Story, StoryMetadata};
///
/// let story = Story {
///     id: 1,
///     title: "Cats".to_string(),
///     source_locale: "en".to_string(),
///     target_locale: "es".to_string(),
///     metadata: StoryMetadata::default(),
/// };
/// assert_eq!(story.target_locale, "es");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: StoryId,
    pub title: String,
    /// Locale of the learner's known language
    pub source_locale: String,
    /// Locale being learned
    pub target_locale: String,
    pub metadata: StoryMetadata,
}
