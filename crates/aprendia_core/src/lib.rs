//! Core data types for the Aprendia content generation service.
//!
//! Stories own studiables (chapters and quizzes); studiables own ordered
//! sentence pairs. Leveling parameters describe how a chapter is generated.

mod level;
mod observability;
mod sentence;
mod story;
mod studiable;

pub use level::{
    AgeBand, ConversationStyle, DEFAULT_CONVERSATION_TYPE, DEFAULT_LANGUAGE_LEVEL,
    DEFAULT_MAX_SENTENCE_LENGTH, DEFAULT_MIN_SENTENCE_LENGTH, LevelParams, LevelParamsBuilder,
};
pub use observability::{MetricsExporter, ObservabilityGuard, init_observability};
pub use sentence::{SentencePair, SentencePairId};
pub use story::{Story, StoryId, StoryMetadata};
pub use studiable::{Studiable, StudiableId, StudiableKind, StudiableMetadata};
