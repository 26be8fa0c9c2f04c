//! Leveling parameters that steer generation difficulty and style.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Audience age bands with a fixed descriptive vocabulary.
///
/// Requests carry the band as free text; values outside this set are still
/// accepted and rendered verbatim into prompts.
///
/// # Examples
///
/// ```
/// use aprendia_core::AgeBand;
///
/// let band: AgeBand = "pre_school".parse().unwrap();
/// assert_eq!(band.description(), "pre-school (ages 4-5)");
/// assert!("grandparents".parse::<AgeBand>().is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::Display,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AgeBand {
    Toddler,
    PreSchool,
    MiddleSchool,
    HighSchool,
    College,
}

impl AgeBand {
    /// Human-readable audience description used in prompts.
    pub fn description(&self) -> &'static str {
        match self {
            AgeBand::Toddler => "toddler (ages 2-3)",
            AgeBand::PreSchool => "pre-school (ages 4-5)",
            AgeBand::MiddleSchool => "middle school (ages 11-14)",
            AgeBand::HighSchool => "high school (ages 15-18)",
            AgeBand::College => "college (ages 18+)",
        }
    }
}

/// Narrative styles with a fixed descriptive vocabulary.
///
/// Like [`AgeBand`], unknown styles pass through verbatim.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::Display,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConversationStyle {
    InternalDialogue,
    Narration,
    FirstPerson,
    ThirdPerson,
    Dialogue,
}

impl ConversationStyle {
    /// Story format description used in chapter prompts.
    pub fn description(&self) -> &'static str {
        match self {
            ConversationStyle::InternalDialogue => {
                "internal dialogue (thoughts of a single character)"
            }
            ConversationStyle::Narration => {
                "narration for observer's language acquisition (describing events)"
            }
            ConversationStyle::FirstPerson => {
                "1st person narrative (story told from 'I' perspective)"
            }
            ConversationStyle::ThirdPerson => "story told from 3rd person omniscient narrator",
            ConversationStyle::Dialogue => "dialogue between two people",
        }
    }

    /// Shorter label used where the full description would be noise (titles).
    pub fn label(&self) -> &'static str {
        match self {
            ConversationStyle::InternalDialogue => "internal dialogue",
            ConversationStyle::Narration => "narration",
            ConversationStyle::FirstPerson => "1st person narrative",
            ConversationStyle::ThirdPerson => "3rd person narrative",
            ConversationStyle::Dialogue => "dialogue",
        }
    }
}

/// Default conversation style when neither request nor history supplies one.
pub const DEFAULT_CONVERSATION_TYPE: &str = "narration";
/// Default lower bound on words per generated sentence.
pub const DEFAULT_MIN_SENTENCE_LENGTH: u32 = 3;
/// Default upper bound on words per generated sentence.
pub const DEFAULT_MAX_SENTENCE_LENGTH: u32 = 10;
/// Language level assumed for quizzes whose parent chapter recorded none.
pub const DEFAULT_LANGUAGE_LEVEL: &str = "A1";

/// Complete set of leveling parameters for one chapter generation.
///
/// # Examples
///
/// ```
/// use aprendia_core::LevelParams;
///
/// let params = LevelParams::builder()
///     .language_level("A1")
///     .age_level("toddler")
///     .topic("cats")
///     .conversation_type("narration")
///     .min_sentence_length(3u32)
///     .max_sentence_length(10u32)
///     .build()
///     .unwrap();
///
/// assert_eq!(params.topic(), "cats");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct LevelParams {
    /// CEFR level such as `A1` or `B2`
    language_level: String,
    /// Audience age band, see [`AgeBand`]
    age_level: String,
    /// Story topic
    topic: String,
    /// Narrative style, see [`ConversationStyle`]
    conversation_type: String,
    /// Minimum words per sentence
    min_sentence_length: u32,
    /// Maximum words per sentence
    max_sentence_length: u32,
}

impl LevelParams {
    /// Returns a builder for constructing LevelParams.
    pub fn builder() -> LevelParamsBuilder {
        LevelParamsBuilder::default()
    }

    /// Creates parameters from already-resolved values.
    pub fn new(
        language_level: impl Into<String>,
        age_level: impl Into<String>,
        topic: impl Into<String>,
        conversation_type: impl Into<String>,
        min_sentence_length: u32,
        max_sentence_length: u32,
    ) -> Self {
        Self {
            language_level: language_level.into(),
            age_level: age_level.into(),
            topic: topic.into(),
            conversation_type: conversation_type.into(),
            min_sentence_length,
            max_sentence_length,
        }
    }
}
