//! Prompt templates for chapter, quiz and title generation.
//!
//! Every builder is a pure function. Chapter and quiz prompts ask the model
//! for one `first|second` pair per line, which is the contract
//! [`parse_pairs`](crate::parse_pairs) reads back.

use aprendia_core::{AgeBand, ConversationStyle, LevelParams};
use std::str::FromStr;

/// Example line shown to the model in chapter prompts.
const CHAPTER_EXAMPLE: &str = "Hello, how are you?|Hola, ¿cómo estás?";

/// Prompt description for an age band; unknown bands pass through verbatim.
pub fn describe_age_level(age_level: &str) -> String {
    AgeBand::from_str(age_level)
        .map(|band| band.description().to_string())
        .unwrap_or_else(|_| age_level.to_string())
}

/// Prompt description for a conversation style; unknown styles pass through verbatim.
pub fn describe_conversation_type(conversation_type: &str) -> String {
    ConversationStyle::from_str(conversation_type)
        .map(|style| style.description().to_string())
        .unwrap_or_else(|_| conversation_type.to_string())
}

fn describe_conversation_label(conversation_type: &str) -> String {
    ConversationStyle::from_str(conversation_type)
        .map(|style| style.label().to_string())
        .unwrap_or_else(|_| conversation_type.to_string())
}

fn level_requirements(source_locale: &str, target_locale: &str, params: &LevelParams) -> String {
    format!(
        "- Language level: {level} (CEFR)\n\
         - Target audience age: {age}\n\
         - Topic: {topic}\n\
         - Story format: {format}\n\
         - Source language: {source_locale}\n\
         - Target language: {target_locale}\n\
         - Sentence length: {min} to {max} words per sentence\n",
        level = params.language_level(),
        age = describe_age_level(params.age_level()),
        topic = params.topic(),
        format = describe_conversation_type(params.conversation_type()),
        min = params.min_sentence_length(),
        max = params.max_sentence_length(),
    )
}

/// Prompt for the first chapter of a new story.
///
/// # Examples
///
/// ```
/// use aprendia_core::LevelParams;
/// use aprendia_pipeline::new_story_prompt;
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
/// let prompt = new_story_prompt("en", "es", &params);
/// assert!(prompt.contains("toddler (ages 2-3)"));
/// assert!(prompt.contains("source_text|target_text"));
/// ```
pub fn new_story_prompt(source_locale: &str, target_locale: &str, params: &LevelParams) -> String {
    let level = params.language_level();
    format!(
        "Create the first chapter of a unique, interesting story for language learning.\n\
         \n\
         REQUIREMENTS:\n\
         {requirements}\
         - The story should be grounded in real-life scenarios\n\
         - Make it engaging and suitable for spanning multiple chapters\n\
         \n\
         OUTPUT FORMAT:\n\
         - Each sentence on a separate line\n\
         - Format: source_text|target_text\n\
         - Example: \"{CHAPTER_EXAMPLE}\"\n\
         - Create 8-12 sentences for this chapter\n\
         - Ensure vocabulary and grammar are appropriate for {level} level\n\
         \n\
         Create a story that will help the learner practice new vocabulary and grammar at the {level} level.\n",
        requirements = level_requirements(source_locale, target_locale, params),
    )
}

/// Prompt continuing an existing story.
///
/// `previous_story_text` is embedded whole so the continuation stays grounded.
pub fn next_chapter_prompt(
    previous_story_text: &str,
    source_locale: &str,
    target_locale: &str,
    params: &LevelParams,
) -> String {
    let level = params.language_level();
    format!(
        "Continue the following story with the next chapter.\n\
         \n\
         PREVIOUS STORY:\n\
         {previous_story_text}\n\
         \n\
         REQUIREMENTS FOR NEXT CHAPTER:\n\
         {requirements}\
         - Continue the story naturally from where it left off\n\
         - Do not repeat sentences from the previous story\n\
         - Introduce new vocabulary and grammar appropriate for {level} level\n\
         \n\
         OUTPUT FORMAT:\n\
         - Each sentence on a separate line\n\
         - Format: source_text|target_text\n\
         - Example: \"{CHAPTER_EXAMPLE}\"\n\
         - Create 8-12 sentences for this chapter\n\
         - Maintain consistency with the previous story\n\
         \n\
         Create the next chapter that continues the narrative and helps the learner practice new vocabulary and grammar.\n",
        requirements = level_requirements(source_locale, target_locale, params),
    )
}

/// Prompt deriving five cloze questions from a chapter's sentence pairs.
///
/// `chapter_sentences` holds `(source, target)` pairs in chapter order.
pub fn quiz_prompt(
    chapter_sentences: &[(String, String)],
    target_locale: &str,
    language_level: &str,
) -> String {
    let sentences = chapter_sentences
        .iter()
        .map(|(source, target)| format!("- {} | {}", source, target))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Create a quiz to test vocabulary and grammar from the following chapter.\n\
         \n\
         CHAPTER SENTENCES:\n\
         {sentences}\n\
         \n\
         REQUIREMENTS:\n\
         - Create exactly 5 cloze-style fill-in-the-blank questions\n\
         - Questions should test NEW vocabulary or grammar introduced in this chapter\n\
         - All questions and answers must be in {target_locale} only\n\
         - Questions should closely mirror sentences from the chapter\n\
         - Make questions conversational and natural\n\
         - Language level: {language_level}\n\
         \n\
         QUESTION FORMAT EXAMPLES:\n\
         1. If sentence is \"Let's put the drawing on the refrigerator\"\n   \
            Question: \"Let's put the drawing on the what?\"\n   \
            Answer: \"the refrigerator\"\n\
         \n\
         2. If sentence is \"'I'm a little busy today.' John said.\"\n   \
            Question: \"'I'm a little busy today.' John <BLANK>.\"\n   \
            Answer: \"said\"\n\
         \n\
         OUTPUT FORMAT:\n\
         - Each question-answer pair on a separate line\n\
         - Format: question|answer\n\
         - Example: \"Let's put the drawing on the what?|the refrigerator\"\n\
         - Create exactly 5 question-answer pairs\n\
         - Focus on testing the most important vocabulary and grammar from the chapter\n\
         \n\
         Create 5 quiz questions now:\n"
    )
}

/// Prompt asking for a short story title.
pub fn title_prompt(
    topic: &str,
    language_level: &str,
    age_level: &str,
    conversation_type: &str,
) -> String {
    format!(
        "Create a short, engaging title for a language learning story with these characteristics:\n\
         \n\
         STORY PARAMETERS:\n\
         - Topic: {topic}\n\
         - Language level: {language_level} (CEFR)\n\
         - Target audience: {age}\n\
         - Story format: {format}\n\
         \n\
         REQUIREMENTS:\n\
         - Title should be 3-5 words\n\
         - Make it engaging and relevant to the topic\n\
         - Appropriate for the target audience age\n\
         - Should hint at the story's theme without being too specific\n\
         \n\
         OUTPUT:\n\
         Provide ONLY the title text, nothing else. No quotes, no explanation.\n\
         \n\
         Example titles:\n\
         - \"Adventure in Barcelona\"\n\
         - \"The Lost Passport\"\n\
         - \"Family Road Trip\"\n\
         - \"A Day at the Market\"\n\
         \n\
         Create the title now:\n",
        age = describe_age_level(age_level),
        format = describe_conversation_label(conversation_type),
    )
}
