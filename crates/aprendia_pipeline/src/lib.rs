//! Content generation pipeline for Aprendia.
//!
//! - [`prompts`](crate::new_story_prompt) render leveling parameters into
//!   instructions for the text provider
//! - [`parse_pairs`] turns `first|second` lines into ordered pairs
//! - [`ContentPipeline`] runs chapter and quiz jobs end to end
//! - [`JobRunner`] detaches jobs from the request that created them
//! - [`JobMetrics`] counts job outcomes

mod jobs;
mod metrics;
mod parser;
mod pipeline;
mod prompts;

pub use jobs::JobRunner;
pub use metrics::{JobKind, JobMetrics, JobMetricsSnapshot};
pub use parser::{PAIR_SEPARATOR, ParsedPair, parse_pairs};
pub use pipeline::ContentPipeline;
pub use prompts::{
    describe_age_level, describe_conversation_type, new_story_prompt, next_chapter_prompt,
    quiz_prompt, title_prompt,
};
