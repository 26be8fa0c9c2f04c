//! Google Gemini text generation.

mod client;
mod dto;

pub use client::{
    GEMINI_BASE_URL, GEMINI_DEFAULT_MODEL, GeminiClient, GeminiConfig, GeminiConfigBuilder,
};
pub use dto::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
};
