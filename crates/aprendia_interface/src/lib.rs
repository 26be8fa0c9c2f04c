//! Trait definitions for the Aprendia content generation service.
//!
//! The content pipeline is written against these traits so that providers
//! and storage can be swapped without touching orchestration code:
//! - [`GenerationClient`] - text generation and speech synthesis
//! - [`ContentRepository`] - story, studiable and sentence pair storage

mod generation;
mod repository;

pub use generation::GenerationClient;
pub use repository::{ContentRepository, StudiableMutation};
