//! Storage for the Aprendia content generation service.
//!
//! - [`InMemoryRepository`] implements [`aprendia_interface::ContentRepository`]
//! - [`AudioCache`] persists synthesized speech by content fingerprint

mod audio;
mod repository;

pub use audio::{AUDIO_EXTENSION, AudioArtifact, AudioCache};
pub use repository::InMemoryRepository;
