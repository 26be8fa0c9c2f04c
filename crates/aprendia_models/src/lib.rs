//! Provider implementations of [`aprendia_interface::GenerationClient`].
//!
//! With the `gemini` feature (on by default) this crate offers a REST client
//! for Google Gemini text generation, a Cloud Text-to-Speech client, and
//! [`GoogleGenerationClient`] which combines the two.

#[cfg(feature = "gemini")]
mod gemini;
#[cfg(feature = "gemini")]
mod google;
#[cfg(feature = "gemini")]
mod tts;

#[cfg(feature = "gemini")]
pub use gemini::*;
#[cfg(feature = "gemini")]
pub use google::GoogleGenerationClient;
#[cfg(feature = "gemini")]
pub use tts::*;
