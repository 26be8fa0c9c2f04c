//! Google Cloud Text-to-Speech.

mod client;
mod dto;

pub use client::{TTS_BASE_URL, TextToSpeechClient, TextToSpeechConfig, TextToSpeechConfigBuilder};
pub use dto::{
    AudioConfig, SynthesisInput, SynthesizeSpeechRequest, SynthesizeSpeechResponse,
    VoiceSelectionParams, language_code,
};
