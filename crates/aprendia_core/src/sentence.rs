//! Sentence pairs: aligned bilingual units with audio.

use serde::{Deserialize, Serialize};

/// Identifier of a [`SentencePair`].
pub type SentencePairId = u64;

/// One aligned bilingual (or answer/question) unit with its audio paths.
///
/// Audio fields hold public paths resolved by the audio cache, or an empty
/// string when no audio was produced. `order` is the zero-based position
/// within the owning studiable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SentencePair {
    pub id: SentencePairId,
    pub source_text: String,
    pub target_text: String,
    #[serde(default)]
    pub source_audio: String,
    #[serde(default)]
    pub target_audio: String,
    pub order: usize,
}
