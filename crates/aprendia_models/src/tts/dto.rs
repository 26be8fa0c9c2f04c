//! Data transfer objects for the Cloud Text-to-Speech `text:synthesize` API.

use serde::{Deserialize, Serialize};

/// Text to speak.
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisInput {
    pub text: String,
}

/// Voice selection; only the language is pinned.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSelectionParams {
    pub language_code: String,
}

/// Output encoding.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfig {
    pub audio_encoding: String,
}

/// `text:synthesize` request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeSpeechRequest {
    pub input: SynthesisInput,
    pub voice: VoiceSelectionParams,
    pub audio_config: AudioConfig,
}

/// `text:synthesize` response body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeSpeechResponse {
    /// Base64-encoded audio
    #[serde(default)]
    pub audio_content: String,
}

/// Language code accepted by the API for a locale tag.
///
/// Locale tags reach the service in several spellings (`es_co`, `es-CO`);
/// the API expects hyphenated BCP-47 with an upper-case region.
///
/// # Examples
///
/// ```
/// use aprendia_models::language_code;
///
/// assert_eq!(language_code("es_co"), "es-CO");
/// assert_eq!(language_code("en-us"), "en-US");
/// assert_eq!(language_code("fr"), "fr");
/// ```
pub fn language_code(locale: &str) -> String {
    let mut parts = locale.trim().split(['_', '-']);
    let language = parts.next().unwrap_or_default().to_lowercase();
    let rest: Vec<String> = parts
        .map(|p| {
            if p.len() == 2 {
                p.to_uppercase()
            } else {
                p.to_string()
            }
        })
        .collect();
    if rest.is_empty() {
        language
    } else {
        format!("{}-{}", language, rest.join("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_in_camel_case() {
        let req = SynthesizeSpeechRequest {
            input: SynthesisInput {
                text: "Hola".to_string(),
            },
            voice: VoiceSelectionParams {
                language_code: "es-CO".to_string(),
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3".to_string(),
            },
        };
        let value = serde_json::to_value(&req).unwrap();

        assert_eq!(value["input"]["text"], "Hola");
        assert_eq!(value["voice"]["languageCode"], "es-CO");
        assert_eq!(value["audioConfig"]["audioEncoding"], "MP3");
    }

    #[test]
    fn script_subtags_keep_their_case() {
        assert_eq!(language_code("zh_Hant_TW"), "zh-Hant-TW");
    }
}
