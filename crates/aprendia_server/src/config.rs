//! Service configuration.
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults
//! 2. an optional TOML file (`aprendia.toml` unless another path is given)
//! 3. `APRENDIA_`-prefixed environment variables, with `__` separating
//!    nested keys (`APRENDIA_GEMINI__MODEL`)
//!
//! `.env` files are read before the environment is consulted.

use aprendia_error::{ConfigError, ConfigErrorKind};
use aprendia_models::{
    GEMINI_BASE_URL, GEMINI_DEFAULT_MODEL, GeminiConfig, TTS_BASE_URL, TextToSpeechConfig,
};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "aprendia.toml";

/// Environment variable consulted when no Gemini key is configured.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct GeminiSettings {
    api_key: Option<String>,
    model: String,
    base_url: String,
    max_output_tokens: u32,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: GEMINI_DEFAULT_MODEL.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
            max_output_tokens: 2048,
        }
    }
}

/// Cloud Text-to-Speech settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct TtsSettings {
    /// Falls back to the Gemini key when unset
    api_key: Option<String>,
    base_url: String,
}

impl Default for TtsSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: TTS_BASE_URL.to_string(),
        }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to
    bind_address: String,
    /// Directory holding cached audio
    audio_dir: PathBuf,
    /// Public URL prefix audio is served under
    audio_url_prefix: String,
    /// Upper bound on simultaneously running jobs; 0 is unbounded
    max_concurrent_jobs: usize,
    /// Origins allowed by CORS
    cors_origins: Vec<String>,
    gemini: GeminiSettings,
    tts: TtsSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            audio_dir: PathBuf::from("static_audio"),
            audio_url_prefix: "/audio".to_string(),
            max_concurrent_jobs: 0,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:3001".to_string(),
            ],
            gemini: GeminiSettings::default(),
            tts: TtsSettings::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from defaults, `path` (or [`DEFAULT_CONFIG_FILE`])
    /// and the environment.
    ///
    /// An explicitly given file must exist; the default file is optional.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let (file, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let settings = config::Config::builder()
            .add_source(config::File::from(file.as_path()).required(required))
            .add_source(
                config::Environment::with_prefix("APRENDIA")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors_origins")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Load(e.to_string())))?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Load(e.to_string())))?;
        config.audio_url_prefix = config.audio_url_prefix.trim_end_matches('/').to_string();
        config.validate()?;

        debug!(
            bind_address = %config.bind_address,
            audio_dir = %config.audio_dir.display(),
            max_concurrent_jobs = config.max_concurrent_jobs,
            "Configuration loaded"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.audio_url_prefix.starts_with('/') {
            return Err(ConfigError::new(ConfigErrorKind::Invalid {
                field: "audio_url_prefix".to_string(),
                message: "must start with '/' and name a path below the root".to_string(),
            }));
        }
        if self.gemini.max_output_tokens == 0 {
            return Err(ConfigError::new(ConfigErrorKind::Invalid {
                field: "gemini.max_output_tokens".to_string(),
                message: "must be positive".to_string(),
            }));
        }
        Ok(())
    }

    /// The Gemini key from configuration, else from `GEMINI_API_KEY`.
    pub fn gemini_api_key(&self) -> Result<String, ConfigError> {
        self.gemini
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(GEMINI_API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::new(ConfigErrorKind::MissingApiKey(GEMINI_API_KEY_ENV)))
    }

    /// Connection settings for the Gemini client.
    pub fn gemini_config(&self) -> Result<GeminiConfig, ConfigError> {
        GeminiConfig::builder()
            .api_key(self.gemini_api_key()?)
            .model(self.gemini.model.clone())
            .base_url(self.gemini.base_url.clone())
            .max_output_tokens(Some(self.gemini.max_output_tokens))
            .build()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Load(e.to_string())))
    }

    /// Connection settings for the Text-to-Speech client.
    pub fn tts_config(&self) -> Result<TextToSpeechConfig, ConfigError> {
        let api_key = match self.tts.api_key.clone().filter(|k| !k.trim().is_empty()) {
            Some(key) => key,
            None => self.gemini_api_key()?,
        };
        TextToSpeechConfig::builder()
            .api_key(api_key)
            .base_url(self.tts.base_url.clone())
            .build()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Load(e.to_string())))
    }

    /// Copy with API keys masked, for display.
    pub fn redacted(&self) -> Self {
        let mask = |k: &Option<String>| k.as_ref().map(|_| "********".to_string());
        let mut copy = self.clone();
        copy.gemini.api_key = mask(&self.gemini.api_key);
        copy.tts.api_key = mask(&self.tts.api_key);
        copy
    }

    /// Replaces the bind address.
    pub fn with_bind_address(mut self, bind_address: impl Into<String>) -> Self {
        self.bind_address = bind_address.into();
        self
    }

    /// Replaces the audio directory.
    pub fn with_audio_dir(mut self, audio_dir: impl Into<PathBuf>) -> Self {
        self.audio_dir = audio_dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();

        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.audio_url_prefix(), "/audio");
        assert_eq!(*config.max_concurrent_jobs(), 0);
        assert_eq!(config.cors_origins().len(), 2);
        assert_eq!(config.gemini().model(), "gemini-2.5-flash");
        assert_eq!(*config.gemini().max_output_tokens(), 2048);
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "bind_address = \"127.0.0.1:9000\"\nmax_concurrent_jobs = 4\n\n\
             [gemini]\nmodel = \"gemini-2.0-pro\"\napi_key = \"file-key\"\n"
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(*config.max_concurrent_jobs(), 4);
        assert_eq!(config.gemini().model(), "gemini-2.0-pro");
        assert_eq!(config.gemini().base_url(), GEMINI_BASE_URL);
        assert_eq!(config.audio_url_prefix(), "/audio");

        let tts = config.tts_config().unwrap();
        assert_eq!(tts.api_key(), "file-key");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/aprendia.toml"))).unwrap_err();
        assert!(matches!(err.kind, ConfigErrorKind::Load(_)));
    }

    #[test]
    fn relative_audio_prefix_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "audio_url_prefix = \"audio\"").unwrap();

        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err.kind, ConfigErrorKind::Invalid { .. }));
    }

    #[test]
    fn root_audio_prefix_is_rejected() {
        for prefix in ["/", "//"] {
            let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
            writeln!(file, "audio_url_prefix = \"{}\"", prefix).unwrap();

            let err = AppConfig::load(Some(file.path())).unwrap_err();
            assert!(matches!(err.kind, ConfigErrorKind::Invalid { .. }), "{}", prefix);
        }
    }

    #[test]
    fn trailing_slash_is_trimmed_from_audio_prefix() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "audio_url_prefix = \"/media/audio/\"").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.audio_url_prefix(), "/media/audio");
    }

    #[test]
    fn redacted_hides_keys() {
        let mut config = AppConfig::default();
        config.gemini.api_key = Some("secret".to_string());

        let shown = config.redacted();
        assert_eq!(shown.gemini().api_key().as_deref(), Some("********"));
        assert!(shown.tts().api_key().is_none());
    }
}
