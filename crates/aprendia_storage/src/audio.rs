//! Content-addressed audio artifact cache.
//!
//! Artifacts are keyed by `(locale, text)`: the same sentence spoken in the
//! same locale always lands in the same file, no matter which story or
//! chapter asked for it. Nothing is ever evicted.

use aprendia_error::{StorageError, StorageErrorKind};
use derive_getters::Getters;
use sha2::{Digest, Sha256};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, instrument};

/// File extension of synthesized audio.
pub const AUDIO_EXTENSION: &str = "mp3";

/// Number of hex characters kept from the SHA-256 digest.
const FINGERPRINT_LEN: usize = 16;

/// Location of one cached audio artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters)]
pub struct AudioArtifact {
    /// Path on disk
    path: PathBuf,
    /// Public path under the audio URL prefix
    url: String,
}

/// Locale-partitioned audio store rooted at one directory.
///
/// Layout: `{root}/{locale}/{locale}_{fingerprint}.mp3`, published as
/// `{url_prefix}/{locale}/{locale}_{fingerprint}.mp3`.
#[derive(Debug, Clone, Getters)]
pub struct AudioCache {
    root: PathBuf,
    url_prefix: String,
}

impl AudioCache {
    /// Create a cache rooted at `root`, publishing under `url_prefix`.
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        let url_prefix = url_prefix.into().trim_end_matches('/').to_string();
        Self {
            root: root.into(),
            url_prefix,
        }
    }

    /// Fixed-length fingerprint of `locale` followed by `text`.
    ///
    /// # Examples
    ///
    /// ```
    /// use aprendia_storage::AudioCache;
    ///
    /// let a = AudioCache::fingerprint("es", "Hola");
    /// assert_eq!(a.len(), 16);
    /// assert_eq!(a, AudioCache::fingerprint("es", "Hola"));
    /// assert_ne!(a, AudioCache::fingerprint("en", "Hola"));
    /// ```
    pub fn fingerprint(locale: &str, text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(locale.as_bytes());
        hasher.update(text.as_bytes());
        let digest = hasher.finalize();
        let mut hex = hex::encode(digest);
        hex.truncate(FINGERPRINT_LEN);
        hex
    }

    /// File name for `(locale, text)`.
    pub fn file_name(locale: &str, text: &str) -> String {
        format!(
            "{}_{}.{}",
            locale,
            Self::fingerprint(locale, text),
            AUDIO_EXTENSION
        )
    }

    fn locale_dir(&self, locale: &str) -> Result<PathBuf, StorageError> {
        let mut components = Path::new(locale).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(locale)),
            _ => Err(StorageError::new(StorageErrorKind::InvalidLocale(
                locale.to_string(),
            ))),
        }
    }

    fn artifact(&self, locale: &str, text: &str) -> Result<AudioArtifact, StorageError> {
        let file_name = Self::file_name(locale, text);
        Ok(AudioArtifact {
            path: self.locale_dir(locale)?.join(&file_name),
            url: format!("{}/{}/{}", self.url_prefix, locale, file_name),
        })
    }

    /// Resolve the artifact location for `(locale, text)`, creating the
    /// locale directory if needed.
    ///
    /// `locale` must be a single path component; anything that would leave
    /// the root is rejected.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn resolve(&self, locale: &str, text: &str) -> Result<AudioArtifact, StorageError> {
        let artifact = self.artifact(locale, text)?;
        if let Some(dir) = artifact.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| io_error(dir, e))?;
        }
        Ok(artifact)
    }

    /// Persist `audio` for `(locale, text)`, overwriting any previous bytes.
    ///
    /// Concurrent writes of the same key are harmless: the bytes are a pure
    /// function of the key.
    #[instrument(skip(self, text, audio), fields(text_len = text.len(), bytes = audio.len()))]
    pub async fn write(
        &self,
        locale: &str,
        text: &str,
        audio: &[u8],
    ) -> Result<AudioArtifact, StorageError> {
        let artifact = self.resolve(locale, text).await?;
        tokio::fs::write(&artifact.path, audio)
            .await
            .map_err(|e| io_error(&artifact.path, e))?;
        debug!(url = %artifact.url, "Audio artifact written");
        Ok(artifact)
    }

    /// Whether an artifact for `(locale, text)` is already on disk.
    pub async fn contains(&self, locale: &str, text: &str) -> bool {
        match self.artifact(locale, text) {
            Ok(artifact) => tokio::fs::try_exists(artifact.path).await.unwrap_or(false),
            Err(_) => false,
        }
    }
}

#[track_caller]
fn io_error(path: &Path, e: std::io::Error) -> StorageError {
    StorageError::new(StorageErrorKind::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
