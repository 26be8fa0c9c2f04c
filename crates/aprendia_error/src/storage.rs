//! Storage error types.

/// Entity kinds held by the content repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum EntityKind {
    /// A story
    #[display("Story")]
    Story,
    /// A chapter or quiz
    #[display("Studiable")]
    Studiable,
    /// A sentence pair
    #[display("SentencePair")]
    SentencePair,
}

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Entity not present in the repository
    #[display("{} {} not found", entity, id)]
    NotFound {
        /// Kind of the missing entity
        entity: EntityKind,
        /// Requested identifier
        id: u64,
    },
    /// Locale is not a single directory name under the audio root
    #[display("Invalid audio locale: {:?}", _0)]
    InvalidLocale(String),
    /// I/O error while reading or writing an audio artifact
    #[display("I/O error at {}: {}", path, message)]
    Io {
        /// Path involved in the failed operation
        path: String,
        /// Underlying error message
        message: String,
    },
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use aprendia_error::{EntityKind, StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NotFound {
///     entity: EntityKind::Story,
///     id: 7,
/// });
/// assert!(format!("{}", err).contains("Story 7 not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a missing entity.
    #[track_caller]
    pub fn not_found(entity: EntityKind, id: u64) -> Self {
        Self::new(StorageErrorKind::NotFound { entity, id })
    }

    /// Returns true when the error reports a missing entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, StorageErrorKind::NotFound { .. })
    }
}
