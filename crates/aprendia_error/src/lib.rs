//! Error types for the Aprendia content generation service.
//!
//! Every error records the source location it was created at. Crate-specific
//! errors convert into [`AprendiaError`] through `?`.

mod config;
mod generation;
mod pipeline;
mod storage;
mod validation;

pub use config::{ConfigError, ConfigErrorKind};
pub use generation::{GenerationError, GenerationErrorKind};
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use storage::{EntityKind, StorageError, StorageErrorKind};
pub use validation::{ValidationError, ValidationErrorKind};

/// Crate-level error variants.
#[derive(Debug, derive_more::From)]
pub enum AprendiaErrorKind {
    /// Repository or audio cache failure
    Storage(StorageError),
    /// Text generation or speech synthesis failure
    Generation(GenerationError),
    /// Pipeline precondition failure
    Pipeline(PipelineError),
    /// Rejected request
    Validation(ValidationError),
    /// Configuration error
    Config(ConfigError),
}

impl std::fmt::Display for AprendiaErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AprendiaErrorKind::Storage(e) => write!(f, "{}", e),
            AprendiaErrorKind::Generation(e) => write!(f, "{}", e),
            AprendiaErrorKind::Pipeline(e) => write!(f, "{}", e),
            AprendiaErrorKind::Validation(e) => write!(f, "{}", e),
            AprendiaErrorKind::Config(e) => write!(f, "{}", e),
        }
    }
}

/// Aprendia error with kind discrimination.
#[derive(Debug)]
pub struct AprendiaError(Box<AprendiaErrorKind>);

impl AprendiaError {
    /// Create a new error from a kind.
    pub fn new(kind: AprendiaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AprendiaErrorKind {
        &self.0
    }

    /// The error description without source location, for end users.
    ///
    /// # Examples
    ///
    /// ```
    /// use aprendia_error::{AprendiaError, PipelineError, PipelineErrorKind};
    ///
    /// let err: AprendiaError =
    ///     PipelineError::new(PipelineErrorKind::ParentHasNoSentences(4)).into();
    /// assert_eq!(err.summary(), "Parent chapter 4 has no sentences");
    /// ```
    pub fn summary(&self) -> String {
        match self.kind() {
            AprendiaErrorKind::Storage(e) => e.kind.to_string(),
            AprendiaErrorKind::Generation(e) => e.kind.to_string(),
            AprendiaErrorKind::Pipeline(e) => e.kind.to_string(),
            AprendiaErrorKind::Validation(e) => e.kind.to_string(),
            AprendiaErrorKind::Config(e) => e.kind.to_string(),
        }
    }

    /// Returns true when a referenced entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind(), AprendiaErrorKind::Storage(e) if e.is_not_found())
    }

    /// Returns true when a provider failure might succeed if requested again.
    ///
    /// # Examples
    ///
    /// ```
    /// use aprendia_error::{
    ///     AprendiaError, GenerationError, GenerationErrorKind, ValidationError,
    ///     ValidationErrorKind,
    /// };
    ///
    /// let unavailable: AprendiaError = GenerationError::new(GenerationErrorKind::HttpError {
    ///     status_code: 503,
    ///     message: "Service unavailable".to_string(),
    /// })
    /// .into();
    /// assert!(unavailable.is_transient());
    ///
    /// let rejected: AprendiaError =
    ///     ValidationError::new(ValidationErrorKind::MissingField("type")).into();
    /// assert!(!rejected.is_transient());
    /// ```
    pub fn is_transient(&self) -> bool {
        matches!(self.kind(), AprendiaErrorKind::Generation(e) if e.kind.is_transient())
    }

    /// Returns true when the request itself was rejected.
    pub fn is_validation(&self) -> bool {
        matches!(self.kind(), AprendiaErrorKind::Validation(_))
    }
}

impl std::fmt::Display for AprendiaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Aprendia Error: {}", self.0)
    }
}

impl std::error::Error for AprendiaError {}

// Generic From implementation for any type that converts to AprendiaErrorKind
impl<T> From<T> for AprendiaError
where
    T: Into<AprendiaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Aprendia operations.
pub type AprendiaResult<T> = std::result::Result<T, AprendiaError>;
