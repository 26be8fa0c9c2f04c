//! Generation provider error types.

/// Failure conditions reported by text-generation and speech-synthesis providers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenerationErrorKind {
    /// Failed to construct the provider client
    ClientCreation(String),
    /// Request could not be sent or the response body could not be read
    ApiRequest(String),
    /// Provider answered with a non-success status
    HttpError {
        /// HTTP status code
        status_code: u16,
        /// Response body or reason
        message: String,
    },
    /// Provider returned a response without usable content
    EmptyResponse(String),
    /// Synthesized audio payload was not valid base64
    Base64Decode(String),
    /// Provider response did not match the expected shape
    ResponseParsing(String),
}

impl std::fmt::Display for GenerationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationErrorKind::ClientCreation(msg) => {
                write!(f, "Failed to create provider client: {}", msg)
            }
            GenerationErrorKind::ApiRequest(msg) => write!(f, "Provider request failed: {}", msg),
            GenerationErrorKind::HttpError {
                status_code,
                message,
            } => write!(f, "HTTP {} error: {}", status_code, message),
            GenerationErrorKind::EmptyResponse(what) => {
                write!(f, "Provider returned no {}", what)
            }
            GenerationErrorKind::Base64Decode(msg) => write!(f, "Base64 decode error: {}", msg),
            GenerationErrorKind::ResponseParsing(msg) => {
                write!(f, "Failed to parse provider response: {}", msg)
            }
        }
    }
}

impl GenerationErrorKind {
    /// Whether a caller could reasonably try the same request again.
    ///
    /// The content pipeline never retries; this is informational for log
    /// readers and for callers that re-issue creation requests.
    pub fn is_transient(&self) -> bool {
        match self {
            GenerationErrorKind::HttpError { status_code, .. } => {
                matches!(*status_code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            GenerationErrorKind::ApiRequest(_) => true,
            _ => false,
        }
    }
}

/// Generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use aprendia_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::HttpError {
///     status_code: 503,
///     message: "Service unavailable".to_string(),
/// });
/// assert!(format!("{}", err).contains("HTTP 503"));
/// assert!(err.kind.is_transient());
/// ```
#[derive(Debug, Clone)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Generation Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for GenerationError {}
