//! Configuration error types.

/// Specific configuration failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ConfigErrorKind {
    /// Configuration sources could not be read or merged
    #[display("Failed to load configuration: {}", _0)]
    Load(String),
    /// A field holds a value the service cannot use
    #[display("Invalid value for '{}': {}", field, message)]
    Invalid {
        /// Offending field
        field: String,
        /// Why the value was rejected
        message: String,
    },
    /// Provider credentials are absent
    #[display("Missing API key: set {} or the matching config field", _0)]
    MissingApiKey(&'static str),
}

/// Configuration error with source location.
///
/// # Examples
///
/// ```
/// use aprendia_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::MissingApiKey("GEMINI_API_KEY"));
/// assert!(format!("{}", err).contains("GEMINI_API_KEY"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// The specific configuration failure
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError at the current location.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
