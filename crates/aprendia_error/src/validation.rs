//! Request validation error types.

/// Ways a creation request can be rejected before any work is scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ValidationErrorKind {
    /// `type` was neither `chapter` nor `quiz`
    #[display("Invalid studiable type: {}", _0)]
    UnknownStudiableType(String),
    /// A field required by the selected request variant is absent
    #[display("Missing required field: {}", _0)]
    MissingField(&'static str),
    /// Locale is not a language tag made of ASCII letters, digits, `-` or `_`
    #[display("Invalid locale: {:?}", _0)]
    InvalidLocale(String),
    /// Sentence length bounds are inverted or zero
    #[display("Invalid sentence length bounds: {} to {}", min, max)]
    InvalidSentenceLength {
        /// Requested minimum words per sentence
        min: u32,
        /// Requested maximum words per sentence
        max: u32,
    },
}

/// Validation error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// Why the request was rejected
    pub kind: ValidationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new validation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
