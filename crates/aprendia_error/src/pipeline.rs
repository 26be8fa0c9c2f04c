//! Content pipeline error types.

/// Preconditions a pipeline job checks before calling any provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PipelineErrorKind {
    /// Quiz parent exists but is itself a quiz
    #[display("Studiable {} is not a chapter", _0)]
    ParentNotChapter(u64),
    /// Quiz parent chapter has not produced any sentence pairs yet
    #[display("Parent chapter {} has no sentences", _0)]
    ParentHasNoSentences(u64),
}

/// Pipeline error with location tracking.
///
/// # Examples
///
/// ```
/// use aprendia_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::ParentHasNoSentences(3));
/// assert!(format!("{}", err).contains("no sentences"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The failed precondition
    pub kind: PipelineErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new pipeline error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
