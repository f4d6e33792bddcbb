//! Typed errors for the generation pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Only three conditions
//! terminate a run: invalid input, generation failure, cancellation.
//! Everything else degrades the corresponding output field.

use thiserror::Error;

/// A malformed or unsupported request field.
///
/// Surfaced immediately by the normalizer; no partial run is attempted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    /// The offending request field
    pub field: String,

    /// Why the value was rejected
    pub reason: String,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors from the text-generation capability.
///
/// Fatal to the run after one bounded retry - no meaningful result
/// exists without a draft.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The backend itself failed
    #[error("generation backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The generation call exceeded its timeout
    #[error("generation timed out")]
    Timeout,

    /// The backend returned an empty draft
    #[error("backend returned an empty draft")]
    EmptyDraft,
}

impl GenerationError {
    /// Wrap an arbitrary backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }

    /// Wrap a backend error message.
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into().into())
    }
}

/// Errors from a single search provider call.
///
/// Contained inside the research aggregator; a failed query contributes
/// zero sources and never fails the run.
#[derive(Debug, Error)]
pub enum SearchError {
    /// HTTP transport failure
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Provider rate limit hit
    #[error("rate limit exceeded")]
    RateLimited,

    /// Provider call timed out
    #[error("search timed out")]
    Timeout,

    /// Provider returned an unparseable payload
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

impl SearchError {
    /// Wrap an arbitrary HTTP error.
    pub fn http(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Http(Box::new(err))
    }
}

/// Run-terminating errors returned by the orchestrator.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The request was invalid; nothing ran
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The text-generation capability failed after one retry
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// The run was cancelled by the caller or the run timeout
    #[error("run cancelled")]
    Cancelled,
}

impl PipelineError {
    /// Whether the caller's input caused the failure.
    pub fn is_caller_fault(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("content_type", "unknown value 'carousel'");
        assert_eq!(
            err.to_string(),
            "invalid content_type: unknown value 'carousel'"
        );
    }

    #[test]
    fn test_pipeline_error_distinguishes_faults() {
        let validation: PipelineError = ValidationError::new("topic", "required").into();
        assert!(validation.is_caller_fault());

        let generation: PipelineError = GenerationError::Timeout.into();
        assert!(!generation.is_caller_fault());
        assert!(!PipelineError::Cancelled.is_caller_fault());
    }
}
