//! Text-generation capability trait.
//!
//! The pipeline treats the generation backend as opaque: any service
//! that turns an instruction into draft text is acceptable. Reference
//! implementation: [`crate::providers::OpenAiGenerator`].

use async_trait::async_trait;

use crate::error::GenerationError;

/// Text-generation capability consumed by the pipeline.
///
/// Implementations wrap a specific backend (OpenAI-compatible API,
/// local model, etc.) and handle its transport and response parsing.
///
/// # Example
///
/// ```rust,ignore
/// let generator = OpenAiGenerator::new(api_key, "gpt-4o-mini");
/// let draft = generator.complete("Write a post about remote work").await?;
/// ```
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce draft text from an instruction.
    ///
    /// The instruction already embeds the request fields and any
    /// grounding excerpts; implementations should not add their own
    /// framing.
    async fn complete(&self, instruction: &str) -> Result<String, GenerationError>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    async fn complete(&self, instruction: &str) -> Result<String, GenerationError> {
        (**self).complete(instruction).await
    }
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for std::sync::Arc<T> {
    async fn complete(&self, instruction: &str) -> Result<String, GenerationError> {
        (**self).complete(instruction).await
    }
}
