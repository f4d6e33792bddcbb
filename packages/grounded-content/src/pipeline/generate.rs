//! Draft generation - the one fatal stage.
//!
//! Delegates to the pluggable text-generation capability with a
//! deterministic instruction. At most one bounded retry with the same
//! input; after that the failure surfaces and the run aborts.

use tracing::{info, warn};

use crate::error::GenerationError;
use crate::pipeline::context::GroundingContext;
use crate::pipeline::prompts::format_generation_prompt;
use crate::traits::generator::TextGenerator;
use crate::types::config::PipelineConfig;
use crate::types::request::GenerationRequest;

/// Total attempts per run: the initial call plus one retry.
const MAX_ATTEMPTS: usize = 2;

/// Produce the content draft.
///
/// Each attempt carries its own timeout. An empty draft counts as a
/// failure and is retried like any other.
pub async fn generate_draft<G: TextGenerator>(
    generator: &G,
    request: &GenerationRequest,
    grounding: Option<&GroundingContext>,
    config: &PipelineConfig,
) -> Result<String, GenerationError> {
    let instruction = format_generation_prompt(request, grounding);

    let mut last_error = GenerationError::EmptyDraft;

    for attempt in 1..=MAX_ATTEMPTS {
        let result = tokio::time::timeout(
            config.generation_timeout,
            generator.complete(&instruction),
        )
        .await;

        match result {
            Ok(Ok(draft)) if !draft.trim().is_empty() => {
                info!(attempt, chars = draft.len(), "Draft generated");
                return Ok(draft);
            }
            Ok(Ok(_)) => {
                warn!(attempt, "Backend returned an empty draft");
                last_error = GenerationError::EmptyDraft;
            }
            Ok(Err(e)) => {
                warn!(attempt, error = %e, "Generation attempt failed");
                last_error = e;
            }
            Err(_) => {
                warn!(attempt, "Generation attempt timed out");
                last_error = GenerationError::Timeout;
            }
        }
    }

    Err(last_error)
}
