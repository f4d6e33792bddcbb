//! Grounded Content Generation Pipeline
//!
//! Turns a content request (topic, audience, tone, platform
//! constraints) into a finished content artifact that is cross-checked
//! against external research, annotated with citations, scored for
//! quality, and streamed to a consumer as a sequence of progress
//! events.
//!
//! # Design Philosophy
//!
//! - Pluggable capabilities: generation and search backends are traits
//! - Degrade, don't die: only invalid input, generation failure, and
//!   cancellation terminate a run
//! - Confidence signal, not proof: grounding tells you how well a draft
//!   is supported, it does not certify facts
//! - No ambient state: preferences arrive as parameters, results leave
//!   as return values, nothing persists past a run
//!
//! # Usage
//!
//! ```rust,ignore
//! use grounded_content::{Pipeline, RawGenerationRequest, StoredPreferences};
//! use grounded_content::providers::{OpenAiGenerator, TavilySearchProvider};
//! use std::sync::Arc;
//!
//! let pipeline = Pipeline::new(OpenAiGenerator::new(openai_key, "gpt-4o-mini"))
//!     .with_provider(Arc::new(TavilySearchProvider::new(tavily_key)));
//!
//! let raw = RawGenerationRequest::new()
//!     .with_topic("remote work productivity")
//!     .with_grounding_level("enhanced");
//!
//! let result = pipeline.run(&raw, &StoredPreferences::new()).await?;
//! println!("{}", result.content);
//! for citation in &result.citations {
//!     println!("  [{}] {}", citation.source_id, citation.claim_text);
//! }
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Capability abstractions (TextGenerator, SearchProvider)
//! - [`types`] - Run-scoped data types
//! - [`pipeline`] - The staged pipeline and its orchestrator
//! - [`providers`] - Reference capability implementations
//! - [`security`] - Credential handling
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod pipeline;
pub mod providers;
pub mod security;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{GenerationError, PipelineError, SearchError, ValidationError};
pub use traits::{
    generator::TextGenerator,
    searcher::{SearchHit, SearchProvider},
};
pub use types::{
    citation::Citation,
    config::PipelineConfig,
    metrics::QualityMetrics,
    progress::{ProgressEvent, Stage, StageStatus},
    query::SearchQuery,
    request::{
        Constraints, ContentType, GenerationRequest, GroundingLevel, RawGenerationRequest,
        StoredPreferences,
    },
    result::GenerationResult,
    source::{ResearchSource, SourceId},
};

// Re-export the orchestrator and progress channel
pub use pipeline::{channel as progress_channel, Pipeline, ProgressSender};

// Re-export testing utilities
pub use testing::{MockGenerator, MockSearchProvider};
