//! The generation pipeline - the core of the library.
//!
//! The pipeline orchestrates:
//! - Request normalization (merge, validate, clamp)
//! - Query planning (heuristic + synthesized research queries)
//! - Research aggregation (concurrent fan-out, dedup, ranking)
//! - Grounding context assembly (bounded excerpt bundle)
//! - Draft generation (the one fatal stage, with one bounded retry)
//! - Citation extraction (claims mapped to sources)
//! - Quality scoring (deterministic rule checks)
//! - Progress reporting (bounded, drop-on-slow event stream)

pub mod citations;
pub mod context;
pub mod generate;
pub mod normalize;
pub mod orchestrator;
pub mod planner;
pub mod progress;
pub mod prompts;
pub mod research;
pub mod scoring;

pub use citations::extract;
pub use context::{build, GroundingContext};
pub use generate::generate_draft;
pub use normalize::{normalize, NormalizedRequest};
pub use orchestrator::Pipeline;
pub use planner::plan;
pub use progress::{channel, ProgressSender};
pub use prompts::{
    format_generation_prompt, format_synthesize_queries_prompt, GENERATION_PROMPT,
    SYNTHESIZE_QUERIES_PROMPT,
};
pub use research::{aggregate, ResearchOutcome};
pub use scoring::score;
