//! Reference implementations of the pluggable capabilities.
//!
//! The pipeline only depends on the traits in [`crate::traits`]; these
//! concrete backends show the contracts are implementable and cover the
//! common case.

mod openai;
mod tavily;

pub use openai::OpenAiGenerator;
pub use tavily::TavilySearchProvider;
