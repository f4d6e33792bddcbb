//! Search query types - produced by the planner, consumed by the aggregator.

use serde::{Deserialize, Serialize};

/// A single research query derived from the request.
///
/// Queries live for one pipeline run. `priority` orders dispatch under
/// the research concurrency cap - lower runs first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Query text sent to the search provider
    pub text: String,

    /// Restrict this query to the named provider, if set
    pub provider_hint: Option<String>,

    /// Dispatch priority; lower runs first
    pub priority: u8,
}

impl SearchQuery {
    /// Create a new query with the given priority.
    pub fn new(text: impl Into<String>, priority: u8) -> Self {
        Self {
            text: text.into(),
            provider_hint: None,
            priority,
        }
    }

    /// Restrict the query to a specific provider.
    pub fn with_provider_hint(mut self, provider: impl Into<String>) -> Self {
        self.provider_hint = Some(provider.into());
        self
    }
}
