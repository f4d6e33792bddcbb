//! Run-scoped pipeline configuration with documented defaults.

use std::time::Duration;

/// Configuration for a pipeline, supplied at construction time.
///
/// Every knob has a documented default; the hand-tuned values are
/// tunable, not load-bearing.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum number of search queries the planner produces.
    ///
    /// Default: 5.
    pub max_queries: usize,

    /// Concurrent research calls allowed, regardless of query count.
    ///
    /// The limiter backing this cap may be shared across runs to
    /// protect downstream provider rate limits. Default: 4.
    pub research_concurrency: usize,

    /// Per-query timeout for search provider calls.
    ///
    /// Default: 8 seconds.
    pub query_timeout: Duration,

    /// Maximum sources kept after dedup and ranking.
    ///
    /// Default: 20.
    pub max_sources: usize,

    /// Total character budget for the grounding context.
    ///
    /// Default: 6000.
    pub context_char_budget: usize,

    /// Timeout for a single text-generation call.
    ///
    /// Default: 30 seconds.
    pub generation_timeout: Duration,

    /// Minimum lexical-overlap confidence for a citation to be emitted.
    ///
    /// Default: 0.3.
    pub citation_floor: f32,

    /// Maximum supporting sources kept per claim.
    ///
    /// Default: 2.
    pub max_citations_per_claim: usize,

    /// Score threshold below which a recommendation is generated.
    ///
    /// Default: 0.7.
    pub score_threshold: f32,

    /// Maximum recommendations returned by the scorer.
    ///
    /// Default: 5.
    pub max_recommendations: usize,

    /// Overall run timeout; triggers cancellation when exceeded.
    ///
    /// Default: 60 seconds.
    pub run_timeout: Duration,

    /// Capacity of the per-run progress channel.
    ///
    /// Default: 64.
    pub progress_capacity: usize,

    /// How long an emit may wait on a slow consumer before the event
    /// is dropped.
    ///
    /// Default: 100 milliseconds.
    pub emit_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_queries: 5,
            research_concurrency: 4,
            query_timeout: Duration::from_secs(8),
            max_sources: 20,
            context_char_budget: 6_000,
            generation_timeout: Duration::from_secs(30),
            citation_floor: 0.3,
            max_citations_per_claim: 2,
            score_threshold: 0.7,
            max_recommendations: 5,
            run_timeout: Duration::from_secs(60),
            progress_capacity: 64,
            emit_timeout: Duration::from_millis(100),
        }
    }
}

impl PipelineConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum query count.
    pub fn with_max_queries(mut self, max: usize) -> Self {
        self.max_queries = max;
        self
    }

    /// Set the research concurrency cap.
    pub fn with_research_concurrency(mut self, cap: usize) -> Self {
        self.research_concurrency = cap.max(1);
        self
    }

    /// Set the per-query timeout.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Set the maximum retained source count.
    pub fn with_max_sources(mut self, max: usize) -> Self {
        self.max_sources = max;
        self
    }

    /// Set the grounding context character budget.
    pub fn with_context_char_budget(mut self, budget: usize) -> Self {
        self.context_char_budget = budget;
        self
    }

    /// Set the generation call timeout.
    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    /// Set the citation confidence floor.
    pub fn with_citation_floor(mut self, floor: f32) -> Self {
        self.citation_floor = floor.clamp(0.0, 1.0);
        self
    }

    /// Set the overall run timeout.
    pub fn with_run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout = timeout;
        self
    }

    /// Set the progress channel capacity.
    pub fn with_progress_capacity(mut self, capacity: usize) -> Self {
        self.progress_capacity = capacity.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = PipelineConfig::default();
        assert_eq!(c.max_queries, 5);
        assert_eq!(c.research_concurrency, 4);
        assert_eq!(c.query_timeout, Duration::from_secs(8));
        assert_eq!(c.max_sources, 20);
        assert_eq!(c.context_char_budget, 6_000);
        assert_eq!(c.citation_floor, 0.3);
        assert_eq!(c.max_citations_per_claim, 2);
        assert_eq!(c.score_threshold, 0.7);
        assert_eq!(c.run_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_builders_clamp() {
        let c = PipelineConfig::new()
            .with_research_concurrency(0)
            .with_citation_floor(2.0)
            .with_progress_capacity(0);
        assert_eq!(c.research_concurrency, 1);
        assert_eq!(c.citation_floor, 1.0);
        assert_eq!(c.progress_capacity, 1);
    }
}
