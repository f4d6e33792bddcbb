//! The final artifact of a pipeline run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::citation::Citation;
use crate::types::metrics::QualityMetrics;
use crate::types::query::SearchQuery;
use crate::types::source::ResearchSource;

/// The finished content artifact handed back to the caller.
///
/// Created once at the end of a successful or degraded run and never
/// mutated afterwards. Persistence and display belong to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Run id, matching the run's progress events
    pub run_id: Uuid,

    /// The generated draft
    pub content: String,

    /// Claims mapped to supporting sources
    pub citations: Vec<Citation>,

    /// Quality signals for the draft
    pub quality_metrics: QualityMetrics,

    /// Research sources that informed the draft
    pub sources: Vec<ResearchSource>,

    /// Queries the planner produced for this run
    pub search_queries: Vec<SearchQuery>,

    /// False when grounding was skipped or produced no sources
    pub grounding_enabled: bool,

    /// Non-fatal notes from normalization (e.g. clamped constraints)
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::metrics::QualityMetrics;
    use crate::types::source::SourceId;

    #[test]
    fn test_result_serializes_for_the_consumer() {
        let source = ResearchSource::new("https://a.com/study", "Study", "snippet", 0.9);
        let result = GenerationResult {
            run_id: Uuid::new_v4(),
            content: "Draft.".to_string(),
            citations: vec![Citation::new(
                SourceId::from_parts("https://a.com/study", "Study"),
                "Draft.",
                0,
                0.8,
            )],
            quality_metrics: QualityMetrics::neutral(),
            sources: vec![source],
            search_queries: vec![SearchQuery::new("topic", 0)],
            grounding_enabled: true,
            warnings: vec![],
        };

        let json = serde_json::to_string(&result).unwrap();
        let parsed: GenerationResult = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.run_id, result.run_id);
        assert_eq!(parsed.citations[0].source_id, result.citations[0].source_id);
        assert!(parsed.grounding_enabled);
    }
}
