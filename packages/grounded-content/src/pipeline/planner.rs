//! Query planning - derive a bounded set of research queries.
//!
//! Deterministic for identical input (given a deterministic generator),
//! which keeps planning cacheable and testable.

use tracing::{debug, warn};

use crate::pipeline::prompts::format_synthesize_queries_prompt;
use crate::traits::generator::TextGenerator;
use crate::types::config::PipelineConfig;
use crate::types::query::SearchQuery;
use crate::types::request::{GenerationRequest, GroundingLevel};

/// Number of generator-synthesized queries attempted at Enhanced level.
const SYNTHESIZED_QUERIES: usize = 2;

/// Derive search queries from a normalized request.
///
/// Returns an empty list when grounding is off, in which case the
/// research and context stages do not run at all. Synthesis failures at
/// Enhanced level are non-fatal: the heuristic queries are returned alone.
pub async fn plan<G: TextGenerator>(
    request: &GenerationRequest,
    generator: &G,
    config: &PipelineConfig,
) -> Vec<SearchQuery> {
    if request.grounding_level == GroundingLevel::Off {
        return Vec::new();
    }

    let mut queries = vec![SearchQuery::new(request.topic.clone(), 0)];

    if !request.industry.trim().is_empty() && request.industry != "general" {
        queries.push(SearchQuery::new(
            format!("{} {}", request.topic, request.industry),
            1,
        ));
    }

    queries.push(SearchQuery::new(format!("{} trends", request.topic), 2));

    if request.grounding_level == GroundingLevel::Enhanced {
        match synthesize_queries(request, generator).await {
            Ok(extra) => {
                for (i, text) in extra.into_iter().take(SYNTHESIZED_QUERIES).enumerate() {
                    queries.push(SearchQuery::new(text, 3 + i as u8));
                }
            }
            Err(e) => {
                warn!(error = %e, "Query synthesis failed; using heuristic queries only");
            }
        }
    }

    queries.truncate(config.max_queries.max(1));
    debug!(count = queries.len(), topic = %request.topic, "Query plan ready");
    queries
}

/// Ask the generation capability for additional query suggestions.
async fn synthesize_queries<G: TextGenerator>(
    request: &GenerationRequest,
    generator: &G,
) -> Result<Vec<String>, crate::error::GenerationError> {
    let instruction = format_synthesize_queries_prompt(request, SYNTHESIZED_QUERIES);
    let response = generator.complete(&instruction).await?;

    Ok(response
        .lines()
        .map(|line| line.trim().trim_start_matches(['-', '*', ' ']).trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockGenerator;
    use crate::types::request::{Constraints, ContentType};

    fn request(level: GroundingLevel) -> GenerationRequest {
        GenerationRequest {
            topic: "remote work productivity".to_string(),
            industry: "technology".to_string(),
            tone: "professional".to_string(),
            audience: "managers".to_string(),
            content_type: ContentType::Post,
            constraints: Constraints::new(),
            grounding_level: level,
        }
    }

    #[tokio::test]
    async fn test_off_produces_no_queries() {
        let generator = MockGenerator::new();
        let queries = plan(
            &request(GroundingLevel::Off),
            &generator,
            &PipelineConfig::default(),
        )
        .await;
        assert!(queries.is_empty());
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_basic_produces_heuristic_queries() {
        let generator = MockGenerator::new();
        let queries = plan(
            &request(GroundingLevel::Basic),
            &generator,
            &PipelineConfig::default(),
        )
        .await;

        assert_eq!(queries.len(), 3);
        assert_eq!(queries[0].text, "remote work productivity");
        assert_eq!(queries[1].text, "remote work productivity technology");
        assert_eq!(queries[2].text, "remote work productivity trends");
        // The generator is only consulted at Enhanced level
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generic_industry_skips_industry_query() {
        let mut req = request(GroundingLevel::Basic);
        req.industry = "general".to_string();
        let queries = plan(&req, &MockGenerator::new(), &PipelineConfig::default()).await;
        assert_eq!(queries.len(), 2);
    }

    #[tokio::test]
    async fn test_enhanced_adds_synthesized_queries() {
        let generator = MockGenerator::new()
            .with_response("hybrid meeting fatigue data\nasync collaboration statistics");
        let queries = plan(
            &request(GroundingLevel::Enhanced),
            &generator,
            &PipelineConfig::default(),
        )
        .await;

        assert_eq!(queries.len(), 5);
        assert_eq!(queries[3].text, "hybrid meeting fatigue data");
        assert_eq!(queries[4].text, "async collaboration statistics");
        assert_eq!(queries[4].priority, 4);
    }

    #[tokio::test]
    async fn test_enhanced_caps_synthesized_queries() {
        let generator = MockGenerator::new().with_response("one\ntwo\nthree\nfour");
        let queries = plan(
            &request(GroundingLevel::Enhanced),
            &generator,
            &PipelineConfig::default(),
        )
        .await;
        assert_eq!(queries.len(), 5);
    }

    #[tokio::test]
    async fn test_synthesis_failure_degrades_to_heuristics() {
        let generator = MockGenerator::failing();
        let queries = plan(
            &request(GroundingLevel::Enhanced),
            &generator,
            &PipelineConfig::default(),
        )
        .await;
        assert_eq!(queries.len(), 3);
    }

    #[tokio::test]
    async fn test_plan_respects_max_queries() {
        let config = PipelineConfig::default().with_max_queries(2);
        let queries = plan(&request(GroundingLevel::Basic), &MockGenerator::new(), &config).await;
        assert_eq!(queries.len(), 2);
    }

    #[tokio::test]
    async fn test_plan_is_deterministic() {
        let config = PipelineConfig::default();
        let req = request(GroundingLevel::Basic);
        let a = plan(&req, &MockGenerator::new(), &config).await;
        let b = plan(&req, &MockGenerator::new(), &config).await;
        assert_eq!(a, b);
    }
}
