//! Grounding context assembly - a bounded bundle of source excerpts.
//!
//! Highest-ranked sources are included greedily under a total character
//! budget. The last included excerpt is truncated rather than dropped,
//! preserving source diversity. Deterministic for the same ranked list.

use std::collections::BTreeMap;

use tracing::debug;

use crate::types::config::PipelineConfig;
use crate::types::request::GenerationRequest;
use crate::types::source::{ResearchSource, SourceId};

/// The research bundle handed to the generation stage.
#[derive(Debug, Clone, Default)]
pub struct GroundingContext {
    /// Rendered excerpts, ready for embedding in the instruction
    pub excerpts: String,

    /// Source id to 1-based ordinal, matching the rendered `[n]` labels
    pub source_index: BTreeMap<SourceId, usize>,
}

impl GroundingContext {
    /// An empty context (no sources included).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether any source made it into the bundle.
    pub fn is_empty(&self) -> bool {
        self.source_index.is_empty()
    }

    /// Number of sources included.
    pub fn len(&self) -> usize {
        self.source_index.len()
    }
}

/// Assemble the grounding context from ranked sources.
pub fn build(
    sources: &[ResearchSource],
    _request: &GenerationRequest,
    config: &PipelineConfig,
) -> GroundingContext {
    let budget = config.context_char_budget;
    let mut excerpts = String::new();
    let mut source_index = BTreeMap::new();

    for (i, source) in sources.iter().enumerate() {
        let ordinal = i + 1;
        let rendered = render_excerpt(ordinal, source);

        let remaining = budget.saturating_sub(excerpts.len());
        if remaining == 0 {
            break;
        }

        if rendered.len() <= remaining {
            excerpts.push_str(&rendered);
            source_index.insert(source.id.clone(), ordinal);
        } else {
            // Truncate the last excerpt instead of dropping the source
            excerpts.push_str(truncate_at_char_boundary(&rendered, remaining));
            source_index.insert(source.id.clone(), ordinal);
            break;
        }
    }

    debug!(
        included = source_index.len(),
        chars = excerpts.len(),
        budget,
        "Grounding context built"
    );

    GroundingContext {
        excerpts,
        source_index,
    }
}

/// Render one source as a labeled excerpt block.
fn render_excerpt(ordinal: usize, source: &ResearchSource) -> String {
    format!(
        "[{}] {} ({})\n{}\n\n",
        ordinal, source.title, source.url, source.snippet
    )
}

/// Slice a string to at most `max` bytes without splitting a character.
fn truncate_at_char_boundary(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::request::{Constraints, ContentType, GenerationRequest, GroundingLevel};

    fn request() -> GenerationRequest {
        GenerationRequest {
            topic: "remote work".to_string(),
            industry: "technology".to_string(),
            tone: "professional".to_string(),
            audience: "managers".to_string(),
            content_type: ContentType::Post,
            constraints: Constraints::new(),
            grounding_level: GroundingLevel::Basic,
        }
    }

    fn source(n: usize, snippet: &str) -> ResearchSource {
        ResearchSource::new(
            format!("https://example.com/{}", n),
            format!("Source {}", n),
            snippet,
            1.0 - n as f32 * 0.1,
        )
    }

    #[test]
    fn test_includes_sources_in_rank_order() {
        let sources = vec![source(1, "first"), source(2, "second")];
        let ctx = build(&sources, &request(), &PipelineConfig::default());

        assert_eq!(ctx.len(), 2);
        assert!(ctx.excerpts.contains("[1] Source 1"));
        assert!(ctx.excerpts.contains("[2] Source 2"));
        assert_eq!(ctx.source_index.get(&sources[0].id), Some(&1));
        assert_eq!(ctx.source_index.get(&sources[1].id), Some(&2));
    }

    #[test]
    fn test_budget_truncates_last_excerpt() {
        let long_snippet = "x".repeat(500);
        let sources = vec![source(1, &long_snippet), source(2, &long_snippet)];
        let config = PipelineConfig::default().with_context_char_budget(700);

        let ctx = build(&sources, &request(), &config);

        // Second source is truncated, not dropped
        assert_eq!(ctx.len(), 2);
        assert!(ctx.excerpts.len() <= 700);
        assert!(ctx.excerpts.contains("[2] Source 2"));
    }

    #[test]
    fn test_budget_exhausted_stops_inclusion() {
        let long_snippet = "x".repeat(500);
        let sources = vec![
            source(1, &long_snippet),
            source(2, &long_snippet),
            source(3, &long_snippet),
        ];
        let config = PipelineConfig::default().with_context_char_budget(600);

        let ctx = build(&sources, &request(), &config);

        assert_eq!(ctx.len(), 2);
        assert!(!ctx.excerpts.contains("[3]"));
    }

    #[test]
    fn test_empty_sources_yield_empty_context() {
        let ctx = build(&[], &request(), &PipelineConfig::default());
        assert!(ctx.is_empty());
        assert!(ctx.excerpts.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let sources = vec![source(1, "first"), source(2, "second")];
        let a = build(&sources, &request(), &PipelineConfig::default());
        let b = build(&sources, &request(), &PipelineConfig::default());
        assert_eq!(a.excerpts, b.excerpts);
        assert_eq!(a.source_index, b.source_index);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "héllo wörld";
        let cut = truncate_at_char_boundary(text, 2);
        // 'é' straddles byte 2; the cut backs off to a boundary
        assert_eq!(cut, "h");
    }
}
