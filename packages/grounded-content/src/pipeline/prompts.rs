//! Instruction templates for the generation backend.
//!
//! Instructions are built by pure template substitution from typed
//! inputs, so construction logic stays unit-testable independent of any
//! backend.

use crate::pipeline::context::GroundingContext;
use crate::types::request::GenerationRequest;

/// Instruction for producing the content draft.
pub const GENERATION_PROMPT: &str = r#"Write a {content_type} about: {topic}

Context:
- Industry: {industry}
- Audience: {audience}
- Tone: {tone}

Requirements:
{requirements}
{grounding_section}
Write only the content itself, with no preamble or commentary."#;

/// Instruction for synthesizing additional research queries.
pub const SYNTHESIZE_QUERIES_PROMPT: &str = r#"Suggest search queries for researching this content brief.

Topic: {topic}
Industry: {industry}
Audience: {audience}

Suggest exactly {count} specific web search queries that would surface
data, statistics, or expert commentary useful for this brief. Avoid
repeating the topic verbatim.

Output one query per line, with no numbering or punctuation."#;

/// Format the generation instruction from the request and optional grounding.
pub fn format_generation_prompt(
    request: &GenerationRequest,
    grounding: Option<&GroundingContext>,
) -> String {
    let mut requirements = Vec::new();

    if let Some(max) = request.constraints.max_length {
        requirements.push(format!("- Stay under {} characters", max));
    }
    if request.constraints.require_hashtags {
        requirements.push("- Include relevant hashtags".to_string());
    }
    if request.constraints.require_cta {
        requirements.push("- End with a clear call to action".to_string());
    }
    if requirements.is_empty() {
        requirements.push("- No structural constraints".to_string());
    }

    let grounding_section = match grounding {
        Some(ctx) if !ctx.is_empty() => format!(
            "\nGround factual claims in this research:\n{}\n",
            ctx.excerpts
        ),
        _ => String::new(),
    };

    GENERATION_PROMPT
        .replace("{content_type}", request.content_type.as_str())
        .replace("{topic}", &request.topic)
        .replace("{industry}", &request.industry)
        .replace("{audience}", &request.audience)
        .replace("{tone}", &request.tone)
        .replace("{requirements}", &requirements.join("\n"))
        .replace("{grounding_section}", &grounding_section)
}

/// Format the query-synthesis instruction.
pub fn format_synthesize_queries_prompt(request: &GenerationRequest, count: usize) -> String {
    SYNTHESIZE_QUERIES_PROMPT
        .replace("{topic}", &request.topic)
        .replace("{industry}", &request.industry)
        .replace("{audience}", &request.audience)
        .replace("{count}", &count.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::request::{Constraints, ContentType, GroundingLevel};

    fn request() -> GenerationRequest {
        GenerationRequest {
            topic: "remote work productivity".to_string(),
            industry: "technology".to_string(),
            tone: "professional".to_string(),
            audience: "engineering managers".to_string(),
            content_type: ContentType::Post,
            constraints: Constraints::new().with_max_length(800).with_cta(),
            grounding_level: GroundingLevel::Basic,
        }
    }

    #[test]
    fn test_generation_prompt_embeds_request_fields() {
        let prompt = format_generation_prompt(&request(), None);
        assert!(prompt.contains("remote work productivity"));
        assert!(prompt.contains("technology"));
        assert!(prompt.contains("engineering managers"));
        assert!(prompt.contains("Stay under 800 characters"));
        assert!(prompt.contains("call to action"));
        assert!(!prompt.contains("Ground factual claims"));
    }

    #[test]
    fn test_generation_prompt_is_deterministic() {
        let a = format_generation_prompt(&request(), None);
        let b = format_generation_prompt(&request(), None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_synthesize_prompt_embeds_count() {
        let prompt = format_synthesize_queries_prompt(&request(), 2);
        assert!(prompt.contains("exactly 2"));
        assert!(prompt.contains("remote work productivity"));
    }
}
