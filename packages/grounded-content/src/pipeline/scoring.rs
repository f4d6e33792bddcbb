//! Quality scoring - deterministic rule checks, no ML inference.
//!
//! Every score's derivation is auditable: claim detection, tone, and
//! structure all come from fixed rule tables. Absence of grounding
//! discounts factual confidence toward 0.5 (unknown), not toward 0.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::pipeline::citations::{split_segments, tokens};
use crate::types::citation::Citation;
use crate::types::config::PipelineConfig;
use crate::types::metrics::QualityMetrics;
use crate::types::request::{ContentType, GenerationRequest};
use crate::types::source::ResearchSource;

/// Comparative/superlative markers for claim detection.
const COMPARATIVE_WORDS: &[&str] = &[
    "more", "most", "less", "least", "best", "worst", "better", "worse", "faster", "slower",
    "higher", "lower", "greater", "largest", "biggest", "fastest", "leading", "top",
];

/// Call-to-action markers for structure checks.
const CTA_MARKERS: &[&str] = &[
    "sign up",
    "learn more",
    "join",
    "subscribe",
    "register",
    "contact us",
    "get started",
    "follow",
    "share your",
    "reach out",
    "check out",
    "download",
    "let me know",
];

/// Score used when no grounding was performed: unknown, not wrong.
const NEUTRAL_CONFIDENCE: f32 = 0.5;

/// Score used when sources existed but nothing was citable.
const UNCITED_CONFIDENCE: f32 = 0.4;

fn numeric_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d").unwrap())
}

fn hashtag_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#\w+").unwrap())
}

/// Compute quality metrics for a draft.
///
/// Degrades to neutral metrics with a manual-review recommendation when
/// the draft yields nothing to analyze.
pub fn score(
    draft: &str,
    citations: &[Citation],
    request: &GenerationRequest,
    sources: &[ResearchSource],
    config: &PipelineConfig,
) -> QualityMetrics {
    let segments = split_segments(draft);
    if segments.is_empty() {
        let mut metrics = QualityMetrics::neutral();
        metrics
            .recommendations
            .push("Automated quality analysis was degraded for this draft; review manually".into());
        return metrics;
    }

    let claim_offsets: Vec<usize> = segments
        .iter()
        .filter(|s| is_claim_bearing(s.text))
        .map(|s| s.offset)
        .collect();

    // Best citation confidence per cited segment
    let mut best_by_offset: HashMap<usize, f32> = HashMap::new();
    for citation in citations {
        let entry = best_by_offset.entry(citation.position).or_insert(0.0);
        *entry = entry.max(citation.confidence);
    }

    let covered: Vec<f32> = claim_offsets
        .iter()
        .filter_map(|offset| best_by_offset.get(offset).copied())
        .collect();

    let citation_coverage = if claim_offsets.is_empty() {
        1.0
    } else {
        covered.len() as f32 / claim_offsets.len() as f32
    };

    let factual_confidence = if sources.is_empty() {
        NEUTRAL_CONFIDENCE
    } else if covered.is_empty() {
        UNCITED_CONFIDENCE
    } else {
        covered.iter().sum::<f32>() / covered.len() as f32
    };

    let tone_alignment = tone_alignment(draft, &request.tone);
    let structure_compliance = structure_compliance(draft, request);

    let mut metrics = QualityMetrics {
        factual_confidence,
        citation_coverage,
        tone_alignment,
        structure_compliance,
        recommendations: Vec::new(),
    }
    .clamped();

    metrics.recommendations = recommendations(&metrics, request, config);

    debug!(
        factual = metrics.factual_confidence,
        coverage = metrics.citation_coverage,
        tone = metrics.tone_alignment,
        structure = metrics.structure_compliance,
        "Quality scoring complete"
    );

    metrics
}

/// Whether a segment contains a checkable factual assertion.
///
/// A segment is claim-bearing if it contains a numeric value, a named
/// entity (capitalized word past the first), or a comparative marker.
pub(crate) fn is_claim_bearing(segment: &str) -> bool {
    if numeric_pattern().is_match(segment) {
        return true;
    }

    let words: Vec<&str> = segment.split_whitespace().collect();
    let has_entity = words.iter().skip(1).any(|w| {
        let trimmed = w.trim_matches(|c: char| !c.is_alphanumeric());
        trimmed.len() >= 2 && trimmed.chars().next().is_some_and(|c| c.is_uppercase())
    });
    if has_entity {
        return true;
    }

    let lowered = segment.to_lowercase();
    lowered
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| COMPARATIVE_WORDS.contains(&w))
}

/// Tone alignment from keyword presence.
///
/// Unknown tones score 0.75: there is nothing to check against, which
/// is not the same as a mismatch.
fn tone_alignment(draft: &str, tone: &str) -> f32 {
    let keywords = tone_keywords(tone);
    if keywords.is_empty() {
        return 0.75;
    }

    let draft_tokens = tokens(draft);
    let hits = keywords
        .iter()
        .filter(|k| draft_tokens.contains(**k))
        .count();

    // Three keyword hits saturate the signal
    0.4 + 0.6 * (hits.min(3) as f32 / 3.0)
}

/// Keyword table per recognized tone. Hand-tuned, tunable.
fn tone_keywords(tone: &str) -> &'static [&'static str] {
    let tone = tone.to_lowercase();
    if tone.contains("professional") {
        &["insight", "strategy", "results", "growth", "industry", "teams", "productivity"]
    } else if tone.contains("casual") {
        &["really", "pretty", "honestly", "love", "fun", "stuff"]
    } else if tone.contains("authoritative") || tone.contains("expert") {
        &["research", "data", "evidence", "analysis", "demonstrates", "proven"]
    } else if tone.contains("friendly") || tone.contains("warm") {
        &["welcome", "together", "share", "community", "thanks", "happy"]
    } else if tone.contains("inspirational") || tone.contains("motivational") {
        &["imagine", "potential", "journey", "achieve", "transform", "believe"]
    } else {
        &[]
    }
}

/// Structure compliance from constraint rule checks.
fn structure_compliance(draft: &str, request: &GenerationRequest) -> f32 {
    let mut score = 1.0f32;

    if let Some(max) = request.constraints.max_length {
        let len = draft.chars().count();
        if len > max {
            let excess = (len - max) as f32 / max as f32;
            score -= excess.min(0.5);
        }
    }

    if request.constraints.require_hashtags && !hashtag_pattern().is_match(draft) {
        score -= 0.3;
    }

    if request.constraints.require_cta {
        let lowered = draft.to_lowercase();
        if !CTA_MARKERS.iter().any(|m| lowered.contains(m)) {
            score -= 0.3;
        }
    }

    // Multi-slide content needs at least two sections to slice into slides
    if request.content_type == ContentType::MultiSlide && draft.split("\n\n").count() < 2 {
        score -= 0.2;
    }

    score.clamp(0.0, 1.0)
}

/// Build recommendations from the fixed rule table.
///
/// Lowest-scoring metric first, capped at `max_recommendations`.
fn recommendations(
    metrics: &QualityMetrics,
    request: &GenerationRequest,
    config: &PipelineConfig,
) -> Vec<String> {
    let mut flagged: Vec<(f32, String)> = Vec::new();

    for (name, value) in metrics.scores() {
        if value >= config.score_threshold {
            continue;
        }
        let message = match name {
            "factual_confidence" => {
                "Back factual claims with research sources, or raise the grounding level".to_string()
            }
            "citation_coverage" => {
                "Several factual statements lack supporting sources; add data or citations"
                    .to_string()
            }
            "tone_alignment" => format!(
                "Adjust wording to better match the requested '{}' tone",
                request.tone
            ),
            _ => "Review length, hashtag, and call-to-action requirements for this format"
                .to_string(),
        };
        flagged.push((value, message));
    }

    flagged.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    flagged
        .into_iter()
        .take(config.max_recommendations)
        .map(|(_, message)| message)
        .collect()
}
