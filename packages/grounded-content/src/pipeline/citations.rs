//! Citation extraction - map draft claims to supporting sources.
//!
//! Sentence-level segments are scored against each source excerpt by
//! lexical overlap. A citation is emitted only above the confidence
//! floor, at most two sources per claim. Output is independent of
//! source ordering: ties break by source id ascending.

use std::collections::HashSet;

use tracing::debug;

use crate::types::citation::Citation;
use crate::types::config::PipelineConfig;
use crate::types::source::ResearchSource;

/// Words carrying no claim-matching signal.
const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "from", "are", "was", "were", "have", "has",
    "had", "than", "then", "they", "their", "there", "your", "you", "our", "its", "will",
    "would", "can", "could", "should", "about", "into", "over", "some", "such", "not", "but",
    "all", "any", "been", "being", "out", "who", "what", "when", "where", "how", "why",
];

/// A sentence-level segment of the draft.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Segment<'a> {
    /// The trimmed segment text
    pub text: &'a str,

    /// Byte offset of the trimmed text within the draft
    pub offset: usize,
}

/// Extract citations from the draft against the aggregated source set.
pub fn extract(
    draft: &str,
    sources: &[ResearchSource],
    config: &PipelineConfig,
) -> Vec<Citation> {
    if sources.is_empty() {
        return Vec::new();
    }

    let source_tokens: Vec<(&ResearchSource, HashSet<String>)> = sources
        .iter()
        .map(|s| (s, tokens(&format!("{} {}", s.title, s.snippet))))
        .collect();

    let mut citations = Vec::new();

    for segment in split_segments(draft) {
        let claim_tokens = tokens(segment.text);
        if claim_tokens.is_empty() {
            continue;
        }

        let mut candidates: Vec<(f32, &ResearchSource)> = source_tokens
            .iter()
            .filter_map(|(source, toks)| {
                let score = overlap(&claim_tokens, toks);
                (score >= config.citation_floor).then_some((score, *source))
            })
            .collect();

        // Order independent of the source list: score desc, then id asc
        candidates.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.id.cmp(&b.1.id))
        });
        candidates.truncate(config.max_citations_per_claim);

        for (score, source) in candidates {
            citations.push(Citation::new(
                source.id.clone(),
                segment.text,
                segment.offset,
                score,
            ));
        }
    }

    debug!(citations = citations.len(), "Citation extraction complete");
    citations
}

/// Split a draft into sentence-level segments with byte offsets.
///
/// Splits at sentence terminators followed by whitespace, and at line
/// breaks. Decimal points inside numbers do not split.
pub(crate) fn split_segments(draft: &str) -> Vec<Segment<'_>> {
    let bytes = draft.as_bytes();
    let mut segments = Vec::new();
    let mut start = 0;

    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        let boundary = match b {
            b'\n' => true,
            b'.' | b'!' | b'?' => i + 1 >= bytes.len() || bytes[i + 1].is_ascii_whitespace(),
            _ => false,
        };

        if boundary {
            let end = if b == b'\n' { i } else { i + 1 };
            push_segment(draft, start, end, &mut segments);
            start = i + 1;
        }
        i += 1;
    }
    push_segment(draft, start, bytes.len(), &mut segments);

    segments
}

fn push_segment<'a>(draft: &'a str, start: usize, end: usize, out: &mut Vec<Segment<'a>>) {
    let raw = &draft[start..end];
    let leading = raw.len() - raw.trim_start().len();
    let text = raw.trim();
    if !text.is_empty() {
        out.push(Segment {
            text,
            offset: start + leading,
        });
    }
}

/// Tokenize text into a lowercase word set, dropping stopwords and
/// words shorter than three characters.
pub(crate) fn tokens(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= 3 && !STOPWORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Overlap coefficient between two token sets.
fn overlap(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return 0.0;
    }
    let shared = a.intersection(b).count();
    shared as f32 / smaller as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(url: &str, title: &str, snippet: &str) -> ResearchSource {
        ResearchSource::new(url, title, snippet, 0.9)
    }

    #[test]
    fn test_split_segments_offsets() {
        let draft = "First sentence. Second one!\nThird line";
        let segments = split_segments(draft);

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].text, "First sentence.");
        assert_eq!(segments[0].offset, 0);
        assert_eq!(segments[1].text, "Second one!");
        assert_eq!(&draft[segments[1].offset..segments[1].offset + 11], "Second one!");
        assert_eq!(segments[2].text, "Third line");
    }

    #[test]
    fn test_split_keeps_decimal_numbers_intact() {
        let segments = split_segments("Output rose by 23.5 percent last year.");
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn test_citation_emitted_above_floor() {
        let sources = vec![source(
            "https://a.com/study",
            "Productivity study",
            "Remote teams report higher productivity in recent studies.",
        )];
        let draft = "Remote teams report higher productivity overall.";

        let citations = extract(draft, &sources, &PipelineConfig::default());
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].source_id, sources[0].id);
        assert!(citations[0].confidence >= 0.3);
        assert_eq!(citations[0].position, 0);
    }

    #[test]
    fn test_unrelated_draft_yields_no_citations() {
        let sources = vec![source(
            "https://a.com/study",
            "Gardening guide",
            "Tomatoes grow best in full sun with regular watering.",
        )];
        let draft = "Quarterly earnings exceeded analyst expectations.";

        let citations = extract(draft, &sources, &PipelineConfig::default());
        assert!(citations.is_empty());
    }

    #[test]
    fn test_no_sources_yields_no_citations() {
        let citations = extract("Any draft text.", &[], &PipelineConfig::default());
        assert!(citations.is_empty());
    }

    #[test]
    fn test_at_most_two_sources_per_claim() {
        let snippet = "Remote teams report higher productivity in studies.";
        let sources = vec![
            source("https://a.com/1", "One", snippet),
            source("https://b.com/2", "Two", snippet),
            source("https://c.com/3", "Three", snippet),
        ];
        let draft = "Remote teams report higher productivity.";

        let citations = extract(draft, &sources, &PipelineConfig::default());
        assert_eq!(citations.len(), 2);
    }

    #[test]
    fn test_order_independent_with_id_tiebreak() {
        let snippet = "Remote teams report higher productivity in studies.";
        let a = source("https://a.com/1", "One", snippet);
        let b = source("https://b.com/2", "Two", snippet);
        let c = source("https://c.com/3", "Three", snippet);
        let draft = "Remote teams report higher productivity.";
        let config = PipelineConfig::default();

        let forward = extract(draft, &[a.clone(), b.clone(), c.clone()], &config);
        let reversed = extract(draft, &[c, b, a], &config);

        let forward_ids: Vec<_> = forward.iter().map(|c| c.source_id.clone()).collect();
        let reversed_ids: Vec<_> = reversed.iter().map(|c| c.source_id.clone()).collect();
        assert_eq!(forward_ids, reversed_ids);
    }

    #[test]
    fn test_floor_is_configurable() {
        let sources = vec![source(
            "https://a.com/study",
            "Study",
            "productivity gains reported widely nowhere else matching",
        )];
        let draft = "Remote work productivity keeps climbing steadily upward.";

        let strict = PipelineConfig::default().with_citation_floor(0.9);
        assert!(extract(draft, &sources, &strict).is_empty());
    }

    #[test]
    fn test_multiple_segments_cited_independently() {
        let sources = vec![
            source(
                "https://a.com/1",
                "Productivity",
                "Remote teams report higher productivity in studies.",
            ),
            source(
                "https://b.com/2",
                "Retention",
                "Flexible schedules improve employee retention rates.",
            ),
        ];
        let draft =
            "Remote teams report higher productivity. Flexible schedules improve retention rates.";

        let citations = extract(draft, &sources, &PipelineConfig::default());
        assert_eq!(citations.len(), 2);
        assert_ne!(citations[0].source_id, citations[1].source_id);
        assert!(citations[1].position > 0);
    }

    #[test]
    fn test_tokens_drop_stopwords_and_short_words() {
        let toks = tokens("The team is on a roll with productivity");
        assert!(toks.contains("team"));
        assert!(toks.contains("productivity"));
        assert!(!toks.contains("the"));
        assert!(!toks.contains("is"));
        assert!(!toks.contains("on"));
    }
}
