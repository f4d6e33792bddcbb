//! Citation types - claims in the draft mapped to supporting sources.

use serde::{Deserialize, Serialize};

use crate::types::source::SourceId;

/// A claim in the draft mapped to a supporting research source.
///
/// `source_id` always references a source present in the run's
/// aggregated set; the extractor drops citations that would dangle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    /// Id of the supporting source
    pub source_id: SourceId,

    /// The claim text as it appears in the draft
    pub claim_text: String,

    /// Byte offset of the claim within the draft
    pub position: usize,

    /// Lexical-overlap confidence in [0, 1]
    pub confidence: f32,
}

impl Citation {
    /// Create a new citation.
    pub fn new(
        source_id: SourceId,
        claim_text: impl Into<String>,
        position: usize,
        confidence: f32,
    ) -> Self {
        Self {
            source_id,
            claim_text: claim_text.into(),
            position,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}
