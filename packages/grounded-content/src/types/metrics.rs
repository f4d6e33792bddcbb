//! Quality metrics - the scorer's output.

use serde::{Deserialize, Serialize};

/// Quality signals computed from the draft, citations, and constraints.
///
/// All scalar scores live in [0, 1]. `recommendations` is non-empty
/// whenever any scalar falls below the scoring threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Mean citation confidence across covered claim segments;
    /// 0.5 (neutral) when no grounding was performed
    pub factual_confidence: f32,

    /// Fraction of claim-bearing segments with at least one citation
    pub citation_coverage: f32,

    /// How well the draft matches the requested tone
    pub tone_alignment: f32,

    /// How well the draft satisfies structural constraints
    pub structure_compliance: f32,

    /// Human-actionable guidance, highest-impact first
    pub recommendations: Vec<String>,
}

impl QualityMetrics {
    /// Metrics with every score at neutral, for degraded analysis.
    pub fn neutral() -> Self {
        Self {
            factual_confidence: 0.5,
            citation_coverage: 0.5,
            tone_alignment: 0.5,
            structure_compliance: 0.5,
            recommendations: Vec::new(),
        }
    }

    /// The scalar scores as (name, value) pairs, in declaration order.
    pub fn scores(&self) -> [(&'static str, f32); 4] {
        [
            ("factual_confidence", self.factual_confidence),
            ("citation_coverage", self.citation_coverage),
            ("tone_alignment", self.tone_alignment),
            ("structure_compliance", self.structure_compliance),
        ]
    }

    /// The lowest scalar score.
    pub fn min_score(&self) -> f32 {
        self.scores()
            .iter()
            .map(|(_, v)| *v)
            .fold(f32::INFINITY, f32::min)
    }

    /// Clamp every scalar into [0, 1].
    pub fn clamped(mut self) -> Self {
        self.factual_confidence = self.factual_confidence.clamp(0.0, 1.0);
        self.citation_coverage = self.citation_coverage.clamp(0.0, 1.0);
        self.tone_alignment = self.tone_alignment.clamp(0.0, 1.0);
        self.structure_compliance = self.structure_compliance.clamp(0.0, 1.0);
        self
    }
}
