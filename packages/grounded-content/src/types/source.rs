//! Research source types - the output of the research aggregator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Content-derived identifier for a research source.
///
/// Hashes URL + title so the same page surfaced by different providers
/// collapses to one entry within a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(String);

impl SourceId {
    /// Derive an id from a source's URL and title.
    pub fn from_parts(url: &str, title: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(url.trim().as_bytes());
        hasher.update(b"\n");
        hasher.update(title.trim().as_bytes());
        let digest = hasher.finalize();
        // 16 hex chars is plenty within a run's source set
        Self(format!("{:x}", digest)[..16].to_string())
    }

    /// The id as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A research source discovered by a search provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchSource {
    /// Content-hash id, unique within a run's source set
    pub id: SourceId,

    /// Canonical URL of the source
    pub url: String,

    /// Page title
    pub title: String,

    /// Snippet/excerpt from the search result
    pub snippet: String,

    /// When the source was retrieved
    pub retrieved_at: DateTime<Utc>,

    /// Relevance score in [0, 1], from the provider or heuristic re-ranking
    pub relevance_score: f32,
}

impl ResearchSource {
    /// Create a new source; the id is derived from URL and title.
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        snippet: impl Into<String>,
        relevance_score: f32,
    ) -> Self {
        let url = url.into();
        let title = title.into();
        Self {
            id: SourceId::from_parts(&url, &title),
            url,
            title,
            snippet: snippet.into(),
            retrieved_at: Utc::now(),
            relevance_score: relevance_score.clamp(0.0, 1.0),
        }
    }

    /// Set the retrieval timestamp.
    pub fn with_retrieved_at(mut self, at: DateTime<Utc>) -> Self {
        self.retrieved_at = at;
        self
    }
}
