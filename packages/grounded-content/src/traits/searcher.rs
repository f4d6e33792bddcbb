//! Search provider trait for external research.
//!
//! Abstracts over search backends (Tavily, SerpAPI, Google Custom
//! Search, etc.). Providers fail independently: one provider erroring
//! or timing out never affects the others, and the research aggregator
//! degrades gracefully when every call fails.

use async_trait::async_trait;
use url::Url;

use crate::error::SearchError;

/// A raw hit returned by a search provider.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// The discovered URL.
    pub url: Url,

    /// Title of the page (if available from the provider).
    pub title: Option<String>,

    /// Snippet/description from the result.
    pub snippet: Option<String>,

    /// Relevance score (0.0-1.0, if provided by the search API).
    pub score: Option<f32>,
}

impl SearchHit {
    /// Create a new hit from a URL.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            title: None,
            snippet: None,
            score: None,
        }
    }

    /// Create from a URL string.
    pub fn from_url(url: &str) -> Option<Self> {
        Url::parse(url).ok().map(Self::new)
    }

    /// Add a title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add a snippet.
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    /// Add a relevance score.
    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }
}

/// Search capability consumed by the research aggregator.
///
/// # Example
///
/// ```rust,ignore
/// let provider = TavilySearchProvider::new(api_key);
/// let hits = provider.search("remote work productivity statistics").await?;
/// for hit in hits {
///     println!("{} - {:?}", hit.url, hit.title);
/// }
/// ```
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Search for results relevant to the query.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;

    /// Provider name, matched against `SearchQuery::provider_hint`.
    fn name(&self) -> &str {
        "default"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_builder() {
        let hit = SearchHit::from_url("https://example.com/study")
            .unwrap()
            .with_title("A Study")
            .with_snippet("Findings...")
            .with_score(0.9);
        assert_eq!(hit.url.as_str(), "https://example.com/study");
        assert_eq!(hit.title.as_deref(), Some("A Study"));
        assert_eq!(hit.score, Some(0.9));
    }

    #[test]
    fn test_from_invalid_url() {
        assert!(SearchHit::from_url("not a url").is_none());
    }
}
