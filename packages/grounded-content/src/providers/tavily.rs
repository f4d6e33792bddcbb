//! Tavily-backed search provider.

use async_trait::async_trait;
use url::Url;

use crate::error::SearchError;
use crate::security::ApiKey;
use crate::traits::searcher::{SearchHit, SearchProvider};

/// Search provider backed by the Tavily API.
pub struct TavilySearchProvider {
    api_key: ApiKey,
    client: reqwest::Client,
    /// Maximum results requested per query.
    pub max_results: usize,
}

impl TavilySearchProvider {
    /// Create a new Tavily provider.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: ApiKey::new(api_key),
            client: reqwest::Client::new(),
            max_results: 10,
        }
    }

    /// Set the per-query result limit.
    pub fn with_max_results(mut self, limit: usize) -> Self {
        self.max_results = limit;
        self
    }
}

#[async_trait]
impl SearchProvider for TavilySearchProvider {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        #[derive(serde::Serialize)]
        struct Request {
            query: String,
            search_depth: String,
            max_results: usize,
        }

        #[derive(serde::Deserialize)]
        struct Response {
            results: Vec<TavilyResult>,
        }

        #[derive(serde::Deserialize)]
        struct TavilyResult {
            url: String,
            title: Option<String>,
            content: Option<String>,
            score: Option<f32>,
        }

        let request = Request {
            query: query.to_string(),
            search_depth: "basic".to_string(),
            max_results: self.max_results,
        };

        let response = self
            .client
            .post("https://api.tavily.com/search")
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .json(&request)
            .send()
            .await
            .map_err(SearchError::http)?;

        if response.status().as_u16() == 429 {
            return Err(SearchError::RateLimited);
        }
        if !response.status().is_success() {
            return Err(SearchError::InvalidResponse(format!(
                "Tavily API error: {}",
                response.status()
            )));
        }

        let payload: Response = response.json().await.map_err(SearchError::http)?;

        let hits = payload
            .results
            .into_iter()
            .filter_map(|r| {
                let url = Url::parse(&r.url).ok()?;
                let mut hit = SearchHit::new(url);
                if let Some(title) = r.title {
                    hit = hit.with_title(title);
                }
                if let Some(content) = r.content {
                    hit = hit.with_snippet(content);
                }
                if let Some(score) = r.score {
                    hit = hit.with_score(score);
                }
                Some(hit)
            })
            .collect();

        Ok(hits)
    }

    fn name(&self) -> &str {
        "tavily"
    }
}
