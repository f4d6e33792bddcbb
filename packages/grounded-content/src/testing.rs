//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the pipeline
//! without making real generation or search calls.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{GenerationError, SearchError};
use crate::traits::generator::TextGenerator;
use crate::traits::searcher::{SearchHit, SearchProvider};

/// Build a search hit from parts.
pub fn hit(url: &str, title: &str, snippet: &str, score: f32) -> SearchHit {
    SearchHit::from_url(url)
        .unwrap_or_else(|| panic!("invalid test url: {}", url))
        .with_title(title)
        .with_snippet(snippet)
        .with_score(score)
}

/// A mock text generator with scripted responses and call recording.
///
/// Responses are consumed in order; the last response repeats once the
/// script runs out. Failures can be injected for the first N calls or
/// for every call.
#[derive(Default)]
pub struct MockGenerator {
    responses: Arc<RwLock<Vec<String>>>,
    calls: Arc<RwLock<Vec<String>>>,
    fail_first: Arc<RwLock<usize>>,
    always_fail: bool,
    delay: Option<Duration>,
}

impl MockGenerator {
    /// Create a mock that echoes a default draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose every call fails.
    pub fn failing() -> Self {
        Self {
            always_fail: true,
            ..Self::default()
        }
    }

    /// Queue a scripted response.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.write().unwrap().push(response.into());
        self
    }

    /// Fail the first `n` calls, then follow the script.
    pub fn with_failures(self, n: usize) -> Self {
        *self.fail_first.write().unwrap() = n;
        self
    }

    /// Sleep before answering, to exercise timeouts and cancellation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Instructions received so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Number of calls made.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn complete(&self, instruction: &str) -> Result<String, GenerationError> {
        let call_index = {
            let mut calls = self.calls.write().unwrap();
            calls.push(instruction.to_string());
            calls.len() - 1
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.always_fail {
            return Err(GenerationError::message("mock backend failure"));
        }

        if call_index < *self.fail_first.read().unwrap() {
            return Err(GenerationError::message("mock transient failure"));
        }

        let responses = self.responses.read().unwrap();
        let scripted = call_index.saturating_sub(*self.fail_first.read().unwrap());
        let response = responses
            .get(scripted)
            .or_else(|| responses.last())
            .cloned()
            .unwrap_or_else(|| "Mock draft content.".to_string());
        Ok(response)
    }
}

/// A mock search provider with per-query canned hits.
///
/// Unmatched queries fall back to the default hit set (empty unless
/// configured). Failures and delays can be injected per query or
/// globally.
#[derive(Default)]
pub struct MockSearchProvider {
    name: Option<String>,
    hits: Arc<RwLock<HashMap<String, Vec<SearchHit>>>>,
    default_hits: Arc<RwLock<Vec<SearchHit>>>,
    failing_queries: Arc<RwLock<Vec<String>>>,
    always_fail: bool,
    delay: Option<Duration>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockSearchProvider {
    /// Create an empty mock provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the provider name, for hint-routing tests.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add canned hits for an exact query.
    pub fn with_hits(self, query: impl Into<String>, hits: Vec<SearchHit>) -> Self {
        self.hits.write().unwrap().insert(query.into(), hits);
        self
    }

    /// Set hits returned for any unmatched query.
    pub fn with_default_hits(self, hits: Vec<SearchHit>) -> Self {
        *self.default_hits.write().unwrap() = hits;
        self
    }

    /// Fail every call.
    pub fn failing() -> Self {
        Self {
            always_fail: true,
            ..Self::default()
        }
    }

    /// Fail a specific query only.
    pub fn failing_for(self, query: impl Into<String>) -> Self {
        self.failing_queries.write().unwrap().push(query.into());
        self
    }

    /// Sleep before answering, to exercise timeouts and cancellation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queries received so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        self.calls.write().unwrap().push(query.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.always_fail || self.failing_queries.read().unwrap().iter().any(|q| q == query) {
            return Err(SearchError::InvalidResponse("mock provider failure".into()));
        }

        if let Some(hits) = self.hits.read().unwrap().get(query) {
            return Ok(hits.clone());
        }
        Ok(self.default_hits.read().unwrap().clone())
    }

    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("mock")
    }
}
