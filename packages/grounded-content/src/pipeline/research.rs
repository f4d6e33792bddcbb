//! Research aggregation - concurrent fan-out, dedup, ranking.
//!
//! Queries fan out to search providers under a shared concurrency
//! limiter, with per-query timeouts and cooperative cancellation. A
//! failed or timed-out query contributes zero sources and never fails
//! the run; the merged set is deduplicated by source id and ranked by
//! relevance before truncation.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::traits::searcher::{SearchHit, SearchProvider};
use crate::types::config::PipelineConfig;
use crate::types::query::SearchQuery;
use crate::types::source::{ResearchSource, SourceId};

/// Relevance assigned to a hit with no provider score, by result rank.
const FALLBACK_RELEVANCE_STEP: f32 = 0.05;
const FALLBACK_RELEVANCE_FLOOR: f32 = 0.1;

/// The merged result of the research stage.
#[derive(Debug, Clone)]
pub struct ResearchOutcome {
    /// Deduplicated sources, ranked by relevance descending
    pub sources: Vec<ResearchSource>,

    /// True when at least one query failed, timed out, or was cancelled
    pub partial: bool,
}

impl ResearchOutcome {
    /// An outcome with no sources.
    pub fn empty(partial: bool) -> Self {
        Self {
            sources: Vec::new(),
            partial,
        }
    }
}

/// How a single query's execution ended without sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryFailure {
    Failed,
    TimedOut,
    Cancelled,
}

/// Execute all queries and merge their results.
///
/// Queries dispatch in priority order (lower first) under the shared
/// limiter. Per-query results accumulate in task-local vectors and are
/// merged by this single caller after fan-in.
pub async fn aggregate(
    queries: &[SearchQuery],
    providers: &[Arc<dyn SearchProvider>],
    limiter: &Arc<Semaphore>,
    cancel: &CancellationToken,
    config: &PipelineConfig,
) -> ResearchOutcome {
    if queries.is_empty() {
        return ResearchOutcome::empty(false);
    }
    if providers.is_empty() {
        warn!("No search providers configured; research degraded");
        return ResearchOutcome::empty(true);
    }

    let mut ordered: Vec<&SearchQuery> = queries.iter().collect();
    ordered.sort_by_key(|q| q.priority);

    let futures = ordered.iter().map(|query| {
        let limiter = Arc::clone(limiter);
        async move {
            let Ok(_permit) = limiter.acquire().await else {
                return Err(QueryFailure::Failed);
            };

            if cancel.is_cancelled() {
                return Err(QueryFailure::Cancelled);
            }

            tokio::select! {
                _ = cancel.cancelled() => Err(QueryFailure::Cancelled),
                result = tokio::time::timeout(
                    config.query_timeout,
                    run_query(query, providers),
                ) => match result {
                    Ok(sources) => sources,
                    Err(_) => {
                        warn!(query = %query.text, "Research query timed out");
                        Err(QueryFailure::TimedOut)
                    }
                },
            }
        }
    });

    let results = join_all(futures).await;

    let partial = results.iter().any(|r| r.is_err());
    let gathered: Vec<ResearchSource> = results.into_iter().flatten().flatten().collect();

    let sources = merge_and_rank(gathered, config.max_sources);

    info!(
        queries = queries.len(),
        sources = sources.len(),
        partial,
        "Research aggregation complete"
    );

    ResearchOutcome { sources, partial }
}

/// Run one query against its matching providers.
///
/// A query with a provider hint runs only against the named provider;
/// otherwise it runs against all of them. The query fails only when
/// every matching provider fails.
async fn run_query(
    query: &SearchQuery,
    providers: &[Arc<dyn SearchProvider>],
) -> Result<Vec<ResearchSource>, QueryFailure> {
    let matching: Vec<&Arc<dyn SearchProvider>> = match &query.provider_hint {
        Some(hint) => providers.iter().filter(|p| p.name() == hint.as_str()).collect(),
        None => providers.iter().collect(),
    };

    if matching.is_empty() {
        warn!(query = %query.text, hint = ?query.provider_hint, "No provider matches hint");
        return Err(QueryFailure::Failed);
    }

    let mut sources = Vec::new();
    let mut any_success = false;

    for provider in matching {
        match provider.search(&query.text).await {
            Ok(hits) => {
                any_success = true;
                sources.extend(hits.into_iter().enumerate().map(|(rank, hit)| {
                    hit_to_source(hit, rank)
                }));
            }
            Err(e) => {
                warn!(
                    query = %query.text,
                    provider = provider.name(),
                    error = %e,
                    "Provider query failed"
                );
            }
        }
    }

    if any_success {
        debug!(query = %query.text, sources = sources.len(), "Query complete");
        Ok(sources)
    } else {
        Err(QueryFailure::Failed)
    }
}

/// Convert a provider hit into a research source.
///
/// Hits without a provider score get a rank-derived relevance so that
/// result ordering still carries signal through the merge.
fn hit_to_source(hit: SearchHit, rank: usize) -> ResearchSource {
    let relevance = hit.score.unwrap_or_else(|| {
        (1.0 - FALLBACK_RELEVANCE_STEP * rank as f32).max(FALLBACK_RELEVANCE_FLOOR)
    });

    ResearchSource::new(
        hit.url.as_str(),
        hit.title.unwrap_or_default(),
        hit.snippet.unwrap_or_default(),
        relevance,
    )
}

/// Deduplicate by source id, rank by relevance, truncate.
///
/// On an id collision the entry with the higher relevance survives.
/// Ties in the final ordering break by id so output is independent of
/// arrival order.
pub(crate) fn merge_and_rank(sources: Vec<ResearchSource>, max: usize) -> Vec<ResearchSource> {
    let mut by_id: HashMap<SourceId, ResearchSource> = HashMap::new();

    for source in sources {
        match by_id.get(&source.id) {
            Some(existing) if existing.relevance_score >= source.relevance_score => {}
            _ => {
                by_id.insert(source.id.clone(), source);
            }
        }
    }

    let mut merged: Vec<ResearchSource> = by_id.into_values().collect();
    merged.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    merged.truncate(max);
    merged
}
