//! The pipeline orchestrator - sequencing, failure policy, cancellation.
//!
//! Owns the per-run `PipelineContext` and drives the stages in state-
//! machine order. Components receive only the slice of context they
//! need and return results; all mutation happens here. Cancellation is
//! checked at every stage boundary and propagated cooperatively into
//! in-flight research and generation calls.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{PipelineError, Result};
use crate::pipeline::progress::ProgressSender;
use crate::pipeline::{citations, context, generate, normalize, planner, research, scoring};
use crate::traits::generator::TextGenerator;
use crate::traits::searcher::SearchProvider;
use crate::types::citation::Citation;
use crate::types::config::PipelineConfig;
use crate::types::metrics::QualityMetrics;
use crate::types::progress::{Stage, StageStatus};
use crate::types::query::SearchQuery;
use crate::types::request::{GenerationRequest, RawGenerationRequest, StoredPreferences};
use crate::types::result::GenerationResult;
use crate::types::source::ResearchSource;

/// Per-run mutable state, owned exclusively by the orchestrator.
///
/// No component retains a reference beyond its own call. Stage 3's
/// internal fan-out writes only to task-local accumulators that the
/// single caller merges after fan-in, so this struct is never touched
/// by more than one logical task.
struct PipelineContext {
    run_id: Uuid,
    cancel: CancellationToken,
    request: GenerationRequest,
    warnings: Vec<String>,
    queries: Vec<SearchQuery>,
    sources: Vec<ResearchSource>,
    grounding_enabled: bool,
    draft: String,
    citations: Vec<Citation>,
    metrics: Option<QualityMetrics>,
}

impl PipelineContext {
    fn new(
        run_id: Uuid,
        cancel: CancellationToken,
        request: GenerationRequest,
        warnings: Vec<String>,
    ) -> Self {
        Self {
            run_id,
            cancel,
            request,
            warnings,
            queries: Vec::new(),
            sources: Vec::new(),
            grounding_enabled: false,
            draft: String::new(),
            citations: Vec::new(),
            metrics: None,
        }
    }

    fn into_result(self) -> GenerationResult {
        GenerationResult {
            run_id: self.run_id,
            content: self.draft,
            citations: self.citations,
            quality_metrics: self.metrics.unwrap_or_else(QualityMetrics::neutral),
            sources: self.sources,
            search_queries: self.queries,
            grounding_enabled: self.grounding_enabled,
            warnings: self.warnings,
        }
    }
}

/// The grounded content generation pipeline.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = Pipeline::new(generator)
///     .with_provider(Arc::new(TavilySearchProvider::new(api_key)));
///
/// let raw = RawGenerationRequest::new()
///     .with_topic("remote work productivity")
///     .with_grounding_level("enhanced");
///
/// let result = pipeline.run(&raw, &StoredPreferences::new()).await?;
/// println!("{} ({} citations)", result.content, result.citations.len());
/// ```
pub struct Pipeline<G: TextGenerator> {
    generator: G,
    providers: Vec<Arc<dyn SearchProvider>>,
    limiter: Arc<Semaphore>,
    config: PipelineConfig,
}

impl<G: TextGenerator> Pipeline<G> {
    /// Create a pipeline with default configuration and no providers.
    pub fn new(generator: G) -> Self {
        let config = PipelineConfig::default();
        Self {
            limiter: Arc::new(Semaphore::new(config.research_concurrency)),
            generator,
            providers: Vec::new(),
            config,
        }
    }

    /// Replace the configuration.
    ///
    /// Resets the research limiter to the configured concurrency unless
    /// a shared limiter is installed afterwards.
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.limiter = Arc::new(Semaphore::new(config.research_concurrency));
        self.config = config;
        self
    }

    /// Add a search provider.
    pub fn with_provider(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Share a research limiter across pipelines.
    ///
    /// Protects downstream provider rate limits when multiple runs
    /// proceed concurrently.
    pub fn with_shared_limiter(mut self, limiter: Arc<Semaphore>) -> Self {
        self.limiter = limiter;
        self
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline without progress reporting or cancellation.
    pub async fn run(
        &self,
        raw: &RawGenerationRequest,
        prefs: &StoredPreferences,
    ) -> Result<GenerationResult> {
        self.run_with_progress(raw, prefs, ProgressSender::disabled(), CancellationToken::new())
            .await
    }

    /// Run the pipeline with progress reporting and a cancellation token.
    ///
    /// The run-level timeout cancels the token if the run has not
    /// completed in time. A cancelled run returns
    /// [`PipelineError::Cancelled`] and never a partial result.
    pub async fn run_with_progress(
        &self,
        raw: &RawGenerationRequest,
        prefs: &StoredPreferences,
        progress: ProgressSender,
        cancel: CancellationToken,
    ) -> Result<GenerationResult> {
        let progress = progress.with_emit_timeout(self.config.emit_timeout);

        let deadline = cancel.clone();
        let run_timeout = self.config.run_timeout;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(run_timeout).await;
            warn!("Run timeout exceeded; cancelling");
            deadline.cancel();
        });

        let result = self.execute(raw, prefs, &progress, cancel).await;
        timer.abort();
        result
    }

    async fn execute(
        &self,
        raw: &RawGenerationRequest,
        prefs: &StoredPreferences,
        progress: &ProgressSender,
        cancel: CancellationToken,
    ) -> Result<GenerationResult> {
        let run_id = Uuid::new_v4();

        // 1. Normalize the request
        self.boundary(run_id, Stage::Normalizing, &cancel, progress).await?;
        self.enter(run_id, Stage::Normalizing, "validating request", progress).await;

        let normalized = match normalize::normalize(raw, prefs) {
            Ok(n) => n,
            Err(e) => {
                progress
                    .emit(run_id, Stage::Normalizing, StageStatus::Error, e.to_string())
                    .await;
                return Err(e.into());
            }
        };
        progress
            .emit(run_id, Stage::Normalizing, StageStatus::Completed, "request validated")
            .await;

        let mut ctx = PipelineContext::new(run_id, cancel, normalized.request, normalized.warnings);

        // 2. Plan research queries
        self.boundary(run_id, Stage::Planning, &ctx.cancel, progress).await?;
        self.enter(run_id, Stage::Planning, "deriving research queries", progress).await;

        ctx.queries = planner::plan(&ctx.request, &self.generator, &self.config).await;
        progress
            .emit(
                run_id,
                Stage::Planning,
                StageStatus::Completed,
                format!("{} queries planned", ctx.queries.len()),
            )
            .await;

        // 3-4. Research and context assembly, skipped entirely when
        // grounding is off or the planner produced nothing
        let grounding = if ctx.queries.is_empty() {
            ctx.grounding_enabled = false;
            None
        } else {
            self.boundary(run_id, Stage::Researching, &ctx.cancel, progress).await?;
            self.enter(run_id, Stage::Researching, "querying search providers", progress).await;

            let outcome = research::aggregate(
                &ctx.queries,
                &self.providers,
                &self.limiter,
                &ctx.cancel,
                &self.config,
            )
            .await;

            if ctx.cancel.is_cancelled() {
                progress
                    .emit(run_id, Stage::Researching, StageStatus::Error, "run cancelled")
                    .await;
                return Err(PipelineError::Cancelled);
            }

            ctx.sources = outcome.sources;
            ctx.grounding_enabled = !ctx.sources.is_empty();
            let message = if outcome.partial {
                format!("{} sources (degraded)", ctx.sources.len())
            } else {
                format!("{} sources", ctx.sources.len())
            };
            progress
                .emit(run_id, Stage::Researching, StageStatus::Completed, message)
                .await;

            self.boundary(run_id, Stage::BuildingContext, &ctx.cancel, progress).await?;
            self.enter(run_id, Stage::BuildingContext, "assembling grounding context", progress)
                .await;

            let built = context::build(&ctx.sources, &ctx.request, &self.config);
            progress
                .emit(
                    run_id,
                    Stage::BuildingContext,
                    StageStatus::Completed,
                    format!("{} excerpts included", built.len()),
                )
                .await;

            (!built.is_empty()).then_some(built)
        };

        // 5. Generate the draft - the one fatal stage
        self.boundary(run_id, Stage::Generating, &ctx.cancel, progress).await?;
        self.enter(run_id, Stage::Generating, "generating draft", progress).await;

        let draft = tokio::select! {
            _ = ctx.cancel.cancelled() => {
                progress
                    .emit(run_id, Stage::Generating, StageStatus::Error, "run cancelled")
                    .await;
                return Err(PipelineError::Cancelled);
            }
            result = generate::generate_draft(
                &self.generator,
                &ctx.request,
                grounding.as_ref(),
                &self.config,
            ) => match result {
                Ok(draft) => draft,
                Err(e) => {
                    progress
                        .emit(run_id, Stage::Generating, StageStatus::Error, e.to_string())
                        .await;
                    return Err(e.into());
                }
            }
        };
        ctx.draft = draft;
        progress
            .emit(
                run_id,
                Stage::Generating,
                StageStatus::Completed,
                format!("{} characters drafted", ctx.draft.len()),
            )
            .await;

        // 6. Extract citations (degrades, never fatal)
        self.boundary(run_id, Stage::ExtractingCitations, &ctx.cancel, progress).await?;
        self.enter(run_id, Stage::ExtractingCitations, "mapping claims to sources", progress)
            .await;

        ctx.citations = citations::extract(&ctx.draft, &ctx.sources, &self.config);
        ctx.citations = Self::drop_dangling(ctx.citations, &ctx.sources);
        progress
            .emit(
                run_id,
                Stage::ExtractingCitations,
                StageStatus::Completed,
                format!("{} citations", ctx.citations.len()),
            )
            .await;

        // 7. Score quality (degrades, never fatal)
        self.boundary(run_id, Stage::Scoring, &ctx.cancel, progress).await?;
        self.enter(run_id, Stage::Scoring, "computing quality metrics", progress).await;

        let metrics = scoring::score(
            &ctx.draft,
            &ctx.citations,
            &ctx.request,
            &ctx.sources,
            &self.config,
        );
        progress
            .emit(
                run_id,
                Stage::Scoring,
                StageStatus::Completed,
                format!("minimum score {:.2}", metrics.min_score()),
            )
            .await;
        ctx.metrics = Some(metrics);

        info!(
            run_id = %run_id,
            grounded = ctx.grounding_enabled,
            sources = ctx.sources.len(),
            citations = ctx.citations.len(),
            "Pipeline run finalized"
        );

        Ok(ctx.into_result())
    }

    /// Stage boundary: refuse to enter a stage once cancelled.
    async fn boundary(
        &self,
        run_id: Uuid,
        stage: Stage,
        cancel: &CancellationToken,
        progress: &ProgressSender,
    ) -> Result<()> {
        if cancel.is_cancelled() {
            progress
                .emit(run_id, stage, StageStatus::Error, "run cancelled")
                .await;
            return Err(PipelineError::Cancelled);
        }
        Ok(())
    }

    /// Emit the pending and active transitions for a stage.
    async fn enter(
        &self,
        run_id: Uuid,
        stage: Stage,
        message: &str,
        progress: &ProgressSender,
    ) {
        progress
            .emit(run_id, stage, StageStatus::Pending, "queued")
            .await;
        progress.emit(run_id, stage, StageStatus::Active, message).await;
    }

    /// Drop citations whose source id is not in the aggregated set.
    fn drop_dangling(citations: Vec<Citation>, sources: &[ResearchSource]) -> Vec<Citation> {
        let ids: std::collections::HashSet<_> = sources.iter().map(|s| &s.id).collect();
        let before = citations.len();
        let kept: Vec<Citation> = citations
            .into_iter()
            .filter(|c| ids.contains(&c.source_id))
            .collect();
        if kept.len() < before {
            warn!(dropped = before - kept.len(), "Dropped dangling citations");
        }
        kept
    }
}
