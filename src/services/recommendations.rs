use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{
    error::{PipelineError, ProviderError},
    models::{RecommendationRequest, RecommendationSet},
    services::{
        extraction::{self, Extraction},
        normalizer::{FieldNormalizer, ScoreSource},
        providers::RecommendationProvider,
    },
};

/// Default bound on a single provider call
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Turns a prompt into a normalized recommendation set
///
/// Built once by the host around a shared provider. Each call issues one provider
/// request, extracts records from the reply (structured first, heuristic second) and
/// normalizes them. Holds no per-call state, so one instance serves concurrent callers.
#[derive(Clone)]
pub struct Recommender {
    provider: Arc<dyn RecommendationProvider>,
    normalizer: FieldNormalizer,
    timeout: Duration,
}

impl Recommender {
    pub fn new(provider: Arc<dyn RecommendationProvider>) -> Self {
        Self {
            provider,
            normalizer: FieldNormalizer::default(),
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_score_source(mut self, scores: Arc<dyn ScoreSource>) -> Self {
        self.normalizer = FieldNormalizer::new(scores);
        self
    }

    /// Recommends up to `count` songs for `prompt`
    pub async fn recommend(
        &self,
        prompt: &str,
        count: usize,
    ) -> Result<RecommendationSet, PipelineError> {
        let request = RecommendationRequest::new(prompt, count)?;
        self.recommend_request(&request).await
    }

    /// Runs the pipeline for an already validated request
    ///
    /// Dropping the returned future cancels the in-flight provider call.
    pub async fn recommend_request(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationSet, PipelineError> {
        let start = Instant::now();

        let raw = match tokio::time::timeout(self.timeout, self.provider.fetch(request)).await {
            Ok(result) => result.map_err(|e| {
                tracing::error!(
                    error = %e,
                    provider = self.provider.name(),
                    "Provider call failed"
                );
                e
            })?,
            Err(_) => {
                tracing::error!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    provider = self.provider.name(),
                    "Provider call timed out"
                );
                return Err(ProviderError::Unavailable(format!(
                    "Provider call timed out after {:?}",
                    self.timeout
                ))
                .into());
            }
        };

        let extraction = extraction::extract(raw.text(), request.count());
        let path = extraction.path();

        let mut drafts = match extraction {
            Extraction::Structured(drafts) | Extraction::Unstructured(drafts) => drafts,
            Extraction::Failed => {
                tracing::warn!(
                    provider = self.provider.name(),
                    chars = raw.text().len(),
                    "No recommendations found in provider reply"
                );
                return Err(PipelineError::NoRecommendations);
            }
        };
        drafts.truncate(request.count());

        let records = self.normalizer.normalize(drafts);

        tracing::info!(
            provider = self.provider.name(),
            path,
            requested = request.count(),
            records = records.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Recommendations produced"
        );

        Ok(records)
    }
}
