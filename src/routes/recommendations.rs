use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{
        RecommendationQuery, RecommendationRecord, RecommendationsEnvelope,
        DEFAULT_RECOMMENDATIONS,
    },
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequestBody {
    #[serde(flatten)]
    pub query: RecommendationQuery,
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    DEFAULT_RECOMMENDATIONS
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(body): Json<RecommendationRequestBody>,
) -> AppResult<Json<RecommendationsEnvelope<RecommendationRecord>>> {
    let prompt = body.query.to_prompt()?;

    tracing::info!(
        request_id = %request_id,
        count = body.count,
        prompt = %prompt,
        "Processing recommendation request"
    );

    let recommendations = state.recommender.recommend(&prompt, body.count).await?;

    tracing::info!(
        request_id = %request_id,
        records = recommendations.len(),
        "Recommendations completed"
    );

    Ok(Json(RecommendationsEnvelope { recommendations }))
}
