use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use tunesmith_api::{
    error::ProviderError,
    middleware::request_id::REQUEST_ID_HEADER,
    models::{RawProviderResponse, RecommendationRequest},
    routes::{create_router, AppState},
    services::{RecommendationProvider, Recommender, ScoreSource},
};

/// Provider that answers every call with a canned reply and records the prompts it saw
struct CannedProvider {
    reply: Result<String, ProviderError>,
    seen: Mutex<Vec<(String, usize)>>,
}

impl CannedProvider {
    fn new(reply: Result<&str, ProviderError>) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.map(str::to_string),
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait::async_trait]
impl RecommendationProvider for CannedProvider {
    async fn fetch(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RawProviderResponse, ProviderError> {
        self.seen
            .lock()
            .unwrap()
            .push((request.prompt().to_string(), request.count()));
        RawProviderResponse::new(self.reply.clone()?)
    }

    fn name(&self) -> &'static str {
        "canned"
    }
}

struct FixedScore;

impl ScoreSource for FixedScore {
    fn sample(&self) -> f64 {
        0.9
    }
}

fn create_test_app(provider: Arc<CannedProvider>) -> Router {
    let recommender = Recommender::new(provider).with_score_source(Arc::new(FixedScore));
    create_router(Arc::new(AppState::new(recommender)))
}

async fn post_json(app: Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/recommendations")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app(CannedProvider::new(Ok("unused")));

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = create_test_app(CannedProvider::new(Ok("unused")));
    let id = "6f1c3a52-3d2b-4a8e-9a55-0c2f4e7b9d10";

    let response = app
        .oneshot(
            Request::get("/health")
                .header(REQUEST_ID_HEADER, id)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()[REQUEST_ID_HEADER], id);
}

#[tokio::test]
async fn test_structured_recommendations() {
    let provider = CannedProvider::new(Ok(r#"```json
{"recommendations": [
    {"song_title": "Dreams", "artist": "Fleetwood Mac", "album": "Rumours", "genre": "Rock",
     "year": "1977", "mood": "Mellow", "reason": "Timeless groove", "similarity_score": 0.95}
]}
```"#));
    let app = create_test_app(provider.clone());

    let (status, body) = post_json(
        app,
        json!({ "mode": "genre", "primary": "Rock", "decade": "1970s", "count": 5 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let recommendations = body["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 1);
    assert_eq!(recommendations[0]["song_title"], "Dreams");
    assert_eq!(recommendations[0]["similarity_score"], 0.95);

    let seen = provider.seen.lock().unwrap();
    assert_eq!(
        seen.as_slice(),
        &[(
            "Recommend songs in the Rock genre from the 1970s".to_string(),
            5
        )]
    );
}

#[tokio::test]
async fn test_heuristic_recommendations_default_count() {
    let provider = CannedProvider::new(Ok(
        "**Song:** Weightless\n**Artist:** Marconi Union\nThis track is very calming.",
    ));
    let app = create_test_app(provider.clone());

    let (status, body) = post_json(
        app,
        json!({ "mode": "mood", "mood": "Calm", "activity": "Studying", "energy_level": 2 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["recommendations"],
        json!([{
            "song_title": "Weightless",
            "artist": "Marconi Union",
            "album": "Unknown Album",
            "genre": "Various",
            "year": "Unknown",
            "mood": "Various",
            "reason": "Recommended based on your preferences",
            "similarity_score": 0.9
        }])
    );

    assert_eq!(provider.seen.lock().unwrap()[0].1, 10);
}

#[tokio::test]
async fn test_nothing_extracted_is_unprocessable() {
    let app = create_test_app(CannedProvider::new(Ok("Sorry, no ideas today.")));

    let (status, body) = post_json(
        app,
        json!({ "mode": "custom", "description": "Songs about trains" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("No recommendations"));
}

#[tokio::test]
async fn test_provider_failure_is_bad_gateway() {
    let app = create_test_app(CannedProvider::new(Err(ProviderError::Unavailable(
        "quota exceeded".to_string(),
    ))));

    let (status, body) = post_json(
        app,
        json!({ "mode": "artist_similar", "artists": "Radiohead", "similarity": "Era" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("quota exceeded"));
}

#[tokio::test]
async fn test_invalid_count_is_bad_request() {
    let provider = CannedProvider::new(Ok("Title: Unused"));
    let app = create_test_app(provider.clone());

    let (status, _) = post_json(
        app,
        json!({ "mode": "genre", "primary": "Jazz", "count": 51 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(provider.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_energy_level_is_bad_request() {
    let app = create_test_app(CannedProvider::new(Ok("Title: Unused")));

    let (status, _) = post_json(
        app,
        json!({ "mode": "mood", "mood": "Happy", "activity": "Dancing", "energy_level": 0 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
