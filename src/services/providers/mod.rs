/// Text-generation provider abstraction
///
/// A provider answers one composed instruction with raw text. Everything that turns
/// that text into records lives downstream, so providers stay swappable.
use crate::{
    error::ProviderError,
    models::{RawProviderResponse, RecommendationRequest},
};

pub mod gemini;

pub use gemini::GeminiProvider;

/// Trait for text-generation providers
///
/// Implementations issue exactly one outbound call per `fetch` and never retry.
/// A single instance is shared read-only across concurrent invocations.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationProvider: Send + Sync {
    /// Send the composed instruction for `request` and return the raw reply
    async fn fetch(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RawProviderResponse, ProviderError>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Builds the instruction sent to the provider for a request
pub fn compose_instruction(request: &RecommendationRequest) -> String {
    format!(
        r#"You are an expert music curator and recommendation system. Based on the following request, provide exactly {count} song recommendations.

Request: {prompt}

Please provide your response in the following JSON format:
{{
    "recommendations": [
        {{
            "song_title": "Song Name",
            "artist": "Artist Name",
            "album": "Album Name",
            "genre": "Genre",
            "year": "Year",
            "mood": "Mood/Vibe",
            "reason": "Why this song fits the request",
            "similarity_score": 0.95
        }}
    ]
}}

Make sure to include diverse but relevant songs. Each song should have a similarity score between 0.7 and 1.0."#,
        count = request.count(),
        prompt = request.prompt().trim(),
    )
}
