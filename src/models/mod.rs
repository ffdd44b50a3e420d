use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{PipelineError, ProviderError};

pub mod query;

pub use query::RecommendationQuery;

/// Largest number of records a single request may ask for
pub const MAX_RECOMMENDATIONS: usize = 50;

/// Count used when a caller does not ask for a specific number
pub const DEFAULT_RECOMMENDATIONS: usize = 10;

pub const DEFAULT_TITLE: &str = "Unknown Song";
pub const DEFAULT_ARTIST: &str = "Unknown Artist";
pub const DEFAULT_ALBUM: &str = "Unknown Album";
pub const DEFAULT_GENRE: &str = "Various";
pub const DEFAULT_YEAR: &str = "Unknown";
pub const DEFAULT_MOOD: &str = "Various";
pub const DEFAULT_REASON: &str = "Recommended based on your preferences";

/// A validated request for a recommendation set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationRequest {
    prompt: String,
    count: usize,
}

impl RecommendationRequest {
    /// Creates a request, rejecting blank prompts and counts outside `1..=MAX_RECOMMENDATIONS`
    pub fn new(prompt: impl Into<String>, count: usize) -> Result<Self, PipelineError> {
        let prompt = prompt.into();

        if prompt.trim().is_empty() {
            return Err(PipelineError::InvalidRequest(
                "Prompt cannot be empty".to_string(),
            ));
        }

        if !(1..=MAX_RECOMMENDATIONS).contains(&count) {
            return Err(PipelineError::InvalidRequest(format!(
                "Count must be between 1 and {}, got {}",
                MAX_RECOMMENDATIONS, count
            )));
        }

        Ok(Self { prompt, count })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// Text reply of the provider for one request
///
/// Never empty: a blank reply is rejected at construction with `ProviderError::Empty`,
/// so extraction only ever sees real text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProviderResponse {
    text: String,
}

impl RawProviderResponse {
    pub fn new(text: impl Into<String>) -> Result<Self, ProviderError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ProviderError::Empty);
        }
        Ok(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A recommendation as recovered by an extractor, before defaults are applied
///
/// Deserializes from the provider's JSON schema. Values are read leniently: numbers are
/// kept as text and anything that is neither a string nor a number counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "DraftFields")]
pub struct DraftRecord {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
    pub mood: Option<String>,
    pub reason: Option<String>,
    pub similarity_score: Option<f64>,
}

/// Wire shape of a draft; the title may arrive under any of three keys
#[derive(Deserialize)]
struct DraftFields {
    #[serde(default, deserialize_with = "lenient_text")]
    song_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    song: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    artist: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    album: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    genre: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    year: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    mood: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    reason: Option<String>,
    #[serde(default, deserialize_with = "lenient_score")]
    similarity_score: Option<f64>,
}

impl From<DraftFields> for DraftRecord {
    fn from(fields: DraftFields) -> Self {
        Self {
            title: fields.song_title.or(fields.title).or(fields.song),
            artist: fields.artist,
            album: fields.album,
            genre: fields.genre,
            year: fields.year,
            mood: fields.mood,
            reason: fields.reason,
            similarity_score: fields.similarity_score,
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// A fully populated recommendation handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    #[serde(rename = "song_title", alias = "title")]
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub year: String,
    pub mood: String,
    pub reason: String,
    pub similarity_score: f64,
}

impl From<RecommendationRecord> for DraftRecord {
    fn from(record: RecommendationRecord) -> Self {
        Self {
            title: Some(record.title),
            artist: Some(record.artist),
            album: Some(record.album),
            genre: Some(record.genre),
            year: Some(record.year),
            mood: Some(record.mood),
            reason: Some(record.reason),
            similarity_score: Some(record.similarity_score),
        }
    }
}

/// Ordered recommendations for one request, never longer than the requested count
pub type RecommendationSet = Vec<RecommendationRecord>;

/// JSON envelope shared by the provider schema and the HTTP response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsEnvelope<T> {
    pub recommendations: Vec<T>,
}

// ============================================================================
// Gemini API Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Raw body of a `generateContent` reply
#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    pub error: Option<GeminiApiError>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiApiError {
    #[serde(default)]
    pub code: Option<u16>,
    pub message: String,
}

impl GeminiResponse {
    /// Concatenated text parts of the first candidate
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}
