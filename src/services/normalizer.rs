use rand::Rng;
use std::sync::Arc;

use crate::models::{
    DraftRecord, RecommendationRecord, DEFAULT_ALBUM, DEFAULT_ARTIST, DEFAULT_GENRE,
    DEFAULT_MOOD, DEFAULT_REASON, DEFAULT_TITLE, DEFAULT_YEAR,
};

/// Bounds of a synthesized similarity score
pub const SYNTHETIC_SCORE_MIN: f64 = 0.80;
pub const SYNTHETIC_SCORE_MAX: f64 = 0.98;

/// Source of scores for records that arrive without one
///
/// Implementations return a value in `[SYNTHETIC_SCORE_MIN, SYNTHETIC_SCORE_MAX]`.
pub trait ScoreSource: Send + Sync {
    fn sample(&self) -> f64;
}

/// Uniform draw from the thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomScores;

impl ScoreSource for RandomScores {
    fn sample(&self) -> f64 {
        rand::rng().random_range(SYNTHETIC_SCORE_MIN..=SYNTHETIC_SCORE_MAX)
    }
}

/// Fills every absent field of a draft with its default
#[derive(Clone)]
pub struct FieldNormalizer {
    scores: Arc<dyn ScoreSource>,
}

impl Default for FieldNormalizer {
    fn default() -> Self {
        Self::new(Arc::new(RandomScores))
    }
}

impl FieldNormalizer {
    pub fn new(scores: Arc<dyn ScoreSource>) -> Self {
        Self { scores }
    }

    /// Normalizes drafts in order; never fails
    pub fn normalize(&self, drafts: Vec<DraftRecord>) -> Vec<RecommendationRecord> {
        drafts
            .into_iter()
            .map(|draft| self.normalize_one(draft))
            .collect()
    }

    fn normalize_one(&self, draft: DraftRecord) -> RecommendationRecord {
        let similarity_score = match draft.similarity_score {
            Some(score) if (0.0..=1.0).contains(&score) => score,
            Some(score) => {
                tracing::warn!(
                    score,
                    title = draft.title.as_deref().unwrap_or(DEFAULT_TITLE),
                    "Replacing out-of-range similarity score"
                );
                self.synthesize_score()
            }
            None => self.synthesize_score(),
        };

        RecommendationRecord {
            title: or_default(draft.title, DEFAULT_TITLE),
            artist: or_default(draft.artist, DEFAULT_ARTIST),
            album: or_default(draft.album, DEFAULT_ALBUM),
            genre: or_default(draft.genre, DEFAULT_GENRE),
            year: or_default(draft.year, DEFAULT_YEAR),
            mood: or_default(draft.mood, DEFAULT_MOOD),
            reason: or_default(draft.reason, DEFAULT_REASON),
            similarity_score,
        }
    }

    fn synthesize_score(&self) -> f64 {
        let rounded = (self.scores.sample() * 100.0).round() / 100.0;
        rounded.clamp(SYNTHETIC_SCORE_MIN, SYNTHETIC_SCORE_MAX)
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}
