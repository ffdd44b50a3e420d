pub mod extraction;
pub mod heuristic;
pub mod normalizer;
pub mod providers;
pub mod recommendations;
pub mod structured;

pub use normalizer::{FieldNormalizer, RandomScores, ScoreSource};
pub use providers::{GeminiProvider, RecommendationProvider};
pub use recommendations::Recommender;
