use serde::Deserialize;

use crate::error::PipelineError;

/// Values the selection widgets use to mean "no preference"
const NO_PREFERENCE: [&str; 2] = ["any", "none"];

/// How the caller describes the music they want
///
/// Each mode renders to the natural-language prompt sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RecommendationQuery {
    /// Songs from a primary genre, optionally blended with a second one and pinned to a decade
    Genre {
        primary: String,
        #[serde(default)]
        secondary: Option<String>,
        #[serde(default)]
        decade: Option<String>,
    },
    /// Songs matching how the listener feels and what they are doing
    Mood {
        mood: String,
        activity: String,
        energy_level: u8,
    },
    /// Songs by artists close to the listener's favourites
    ArtistSimilar { artists: String, similarity: String },
    /// Free-form description with optional language and tempo preferences
    Custom {
        description: String,
        #[serde(default)]
        language: Option<String>,
        #[serde(default)]
        tempo: Option<String>,
    },
}

impl RecommendationQuery {
    /// Renders the prompt for this query
    pub fn to_prompt(&self) -> Result<String, PipelineError> {
        match self {
            RecommendationQuery::Genre {
                primary,
                secondary,
                decade,
            } => {
                let mut prompt = format!(
                    "Recommend songs in the {} genre",
                    required("primary", primary)?
                );
                if let Some(secondary) = preference(secondary) {
                    prompt.push_str(&format!(" with influences from {}", secondary));
                }
                if let Some(decade) = preference(decade) {
                    prompt.push_str(&format!(" from the {}", decade));
                }
                Ok(prompt)
            }
            RecommendationQuery::Mood {
                mood,
                activity,
                energy_level,
            } => {
                if !(1..=10).contains(energy_level) {
                    return Err(PipelineError::InvalidRequest(format!(
                        "Energy level must be between 1 and 10, got {}",
                        energy_level
                    )));
                }
                Ok(format!(
                    "Recommend songs for someone feeling {} while {} with energy level {}/10",
                    required("mood", mood)?.to_lowercase(),
                    required("activity", activity)?.to_lowercase(),
                    energy_level
                ))
            }
            RecommendationQuery::ArtistSimilar {
                artists,
                similarity,
            } => Ok(format!(
                "Recommend songs by artists similar to {} in terms of {}",
                required("artists", artists)?,
                required("similarity", similarity)?.to_lowercase()
            )),
            RecommendationQuery::Custom {
                description,
                language,
                tempo,
            } => {
                let mut prompt = required("description", description)?.to_string();
                if let Some(language) = preference(language) {
                    prompt.push_str(&format!(" in {}", language));
                }
                if let Some(tempo) = preference(tempo) {
                    prompt.push_str(&format!(" with {} tempo", tempo.to_lowercase()));
                }
                Ok(prompt)
            }
        }
    }
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, PipelineError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PipelineError::InvalidRequest(format!(
            "{} cannot be empty",
            field
        )));
    }
    Ok(value)
}

fn preference(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !NO_PREFERENCE.contains(&v.to_lowercase().as_str()))
}
