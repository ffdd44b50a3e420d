use crate::models::{DraftRecord, RecommendationsEnvelope};

/// Opening fence of a JSON block, language tag included
const JSON_FENCE: &str = "```json";
const CLOSING_FENCE: &str = "```";

/// Attempts to decode the provider's JSON payload
///
/// Looks inside the first "```json" fenced block when there is one, otherwise tries the
/// whole reply. Returns `None` whenever the candidate is not a JSON object with a
/// `recommendations` array of objects; that is the signal to fall back to the heuristic
/// extractor, not an error. Provided scores are kept exactly as sent.
pub fn try_extract(raw: &str) -> Option<Vec<DraftRecord>> {
    let candidate = payload_candidate(raw);

    match serde_json::from_str::<RecommendationsEnvelope<DraftRecord>>(candidate.trim()) {
        Ok(envelope) => Some(envelope.recommendations),
        Err(e) => {
            tracing::debug!(error = %e, "Reply is not a structured payload");
            None
        }
    }
}

/// Isolates the text that should hold the JSON document
fn payload_candidate(raw: &str) -> &str {
    let Some(open) = raw.find(JSON_FENCE) else {
        return raw;
    };

    let body = &raw[open + JSON_FENCE.len()..];
    match body.find(CLOSING_FENCE) {
        Some(close) => &body[..close],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_payload() {
        let raw = r#"{"recommendations":[{"song_title":"A","artist":"B","similarity_score":0.91}]}"#;

        let drafts = try_extract(raw).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].title.as_deref(), Some("A"));
        assert_eq!(drafts[0].artist.as_deref(), Some("B"));
        assert_eq!(drafts[0].album, None);
        assert_eq!(drafts[0].similarity_score, Some(0.91));
    }

    #[test]
    fn test_fenced_payload_with_surrounding_prose() {
        let raw = "Here are your songs!\n```json\n{\"recommendations\": [\n  {\"song_title\": \"Clocks\", \"artist\": \"Coldplay\", \"year\": 2002},\n  {\"song_title\": \"Yellow\", \"artist\": \"Coldplay\"}\n]}\n```\nEnjoy the music.";

        let drafts = try_extract(raw).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].title.as_deref(), Some("Clocks"));
        assert_eq!(drafts[0].year.as_deref(), Some("2002"));
        assert_eq!(drafts[1].title.as_deref(), Some("Yellow"));
    }

    #[test]
    fn test_redundant_title_keys_still_decode() {
        let raw = r#"{"recommendations":[
            {"song_title":"A","title":"A","artist":"B","similarity_score":0.91},
            {"song_title":"Hey Jude","song":"Hey Jude","artist":"The Beatles"}
        ]}"#;

        let drafts = try_extract(raw).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].title.as_deref(), Some("A"));
        assert_eq!(drafts[0].similarity_score, Some(0.91));
        assert_eq!(drafts[1].title.as_deref(), Some("Hey Jude"));
        assert_eq!(drafts[1].artist.as_deref(), Some("The Beatles"));
    }

    #[test]
    fn test_unclosed_fence_uses_rest_of_text() {
        let raw = "```json\n{\"recommendations\": [{\"song_title\": \"Creep\"}]}\n";

        let drafts = try_extract(raw).unwrap();
        assert_eq!(drafts[0].title.as_deref(), Some("Creep"));
    }

    #[test]
    fn test_out_of_range_score_is_not_clamped() {
        let raw = r#"{"recommendations":[{"song_title":"A","similarity_score":1.7}]}"#;

        let drafts = try_extract(raw).unwrap();
        assert_eq!(drafts[0].similarity_score, Some(1.7));
    }

    #[test]
    fn test_empty_array_decodes() {
        let drafts = try_extract(r#"{"recommendations": []}"#).unwrap();
        assert!(drafts.is_empty());
    }

    #[test]
    fn test_truncated_payload_is_none() {
        let raw = "```json\n{\"recommendations\": [{\"song_title\": \"Cl";
        assert_eq!(try_extract(raw), None);
    }

    #[test]
    fn test_missing_top_level_key_is_none() {
        assert_eq!(try_extract(r#"{"songs": []}"#), None);
    }

    #[test]
    fn test_wrong_shape_is_none() {
        assert_eq!(try_extract(r#"{"recommendations": "none"}"#), None);
        assert_eq!(try_extract(r#"{"recommendations": [1, 2]}"#), None);
        assert_eq!(try_extract(r#"[{"song_title": "A"}]"#), None);
    }

    #[test]
    fn test_prose_is_none() {
        assert_eq!(try_extract("Title: Hello\nArtist: World"), None);
    }
}
