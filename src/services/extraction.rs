use crate::models::DraftRecord;
use crate::services::{heuristic, structured};

/// Which path, if any, recovered records from a reply
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// Decoded from a JSON payload
    Structured(Vec<DraftRecord>),
    /// Rebuilt from `field: value` markers
    Unstructured(Vec<DraftRecord>),
    /// Neither path found a single record
    Failed,
}

impl Extraction {
    pub fn path(&self) -> &'static str {
        match self {
            Extraction::Structured(_) => "structured",
            Extraction::Unstructured(_) => "heuristic",
            Extraction::Failed => "none",
        }
    }
}

/// Runs the structured extractor, falling back to the heuristic one
///
/// A payload that decodes but holds no records also falls back.
pub fn extract(raw: &str, desired_count: usize) -> Extraction {
    if let Some(drafts) = structured::try_extract(raw).filter(|d| !d.is_empty()) {
        return Extraction::Structured(drafts);
    }

    let drafts = heuristic::extract(raw, desired_count);
    if drafts.is_empty() {
        Extraction::Failed
    } else {
        Extraction::Unstructured(drafts)
    }
}
