use crate::models::DraftRecord;

/// Inline emphasis delimiter providers use for song headers
const EMPHASIS: &str = "**";

/// Markers that announce a new song when the current one already has a title
const BOUNDARY_MARKERS: [&str; 4] = ["song:", "title:", "artist:", "album:"];

/// Field markers in match order; the first marker found on a line wins
const FIELD_MARKERS: [(&str, Field); 8] = [
    ("song:", Field::Title),
    ("title:", Field::Title),
    ("artist:", Field::Artist),
    ("album:", Field::Album),
    ("genre:", Field::Genre),
    ("year:", Field::Year),
    ("mood:", Field::Mood),
    ("reason:", Field::Reason),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Artist,
    Album,
    Genre,
    Year,
    Mood,
    Reason,
}

impl Field {
    fn slot(self, draft: &mut DraftRecord) -> &mut Option<String> {
        match self {
            Field::Title => &mut draft.title,
            Field::Artist => &mut draft.artist,
            Field::Album => &mut draft.album,
            Field::Genre => &mut draft.genre,
            Field::Year => &mut draft.year,
            Field::Mood => &mut draft.mood,
            Field::Reason => &mut draft.reason,
        }
    }
}

/// Rebuilds recommendations from free-form text
///
/// Scans the reply line by line for `field: value` markers. Never fails: text without
/// any recognizable marker yields an empty list. Records without a title are dropped,
/// scores are never set, and at most `desired_count` records are returned.
pub fn extract(raw: &str, desired_count: usize) -> Vec<DraftRecord> {
    let mut records = Vec::new();
    let mut current = DraftRecord::default();

    for line in raw.lines() {
        let lowered = line.to_lowercase();
        let field = detect_field(&lowered);

        if is_boundary(line, &lowered)
            && current.title.is_some()
            && starts_new_record(&mut current, field)
        {
            records.push(std::mem::take(&mut current));
        }

        if let (Some(field), Some(value)) = (field, field_value(line)) {
            *field.slot(&mut current) = Some(value);
        }
    }

    if current.title.is_some() {
        records.push(current);
    }

    records.truncate(desired_count);
    records
}

fn detect_field(lowered: &str) -> Option<Field> {
    FIELD_MARKERS
        .iter()
        .find(|(marker, _)| lowered.contains(marker))
        .map(|(_, field)| *field)
}

fn is_boundary(line: &str, lowered: &str) -> bool {
    line.contains(EMPHASIS) || BOUNDARY_MARKERS.iter().any(|m| lowered.contains(m))
}

/// A boundary line closes the current record when it would overwrite a field the record
/// already holds, or when it carries no field at all (a bare emphasised header).
fn starts_new_record(current: &mut DraftRecord, field: Option<Field>) -> bool {
    match field {
        Some(field) => field.slot(current).is_some(),
        None => true,
    }
}

/// Text after the last colon, without emphasis markup
fn field_value(line: &str) -> Option<String> {
    let value = line.rsplit(':').next()?.replace('*', "");
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
